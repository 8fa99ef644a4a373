//! AI plan service
//!
//! Builds the prompt from the stored profile, asks the plan generator for a
//! JSON plan, stores it and schedules a week of daily tasks from it.
//! Nutrition and combined prompts carry locally computed targets; the
//! generator is told to use them as given.

use crate::error::ApiError;
use crate::llm::{extract_json, GenerationRequest, TextGenerator};
use crate::repositories::{
    CreatePlan, CreateTask, PlanRecord, PlanRepository, ProfileRecord, ProfileRepository,
    TaskRepository,
};
use crate::services::profile::target_input;
use crate::services::targets::stored_profile_error;
use anyhow::anyhow;
use chrono::{Duration, NaiveDate, Utc};
use fitness_planner_shared::models::{
    DEFAULT_PLAN_DESCRIPTION, FALLBACK_DAILY_TASKS, PLAN_TASK_DAYS,
};
use fitness_planner_shared::types::{GeneratePlanResponse, PlanResponse};
use fitness_planner_shared::validation::{
    FIELD_ACTIVITY_LEVEL, FIELD_AGE, FIELD_GENDER, FIELD_HEIGHT,
};
use fitness_planner_shared::{
    compute_macro_targets, energy_breakdown, ActivityLevel, EnergyBreakdown, Gender, Goal,
    MacroTargets, PlanType, TaskType, ValidationError,
};
use serde_json::Value;
use sqlx::PgPool;
use std::fmt::Write;
use tracing::{info, warn};
use uuid::Uuid;

const PLAN_SYSTEM_PROMPT: &str = "You are a certified fitness and nutrition expert. \
     Always respond with valid JSON only, no additional text or explanations.";

/// Fields every plan type needs
const PLAN_REQUIRED_FIELDS: [&str; 4] = [FIELD_HEIGHT, FIELD_AGE, FIELD_GENDER, FIELD_ACTIVITY_LEVEL];

/// Everything the prompt builder knows about the user
#[derive(Debug, Clone)]
pub struct PlanContext {
    pub age_years: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub activity_level: ActivityLevel,
    pub weight_kg: Option<f64>,
    pub target_weight_kg: Option<f64>,
    pub goal: Option<Goal>,
    /// Present for nutrition and combined plans
    pub targets: Option<(MacroTargets, EnergyBreakdown)>,
}

impl PlanContext {
    /// Build from a stored profile.
    ///
    /// Nutrition and combined plans need a complete profile so targets can be
    /// computed. Workout plans only need height, age, gender and activity.
    pub fn from_record(record: Option<&ProfileRecord>, plan_type: PlanType) -> Result<Self, ApiError> {
        let input = record.map(target_input).unwrap_or_default();
        let target_weight_kg = record.and_then(|r| r.target_weight_f64());

        match input.parse() {
            Ok((profile, goal)) => {
                let targets = if plan_type.needs_targets() {
                    let targets = compute_macro_targets(&profile, goal)?;
                    Some((targets, energy_breakdown(&profile, goal)))
                } else {
                    None
                };

                Ok(Self {
                    age_years: profile.age_years(),
                    gender: profile.gender(),
                    height_cm: profile.height_cm(),
                    activity_level: profile.activity_level(),
                    weight_kg: Some(profile.weight_kg()),
                    target_weight_kg,
                    goal: Some(goal),
                    targets,
                })
            }
            Err(err) if plan_type.needs_targets() => Err(stored_profile_error(err.into())),
            Err(err) => {
                let blocking: Vec<_> = err
                    .violations
                    .iter()
                    .filter(|v| PLAN_REQUIRED_FIELDS.contains(&v.field.as_str()))
                    .cloned()
                    .collect();
                if !blocking.is_empty() {
                    return Err(stored_profile_error(ValidationError::new(blocking).into()));
                }

                // Required fields are valid here; weight and goal are optional extras
                let parse_required = || -> Option<Self> {
                    Some(Self {
                        age_years: input.age? as u32,
                        gender: input.gender.as_deref()?.parse().ok()?,
                        height_cm: input.height?,
                        activity_level: input.activity_level.as_deref()?.parse().ok()?,
                        weight_kg: input.weight.filter(|_| !err.has_field("weight")),
                        target_weight_kg,
                        goal: input.goal.as_deref().and_then(|g| g.parse().ok()),
                        targets: None,
                    })
                };
                parse_required().ok_or_else(|| ApiError::Internal(anyhow!("profile passed validation but did not parse")))
            }
        }
    }
}

/// Build the user prompt for a plan
pub fn build_plan_prompt(plan_type: PlanType, ctx: &PlanContext) -> String {
    let mut prompt = String::new();

    let _ = write!(
        prompt,
        "User: {}-year-old {}, {} cm tall",
        ctx.age_years, ctx.gender, ctx.height_cm
    );
    if let Some(weight) = ctx.weight_kg {
        let _ = write!(prompt, ", weighs {} kg", weight);
    }
    let _ = write!(
        prompt,
        ". Activity level: {} ({}).",
        ctx.activity_level,
        ctx.activity_level.description()
    );
    if let Some(goal) = ctx.goal {
        let _ = write!(prompt, " Primary goal: {}", goal.description());
        if let Some(target) = ctx.target_weight_kg {
            let _ = write!(prompt, " (target weight: {} kg)", target);
        }
        prompt.push('.');
    }
    prompt.push_str("\n\n");

    if matches!(plan_type, PlanType::Workout | PlanType::Combined) {
        prompt.push_str(
            "Create a structured 7-day workout plan with specific exercises for each day, \
             sets, reps and rest periods, progressive difficulty, rest days, and the equipment \
             needed (prefer bodyweight or minimal equipment).\n\n",
        );
    }

    if let Some((targets, energy)) = ctx.targets.as_ref().filter(|_| plan_type.needs_targets()) {
        let _ = write!(
            prompt,
            "Create a nutrition plan. The daily targets are already computed and must be used \
             exactly as given: {} kcal, {} g protein, {} g carbs, {} g fat \
             (BMR {:.0} kcal, TDEE {:.0} kcal). Include sample meal ideas for breakfast, lunch, \
             dinner and snacks, a hydration goal, and key nutritional guidelines.\n\n",
            targets.calories,
            targets.protein_grams,
            targets.carbs_grams,
            targets.fat_grams,
            energy.bmr,
            energy.tdee,
        );
    }

    prompt.push_str("Respond with a single JSON object with these keys:\n");
    prompt.push_str("- \"title\": short plan title\n");
    prompt.push_str("- \"description\": one-sentence summary\n");
    if matches!(plan_type, PlanType::Workout | PlanType::Combined) {
        prompt.push_str(
            "- \"weeklyPlan\": object keyed by weekday (\"monday\"..\"sunday\"), each with \"focus\" \
             and \"exercises\": [{\"name\", \"sets\", \"reps\", \"rest\"}]\n",
        );
    }
    if let Some((targets, _)) = ctx.targets.as_ref().filter(|_| plan_type.needs_targets()) {
        let _ = writeln!(
            prompt,
            "- \"nutritionPlan\": {{\"dailyCalories\": {}, \"macros\": {{\"protein\": {}, \"carbs\": {}, \"fat\": {}}}, \
             \"meals\": {{\"breakfast\": [..], \"lunch\": [..], \"dinner\": [..], \"snacks\": [..]}}, \
             \"hydration\": \"..\", \"guidelines\": [..]}}",
            targets.calories, targets.protein_grams, targets.carbs_grams, targets.fat_grams,
        );
    }
    let _ = writeln!(
        prompt,
        "- \"{}\": 3 to 5 short daily task titles",
        plan_type.daily_tasks_key()
    );

    prompt
}

/// Daily task titles from a generated plan, or the fallback list
pub fn daily_task_titles(plan_data: &Value) -> Vec<String> {
    ["dailyTasks", "combinedDailyTasks"]
        .iter()
        .filter_map(|key| plan_data.get(*key).and_then(Value::as_array))
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .find(|titles| !titles.is_empty())
        .unwrap_or_else(|| FALLBACK_DAILY_TASKS.iter().map(|t| t.to_string()).collect())
}

/// One task per title per day, starting at `start`
pub fn schedule_tasks(
    user_id: Uuid,
    plan_id: Uuid,
    plan_type: PlanType,
    titles: &[String],
    start: NaiveDate,
) -> Vec<CreateTask> {
    let task_type = TaskType::for_plan(plan_type);
    (0..PLAN_TASK_DAYS)
        .flat_map(|offset| {
            let target_date = start + Duration::days(offset);
            titles.iter().map(move |title| CreateTask {
                user_id,
                plan_id,
                task_type: task_type.as_str().to_string(),
                title: title.clone(),
                target_date,
            })
        })
        .collect()
}

fn string_field(plan_data: &Value, key: &str) -> Option<String> {
    plan_data
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(crate) fn plan_response(record: PlanRecord) -> Result<PlanResponse, ApiError> {
    let plan_type = record
        .plan_type
        .parse::<PlanType>()
        .map_err(|v| anyhow!("stored plan {} has invalid type: {}", record.id, v.message))?;
    let targets = record
        .targets
        .and_then(|value| serde_json::from_value::<MacroTargets>(value).ok());

    Ok(PlanResponse {
        id: record.id,
        plan_type,
        title: record.title,
        description: record.description,
        plan_data: record.plan_data,
        targets,
        is_active: record.is_active,
        created_at: record.created_at,
    })
}

/// Plan service
pub struct PlanService;

impl PlanService {
    /// Generate, store and schedule a new plan
    pub async fn generate(
        db: &PgPool,
        generator: &dyn TextGenerator,
        user_id: Uuid,
        plan_type: PlanType,
    ) -> Result<GeneratePlanResponse, ApiError> {
        let record = ProfileRepository::find(db, user_id).await?;
        let ctx = PlanContext::from_record(record.as_ref(), plan_type)?;
        let targets = ctx.targets.map(|(targets, _)| targets);

        let request = GenerationRequest::new(PLAN_SYSTEM_PROMPT, build_plan_prompt(plan_type, &ctx));
        info!(user_id = %user_id, plan_type = %plan_type, generator = generator.name(), "Generating plan");

        let with_targets = |e| match targets {
            Some(t) => ApiError::generation_with_targets(e, t),
            None => ApiError::from(e),
        };
        let text = generator.generate(&request).await.map_err(with_targets)?;
        let plan_data = extract_json(&text).map_err(with_targets)?;

        let titles = daily_task_titles(&plan_data);
        let plan = PlanRepository::create(
            db,
            CreatePlan {
                user_id,
                plan_type: plan_type.as_str().to_string(),
                title: string_field(&plan_data, "title")
                    .unwrap_or_else(|| plan_type.default_title().to_string()),
                description: Some(
                    string_field(&plan_data, "description")
                        .unwrap_or_else(|| DEFAULT_PLAN_DESCRIPTION.to_string()),
                ),
                targets: targets.map(|t| serde_json::json!(t)),
                plan_data,
            },
        )
        .await?;

        let tasks = schedule_tasks(user_id, plan.id, plan_type, &titles, Utc::now().date_naive());
        let tasks_created = match TaskRepository::create_many(db, &tasks).await {
            Ok(count) => count as usize,
            Err(e) => {
                warn!(user_id = %user_id, plan_id = %plan.id, "Failed to create daily tasks: {:?}", e);
                0
            }
        };

        info!(
            user_id = %user_id,
            plan_type = %plan_type,
            plan_id = %plan.id,
            tasks_created,
            "Plan created"
        );

        Ok(GeneratePlanResponse {
            plan: plan_response(plan)?,
            tasks_created,
        })
    }

    /// Active plans, newest first
    pub async fn list_active(db: &PgPool, user_id: Uuid) -> Result<Vec<PlanResponse>, ApiError> {
        PlanRepository::list_active(db, user_id)
            .await?
            .into_iter()
            .map(plan_response)
            .collect()
    }

    /// Deactivate a plan. Its tasks are kept.
    pub async fn deactivate(db: &PgPool, user_id: Uuid, plan_id: Uuid) -> Result<(), ApiError> {
        if PlanRepository::deactivate(db, user_id, plan_id).await? {
            info!(user_id = %user_id, plan_id = %plan_id, "Plan deactivated");
            Ok(())
        } else {
            Err(ApiError::NotFound("Plan not found".to_string()))
        }
    }
}
