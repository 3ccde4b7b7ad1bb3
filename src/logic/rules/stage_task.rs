use super::{CareContext, CareRule};
use crate::error::Result;
use crate::logic::schedule::due_date;
use crate::logic::stages::stages_near;
use crate::models::{Reminder, ReminderKind};

/// Stage guidance for every growth stage the planting is in or about to
/// enter, using the transition window from the stage tracker.
pub struct StageTaskRule;

impl CareRule for StageTaskRule {
    fn id(&self) -> &'static str {
        "stage_task"
    }

    fn name(&self) -> &'static str {
        "Growth Stage Tasks"
    }

    fn evaluate(&self, ctx: &CareContext<'_>) -> Result<Vec<Reminder>> {
        stages_near(ctx.profile, ctx.elapsed_days)
            .into_iter()
            .map(|window| {
                let stage = window.stage;
                Ok(Reminder::new(
                    ReminderKind::StageTask,
                    format!("{} Care", stage.name),
                    format!(
                        "{} is entering the {} stage: {}",
                        ctx.profile.name,
                        stage.name,
                        stage.tasks.join(", ")
                    ),
                    due_date(ctx.planted_at, window.start_day)?,
                    ctx.garden_label,
                )
                .with_tips(stage.tasks.join("; ")))
            })
            .collect()
    }
}
