use super::{CareContext, CareRule};
use crate::error::Result;
use crate::logic::schedule::due_date;
use crate::models::{Reminder, ReminderKind};

/// How many days before the end of the lifecycle the harvest countdown starts.
pub const HARVEST_LEAD_DAYS: i64 = 5;

/// Harvest countdown
///
/// Fires once `elapsed >= growth_duration - 5` and keeps firing after the
/// expected harvest day, reporting how overdue the crop is.
pub struct HarvestRule;

impl CareRule for HarvestRule {
    fn id(&self) -> &'static str {
        "harvesting"
    }

    fn name(&self) -> &'static str {
        "Harvest Countdown"
    }

    fn evaluate(&self, ctx: &CareContext<'_>) -> Result<Vec<Reminder>> {
        let growth_days = ctx.profile.growth_duration_days;
        if ctx.elapsed_days < growth_days - HARVEST_LEAD_DAYS {
            return Ok(Vec::new());
        }

        let days_remaining = growth_days - ctx.elapsed_days;
        let name = &ctx.profile.name;
        let description = match days_remaining {
            d if d > 1 => format!("Your {} should be ready to harvest in {} days", name, d),
            1 => format!("Your {} should be ready to harvest in 1 day", name),
            0 => format!("Your {} should be ready to harvest today", name),
            d => format!(
                "Your {} was expected to be ready {} days ago ({} days remaining)",
                name, -d, d
            ),
        };

        Ok(vec![Reminder::new(
            ReminderKind::Harvesting,
            format!("{} Nearly Ready", name),
            description,
            due_date(ctx.planted_at, growth_days)?,
            ctx.garden_label,
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::CropRegistry;
    use crate::models::{CropProfile, Priority};
    use chrono::{TimeZone, Utc};

    fn evaluate(profile: &CropProfile, elapsed_days: i64) -> Vec<Reminder> {
        let ctx = CareContext {
            profile,
            planted_at: Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap(),
            elapsed_days,
            garden_label: "Plot 9",
        };
        HarvestRule.evaluate(&ctx).unwrap()
    }

    #[test]
    fn countdown_starts_five_days_out() {
        let registry = CropRegistry::builtin();
        let tomato = registry.lookup("tomato").unwrap();
        assert!(evaluate(tomato, 84).is_empty());

        let reminders = evaluate(tomato, 85);
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].priority, Priority::High);
        assert!(reminders[0].description.contains("in 5 days"));
        assert_eq!(
            reminders[0].due_date,
            Utc.with_ymd_and_hms(2026, 4, 10, 0, 0, 0).unwrap()
        );
        assert!(reminders[0].tips.is_none());
    }

    #[test]
    fn overdue_reports_negative_remaining() {
        let registry = CropRegistry::builtin();
        let spinach = registry.lookup("spinach").unwrap();
        assert!(evaluate(spinach, 35)[0].description.contains("today"));
        let overdue = evaluate(spinach, 38);
        assert!(overdue[0].description.contains("3 days ago"));
        assert!(overdue[0].description.contains("-3 days remaining"));
    }
}
