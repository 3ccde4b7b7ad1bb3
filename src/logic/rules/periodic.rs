use super::{CareContext, CareRule};
use crate::error::Result;
use crate::logic::schedule::{due_date, next_occurrence};
use crate::models::{Reminder, ReminderKind};

/// Watering cadence. Emitted even after the growth window closes.
pub struct WateringRule;

impl CareRule for WateringRule {
    fn id(&self) -> &'static str {
        "watering"
    }

    fn name(&self) -> &'static str {
        "Watering Schedule"
    }

    fn evaluate(&self, ctx: &CareContext<'_>) -> Result<Vec<Reminder>> {
        let offset = next_occurrence(ctx.elapsed_days, ctx.profile.watering_interval_days)?;

        Ok(vec![Reminder::new(
            ReminderKind::Watering,
            "Watering Reminder",
            format!("Water the {} to keep the soil moist", ctx.profile.name),
            due_date(ctx.planted_at, offset)?,
            ctx.garden_label,
        )
        .with_tips("Water in the early morning or evening; avoid the midday heat")])
    }
}

/// Fertilizing cadence, limited to the growth window.
pub struct FertilizingRule;

impl CareRule for FertilizingRule {
    fn id(&self) -> &'static str {
        "fertilizing"
    }

    fn name(&self) -> &'static str {
        "Fertilizing Schedule"
    }

    fn evaluate(&self, ctx: &CareContext<'_>) -> Result<Vec<Reminder>> {
        let offset = next_occurrence(ctx.elapsed_days, ctx.profile.fertilizing_interval_days)?;
        if offset > ctx.profile.growth_duration_days {
            return Ok(Vec::new());
        }

        Ok(vec![Reminder::new(
            ReminderKind::Fertilizing,
            "Fertilizing Reminder",
            format!("Fertilize the {} to support growth", ctx.profile.name),
            due_date(ctx.planted_at, offset)?,
            ctx.garden_label,
        )
        .with_tips("Pick a fertilizer suited to the current growth stage")])
    }
}

/// Weeding cadence, limited to the growth window.
pub struct WeedingRule;

impl CareRule for WeedingRule {
    fn id(&self) -> &'static str {
        "weeding"
    }

    fn name(&self) -> &'static str {
        "Weeding Schedule"
    }

    fn evaluate(&self, ctx: &CareContext<'_>) -> Result<Vec<Reminder>> {
        let offset = next_occurrence(ctx.elapsed_days, ctx.profile.weeding_interval_days)?;
        if offset > ctx.profile.growth_duration_days {
            return Ok(Vec::new());
        }

        Ok(vec![Reminder::new(
            ReminderKind::Weeding,
            "Weeding Reminder",
            format!("Clear the weeds around the {}", ctx.profile.name),
            due_date(ctx.planted_at, offset)?,
            ctx.garden_label,
        )
        .with_tips("Pull weeds out by the root without disturbing crop roots")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::CropRegistry;
    use crate::models::{CropProfile, Priority};
    use chrono::{DateTime, TimeZone, Utc};

    fn planted() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap()
    }

    fn ctx(profile: &CropProfile, elapsed_days: i64) -> CareContext<'_> {
        CareContext {
            profile,
            planted_at: planted(),
            elapsed_days,
            garden_label: "Plot 7",
        }
    }

    #[test]
    fn watering_due_on_next_interval() {
        let registry = CropRegistry::builtin();
        let tomato = registry.lookup("tomato").unwrap();
        let reminders = WateringRule.evaluate(&ctx(tomato, 5)).unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].due_date, due_date(planted(), 6).unwrap());
        assert_eq!(reminders[0].priority, Priority::High);
        assert_eq!(reminders[0].garden_label, "Plot 7");
        assert!(reminders[0].tips.is_some());
    }

    #[test]
    fn watering_continues_past_lifecycle() {
        let registry = CropRegistry::builtin();
        let tomato = registry.lookup("tomato").unwrap();
        let reminders = WateringRule.evaluate(&ctx(tomato, 120)).unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].due_date, due_date(planted(), 122).unwrap());
    }

    #[test]
    fn fertilizing_stops_after_growth_window() {
        let registry = CropRegistry::builtin();
        let tomato = registry.lookup("tomato").unwrap();
        // next fertilizing at 84 is still inside 90 days
        let inside = FertilizingRule.evaluate(&ctx(tomato, 80)).unwrap();
        assert_eq!(inside.len(), 1);
        assert_eq!(inside[0].due_date, due_date(planted(), 84).unwrap());
        // next fertilizing at 98 is past day 90
        assert!(FertilizingRule.evaluate(&ctx(tomato, 84)).unwrap().is_empty());
    }

    #[test]
    fn weeding_guard_allows_exact_lifecycle_end() {
        let registry = CropRegistry::builtin();
        let tomato = registry.lookup("tomato").unwrap();
        // weeding every 10 days, day 90 is the last allowed offset
        let at_end = WeedingRule.evaluate(&ctx(tomato, 85)).unwrap();
        assert_eq!(at_end.len(), 1);
        assert_eq!(at_end[0].due_date, due_date(planted(), 90).unwrap());
        assert_eq!(at_end[0].priority, Priority::Low);
        assert!(WeedingRule.evaluate(&ctx(tomato, 90)).unwrap().is_empty());
    }

    #[test]
    fn unrepresentable_due_date_is_an_error() {
        let mut bigcrop = CropRegistry::builtin().lookup("tomato").unwrap().clone();
        bigcrop.watering_interval_days = i64::MAX / 2;
        let err = WateringRule.evaluate(&ctx(&bigcrop, 0)).unwrap_err();
        assert!(matches!(err, crate::error::PlotCareError::DateOutOfRange(_)));
    }
}
