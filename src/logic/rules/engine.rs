use super::{
    environment::{HumidityRule, SoilMoistureRule, TemperatureRule},
    harvest::HarvestRule,
    periodic::{FertilizingRule, WateringRule, WeedingRule},
    stage_task::StageTaskRule,
    AlertRule, CareContext, CareRule,
};
use crate::error::{PlotCareError, Result};
use crate::logic::registry::CropRegistry;
use crate::logic::schedule::{elapsed_days, parse_planting_date};
use crate::models::{AlertRecord, CropCatalogEntry, PlantingContext, Reminder, SensorReading};
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub struct RulesEngine {
    registry: Arc<CropRegistry>,
    care_rules: Vec<Box<dyn CareRule>>,
    alert_rules: Vec<Box<dyn AlertRule>>,
}

impl RulesEngine {
    pub fn new(registry: Arc<CropRegistry>) -> Self {
        // Rule order is output order.
        let care_rules: Vec<Box<dyn CareRule>> = vec![
            Box::new(WateringRule),
            Box::new(FertilizingRule),
            Box::new(WeedingRule),
            Box::new(StageTaskRule),
            Box::new(HarvestRule),
        ];

        let alert_rules: Vec<Box<dyn AlertRule>> = vec![
            Box::new(TemperatureRule),
            Box::new(HumidityRule),
            Box::new(SoilMoistureRule),
        ];

        Self {
            registry,
            care_rules,
            alert_rules,
        }
    }

    pub fn registry(&self) -> &CropRegistry {
        &self.registry
    }

    /// Outstanding care tasks for one planting as of `now`.
    ///
    /// An unknown crop type yields an empty list rather than an error so that
    /// callers rendering a task list are never blocked by catalog drift.
    pub fn generate(
        &self,
        planting: &PlantingContext,
        now: DateTime<Utc>,
    ) -> Result<Vec<Reminder>> {
        let Some(profile) = self.registry.lookup(&planting.crop_type) else {
            tracing::warn!(crop = %planting.crop_type, "Unknown crop type, no reminders generated");
            return Ok(Vec::new());
        };

        let planted_at = parse_planting_date(&planting.planting_date)?;
        let elapsed = elapsed_days(planted_at, now);
        if elapsed < 0 {
            return Err(PlotCareError::PlantingInFuture(
                planting.planting_date.clone(),
            ));
        }

        let ctx = CareContext {
            profile,
            planted_at,
            elapsed_days: elapsed,
            garden_label: &planting.garden_label,
        };

        let mut reminders = Vec::new();
        for rule in &self.care_rules {
            let produced = rule.evaluate(&ctx)?;
            tracing::trace!(rule = rule.id(), count = produced.len(), "Care rule evaluated");
            reminders.extend(produced);
        }

        tracing::debug!(
            crop = %profile.id,
            garden = %planting.garden_label,
            elapsed_days = elapsed,
            count = reminders.len(),
            "Generated reminders"
        );

        Ok(reminders)
    }

    pub fn generate_reminders(
        &self,
        crop_type: &str,
        planting_date: &str,
        garden_label: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Reminder>> {
        self.generate(
            &PlantingContext::new(crop_type, planting_date, garden_label),
            now,
        )
    }

    /// Threshold alerts for a reading; at most one per signal category.
    pub fn evaluate_environment(
        &self,
        reading: &SensorReading,
        crop_type: &str,
        garden_label: &str,
    ) -> Vec<AlertRecord> {
        let Some(profile) = self.registry.lookup(crop_type) else {
            tracing::warn!(crop = %crop_type, "Unknown crop type, environment not evaluated");
            return Vec::new();
        };

        self.alert_rules
            .iter()
            .filter_map(|rule| rule.evaluate(reading, profile, garden_label))
            .collect()
    }

    pub fn evaluate_alert_rule(
        &self,
        rule_id: &str,
        reading: &SensorReading,
        crop_type: &str,
        garden_label: &str,
    ) -> Option<AlertRecord> {
        let profile = self.registry.lookup(crop_type)?;
        self.alert_rules
            .iter()
            .find(|r| r.id() == rule_id)
            .and_then(|rule| rule.evaluate(reading, profile, garden_label))
    }

    pub fn crop_catalog(&self) -> Vec<CropCatalogEntry> {
        self.registry.list_all()
    }

    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.care_rules
            .iter()
            .map(|r| (r.id(), r.name()))
            .chain(self.alert_rules.iter().map(|r| (r.id(), r.name())))
            .collect()
    }
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::new(Arc::new(CropRegistry::builtin()))
    }
}
