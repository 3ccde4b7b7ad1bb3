use crate::error::{PlotCareError, Result};
use serde::{Deserialize, Serialize};

/// Upper bound for any day count in a crop profile.
pub const MAX_PROFILE_DAYS: i64 = 3650;

/// Closed interval `[min, max]` of an environmental quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimalRange {
    pub min: f64,
    pub max: f64,
}

impl OptimalRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn is_below(&self, value: f64) -> bool {
        value < self.min
    }

    pub fn is_above(&self, value: f64) -> bool {
        value > self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        !self.is_below(value) && !self.is_above(value)
    }
}

impl std::fmt::Display for OptimalRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthStage {
    pub name: String,
    pub duration_days: i64,
    pub tasks: Vec<String>,
}

impl GrowthStage {
    pub fn new(name: &str, duration_days: i64, tasks: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            duration_days,
            tasks: tasks.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Static growth and care parameters for one crop type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub local_name: Option<String>,
    pub growth_duration_days: i64,
    pub watering_interval_days: i64,
    pub fertilizing_interval_days: i64,
    pub weeding_interval_days: i64,
    pub optimal_temperature: OptimalRange,
    pub optimal_humidity: OptimalRange,
    pub stages: Vec<GrowthStage>,
}

impl CropProfile {
    /// Checks the invariants the scheduler and stage tracker rely on.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| PlotCareError::InvalidProfile {
            crop: self.id.clone(),
            reason,
        };

        if self.id.trim().is_empty() {
            return Err(invalid("crop id is empty".into()));
        }
        if self.growth_duration_days <= 0 || self.growth_duration_days > MAX_PROFILE_DAYS {
            return Err(invalid(format!(
                "growth duration must be between 1 and {} days, got {}",
                MAX_PROFILE_DAYS, self.growth_duration_days
            )));
        }

        for (label, interval) in [
            ("watering", self.watering_interval_days),
            ("fertilizing", self.fertilizing_interval_days),
            ("weeding", self.weeding_interval_days),
        ] {
            if interval <= 0 || interval > MAX_PROFILE_DAYS {
                return Err(invalid(format!(
                    "{} interval must be between 1 and {} days, got {}",
                    label, MAX_PROFILE_DAYS, interval
                )));
            }
        }

        for (label, range) in [
            ("temperature", self.optimal_temperature),
            ("humidity", self.optimal_humidity),
        ] {
            if !range.min.is_finite() || !range.max.is_finite() {
                return Err(invalid(format!(
                    "optimal {} range must have finite bounds, got {}",
                    label, range
                )));
            }
            if range.min > range.max {
                return Err(invalid(format!(
                    "optimal {} range is inverted ({} > {})",
                    label, range.min, range.max
                )));
            }
        }

        if self.stages.is_empty() {
            return Err(invalid("at least one growth stage is required".into()));
        }
        if let Some(stage) = self
            .stages
            .iter()
            .find(|s| s.duration_days <= 0 || s.duration_days > MAX_PROFILE_DAYS)
        {
            return Err(invalid(format!(
                "stage '{}' duration must be between 1 and {} days, got {}",
                stage.name, MAX_PROFILE_DAYS, stage.duration_days
            )));
        }

        let stage_total = self.stage_total_days();
        if stage_total != self.growth_duration_days {
            return Err(invalid(format!(
                "stage durations sum to {} days but growth duration is {}",
                stage_total, self.growth_duration_days
            )));
        }

        Ok(())
    }

    pub fn stage_total_days(&self) -> i64 {
        self.stages.iter().map(|s| s.duration_days).sum()
    }

    pub fn display_label(&self) -> String {
        match &self.local_name {
            Some(local) => format!("{} ({})", self.name, local),
            None => self.name.clone(),
        }
    }

    pub fn catalog_entry(&self) -> CropCatalogEntry {
        CropCatalogEntry {
            value: self.id.clone(),
            label: self.name.clone(),
            growth_days: self.growth_duration_days,
        }
    }
}

/// One row of the crop selection list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropCatalogEntry {
    pub value: String,
    pub label: String,
    pub growth_days: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> CropProfile {
        CropProfile {
            id: "radish".into(),
            name: "Radish".into(),
            local_name: None,
            growth_duration_days: 30,
            watering_interval_days: 2,
            fertilizing_interval_days: 10,
            weeding_interval_days: 7,
            optimal_temperature: OptimalRange::new(10.0, 20.0),
            optimal_humidity: OptimalRange::new(50.0, 70.0),
            stages: vec![
                GrowthStage::new("Germination", 5, &["keep moist"]),
                GrowthStage::new("Growth", 25, &["thin seedlings"]),
            ],
        }
    }

    #[test]
    fn valid_profile_passes() {
        assert!(sample_profile().validate().is_ok());
    }

    #[test]
    fn display_label_includes_local_name() {
        let mut profile = sample_profile();
        assert_eq!(profile.display_label(), "Radish");
        profile.local_name = Some("Rettich".into());
        assert_eq!(profile.display_label(), "Radish (Rettich)");
    }

    #[test]
    fn stage_sum_mismatch_rejected() {
        let mut profile = sample_profile();
        profile.stages[1].duration_days = 20;
        let err = profile.validate().unwrap_err();
        assert!(matches!(err, PlotCareError::InvalidProfile { .. }));
        assert!(err.to_string().contains("sum to 25"));
    }

    #[test]
    fn zero_interval_rejected() {
        let mut profile = sample_profile();
        profile.fertilizing_interval_days = 0;
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("fertilizing interval"));
    }

    #[test]
    fn oversized_interval_rejected() {
        let mut profile = sample_profile();
        profile.watering_interval_days = i64::MAX / 2;
        let err = profile.validate().unwrap_err();
        assert!(matches!(err, PlotCareError::InvalidProfile { .. }));
        assert!(err.to_string().contains("watering interval"));

        let mut profile = sample_profile();
        profile.weeding_interval_days = MAX_PROFILE_DAYS;
        assert!(profile.validate().is_ok());
        profile.weeding_interval_days = MAX_PROFILE_DAYS + 1;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn oversized_stages_rejected_before_summing() {
        let mut profile = sample_profile();
        profile.stages = vec![
            GrowthStage::new("Long", i64::MAX, &[]),
            GrowthStage::new("Longer", i64::MAX, &[]),
        ];
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("stage 'Long'"));
    }

    #[test]
    fn non_finite_range_rejected() {
        let mut profile = sample_profile();
        profile.optimal_temperature = OptimalRange::new(f64::NAN, f64::NAN);
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("finite"));

        let mut profile = sample_profile();
        profile.optimal_humidity = OptimalRange::new(40.0, f64::INFINITY);
        assert!(profile.validate().is_err());
    }

    #[test]
    fn inverted_range_rejected() {
        let mut profile = sample_profile();
        profile.optimal_humidity = OptimalRange::new(80.0, 60.0);
        assert!(profile.validate().is_err());
    }

    #[test]
    fn empty_stage_list_rejected() {
        let mut profile = sample_profile();
        profile.stages.clear();
        assert!(profile.validate().is_err());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let range = OptimalRange::new(15.0, 28.0);
        assert!(range.contains(15.0));
        assert!(range.contains(28.0));
        assert!(range.is_below(14.9));
        assert!(range.is_above(28.1));
        assert!(!range.is_below(15.0));
        assert!(!range.is_above(28.0));
    }

    #[test]
    fn catalog_entry_uses_id_and_name() {
        let entry = sample_profile().catalog_entry();
        assert_eq!(entry.value, "radish");
        assert_eq!(entry.label, "Radish");
        assert_eq!(entry.growth_days, 30);
    }
}
