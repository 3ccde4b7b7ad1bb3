use crate::models::{CropProfile, GrowthStage};

/// Days on either side of a stage during which its guidance still surfaces.
pub const STAGE_TRANSITION_WINDOW_DAYS: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageWindow<'a> {
    pub stage: &'a GrowthStage,
    pub start_day: i64,
}

impl StageWindow<'_> {
    /// Exclusive end offset of the stage.
    pub fn end_day(&self) -> i64 {
        self.start_day + self.stage.duration_days
    }

    pub fn contains(&self, elapsed_days: i64) -> bool {
        elapsed_days >= self.start_day && elapsed_days < self.end_day()
    }

    fn is_near(&self, elapsed_days: i64) -> bool {
        elapsed_days >= self.start_day - STAGE_TRANSITION_WINDOW_DAYS
            && elapsed_days <= self.end_day() + STAGE_TRANSITION_WINDOW_DAYS
    }
}

/// Every stage with its start offset, in profile order.
pub fn stage_windows(profile: &CropProfile) -> Vec<StageWindow<'_>> {
    let mut start_day = 0;
    profile
        .stages
        .iter()
        .map(|stage| {
            let window = StageWindow { stage, start_day };
            start_day += stage.duration_days;
            window
        })
        .collect()
}

/// Stages whose span, widened by the transition window, covers `elapsed_days`.
/// Near a boundary both the outgoing and incoming stage are returned.
pub fn stages_near(profile: &CropProfile, elapsed_days: i64) -> Vec<StageWindow<'_>> {
    stage_windows(profile)
        .into_iter()
        .filter(|w| w.is_near(elapsed_days))
        .collect()
}

/// The stage the crop is in right now; the final stage once the lifecycle is over.
pub fn current_stage(profile: &CropProfile, elapsed_days: i64) -> Option<StageWindow<'_>> {
    if elapsed_days < 0 {
        return None;
    }
    let windows = stage_windows(profile);
    windows
        .iter()
        .copied()
        .find(|w| w.contains(elapsed_days))
        .or_else(|| windows.last().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::CropRegistry;

    fn tomato() -> CropProfile {
        CropRegistry::builtin().lookup("tomato").unwrap().clone()
    }

    fn names(windows: &[StageWindow<'_>]) -> Vec<String> {
        windows.iter().map(|w| w.stage.name.clone()).collect()
    }

    #[test]
    fn windows_accumulate_start_offsets() {
        let profile = tomato();
        let starts: Vec<i64> = stage_windows(&profile)
            .iter()
            .map(|w| w.start_day)
            .collect();
        assert_eq!(starts, vec![0, 20, 50, 70]);
    }

    #[test]
    fn vegetative_window_is_inclusive_by_two_days() {
        // Vegetative spans [20, 50)
        let profile = tomato();
        for elapsed in 18..=52 {
            assert!(
                names(&stages_near(&profile, elapsed)).contains(&"Vegetative".to_string()),
                "expected Vegetative at day {}",
                elapsed
            );
        }
        assert!(!names(&stages_near(&profile, 17)).contains(&"Vegetative".to_string()));
        assert!(!names(&stages_near(&profile, 53)).contains(&"Vegetative".to_string()));
    }

    #[test]
    fn boundary_returns_both_stages_in_order() {
        let profile = tomato();
        assert_eq!(
            names(&stages_near(&profile, 20)),
            vec!["Seedling", "Vegetative"]
        );
        assert_eq!(
            names(&stages_near(&profile, 49)),
            vec!["Vegetative", "Flowering"]
        );
    }

    #[test]
    fn mid_stage_returns_single_stage() {
        let profile = tomato();
        assert_eq!(names(&stages_near(&profile, 35)), vec!["Vegetative"]);
        assert_eq!(names(&stages_near(&profile, 0)), vec!["Seedling"]);
    }

    #[test]
    fn past_lifecycle_window_is_empty() {
        let profile = tomato();
        assert_eq!(names(&stages_near(&profile, 92)), vec!["Fruiting"]);
        assert!(stages_near(&profile, 93).is_empty());
    }

    #[test]
    fn current_stage_lookup() {
        let profile = tomato();
        assert_eq!(current_stage(&profile, 0).unwrap().stage.name, "Seedling");
        assert_eq!(current_stage(&profile, 20).unwrap().stage.name, "Vegetative");
        assert_eq!(current_stage(&profile, 89).unwrap().stage.name, "Fruiting");
        assert_eq!(current_stage(&profile, 140).unwrap().stage.name, "Fruiting");
        assert!(current_stage(&profile, -3).is_none());
    }
}
