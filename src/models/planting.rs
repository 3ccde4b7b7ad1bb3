use serde::{Deserialize, Serialize};

/// What a caller knows about one planting when asking for reminders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantingContext {
    pub crop_type: String,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub planting_date: String,
    pub garden_label: String,
}

impl PlantingContext {
    pub fn new(
        crop_type: impl Into<String>,
        planting_date: impl Into<String>,
        garden_label: impl Into<String>,
    ) -> Self {
        Self {
            crop_type: crop_type.into(),
            planting_date: planting_date.into(),
            garden_label: garden_label.into(),
        }
    }
}
