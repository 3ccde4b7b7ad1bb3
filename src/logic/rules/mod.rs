pub mod engine;
pub mod environment;
pub mod harvest;
pub mod periodic;
pub mod stage_task;

pub use engine::RulesEngine;

use crate::error::Result;
use crate::models::{AlertRecord, CropProfile, Reminder, SensorReading};
use chrono::{DateTime, Utc};

/// Everything a care rule needs to know about one planting at one instant.
#[derive(Debug, Clone, Copy)]
pub struct CareContext<'a> {
    pub profile: &'a CropProfile,
    pub planted_at: DateTime<Utc>,
    pub elapsed_days: i64,
    pub garden_label: &'a str,
}

/// Trait for schedule-driven care rules
pub trait CareRule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Produce the reminders this rule owes for the planting, possibly none
    fn evaluate(&self, ctx: &CareContext<'_>) -> Result<Vec<Reminder>>;
}

/// Trait for sensor-driven threshold rules
pub trait AlertRule: Send + Sync {
    fn id(&self) -> &'static str;

    fn name(&self) -> &'static str;

    /// Evaluate the reading and return an alert if a threshold is breached
    fn evaluate(
        &self,
        reading: &SensorReading,
        profile: &CropProfile,
        garden_label: &str,
    ) -> Option<AlertRecord>;
}
