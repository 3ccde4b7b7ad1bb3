use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Priority::Low => "·",
            Priority::Medium => "→",
            Priority::High => "!",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    Watering,
    Fertilizing,
    Weeding,
    StageTask,
    Harvesting,
}

impl ReminderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::Watering => "watering",
            ReminderKind::Fertilizing => "fertilizing",
            ReminderKind::Weeding => "weeding",
            ReminderKind::StageTask => "stage_task",
            ReminderKind::Harvesting => "harvesting",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReminderKind::Watering => "Watering",
            ReminderKind::Fertilizing => "Fertilizing",
            ReminderKind::Weeding => "Weeding",
            ReminderKind::StageTask => "Stage Task",
            ReminderKind::Harvesting => "Harvesting",
        }
    }

    /// Priorities are fixed per task kind.
    pub fn priority(&self) -> Priority {
        match self {
            ReminderKind::Watering => Priority::High,
            ReminderKind::Fertilizing => Priority::Medium,
            ReminderKind::Weeding => Priority::Low,
            ReminderKind::StageTask => Priority::Medium,
            ReminderKind::Harvesting => Priority::High,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "watering" => Some(ReminderKind::Watering),
            "fertilizing" => Some(ReminderKind::Fertilizing),
            "weeding" => Some(ReminderKind::Weeding),
            "stage_task" | "stagetask" => Some(ReminderKind::StageTask),
            "harvesting" => Some(ReminderKind::Harvesting),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A generated care-task notice. Never persisted by the engine itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub kind: ReminderKind,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    pub garden_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
}

impl Reminder {
    pub fn new(
        kind: ReminderKind,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: DateTime<Utc>,
        garden_label: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
            due_date,
            priority: kind.priority(),
            garden_label: garden_label.into(),
            tips: None,
        }
    }

    pub fn with_tips(mut self, tips: impl Into<String>) -> Self {
        self.tips = Some(tips.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    Pending,
    Completed,
    Ignored,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderStatus::Pending => "pending",
            ReminderStatus::Completed => "completed",
            ReminderStatus::Ignored => "ignored",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(ReminderStatus::Pending),
            "completed" | "done" => Some(ReminderStatus::Completed),
            "ignored" | "dismissed" => Some(ReminderStatus::Ignored),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reminder as recorded in the local ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredReminder {
    pub id: i64,
    #[serde(flatten)]
    pub reminder: Reminder,
    pub status: ReminderStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl StoredReminder {
    pub fn is_active(&self) -> bool {
        self.status == ReminderStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderStatistics {
    pub total: u64,
    pub pending: u64,
    pub completed: u64,
    pub ignored: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_priorities_per_kind() {
        assert_eq!(ReminderKind::Watering.priority(), Priority::High);
        assert_eq!(ReminderKind::Fertilizing.priority(), Priority::Medium);
        assert_eq!(ReminderKind::Weeding.priority(), Priority::Low);
        assert_eq!(ReminderKind::StageTask.priority(), Priority::Medium);
        assert_eq!(ReminderKind::Harvesting.priority(), Priority::High);
    }

    #[test]
    fn priority_ordering() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn reminder_kind_from_str() {
        assert_eq!(
            ReminderKind::from_str("stage_task"),
            Some(ReminderKind::StageTask)
        );
        assert_eq!(
            ReminderKind::from_str("Stage Task"),
            Some(ReminderKind::StageTask)
        );
        assert_eq!(
            ReminderKind::from_str("WATERING"),
            Some(ReminderKind::Watering)
        );
        assert_eq!(ReminderKind::from_str("pruning"), None);
    }

    #[test]
    fn reminder_serializes_with_snake_case_kind() {
        let due = Utc.with_ymd_and_hms(2026, 5, 3, 0, 0, 0).unwrap();
        let reminder = Reminder::new(
            ReminderKind::StageTask,
            "Seedling care",
            "Keep warm",
            due,
            "Plot A-12",
        );
        let json = serde_json::to_value(&reminder).unwrap();
        assert_eq!(json["kind"], "stage_task");
        assert_eq!(json["priority"], "medium");
        assert!(json.get("tips").is_none());
    }

    #[test]
    fn status_from_str_aliases() {
        assert_eq!(
            ReminderStatus::from_str("done"),
            Some(ReminderStatus::Completed)
        );
        assert_eq!(
            ReminderStatus::from_str("Pending"),
            Some(ReminderStatus::Pending)
        );
        assert_eq!(ReminderStatus::from_str("archived"), None);
    }
}
