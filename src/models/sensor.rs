use super::reminder::{Priority, ReminderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetrySource {
    Backend,
    Simulator,
    Manual,
}

impl TelemetrySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TelemetrySource::Backend => "Plot Backend",
            TelemetrySource::Simulator => "Simulator",
            TelemetrySource::Manual => "Manual",
        }
    }
}

impl std::fmt::Display for TelemetrySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Point-in-time environment of one plot. Temperature in °C, the rest in %.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub temperature: f64,
    pub humidity: f64,
    pub soil_moisture: f64,
    /// Reported by light sensors but not evaluated yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_intensity: Option<f64>,
}

impl SensorReading {
    pub fn new(temperature: f64, humidity: f64, soil_moisture: f64) -> Self {
        Self {
            temperature,
            humidity,
            soil_moisture,
            light_intensity: None,
        }
    }

    pub fn with_light(mut self, light_intensity: f64) -> Self {
        self.light_intensity = Some(light_intensity);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    TemperatureLow,
    TemperatureHigh,
    HumidityLow,
    HumidityHigh,
    SoilDry,
    SoilWet,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::TemperatureLow => "temperature_low",
            AlertKind::TemperatureHigh => "temperature_high",
            AlertKind::HumidityLow => "humidity_low",
            AlertKind::HumidityHigh => "humidity_high",
            AlertKind::SoilDry => "soil_dry",
            AlertKind::SoilWet => "soil_wet",
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            AlertKind::TemperatureLow | AlertKind::TemperatureHigh => Priority::High,
            AlertKind::HumidityLow | AlertKind::HumidityHigh => Priority::Medium,
            AlertKind::SoilDry => Priority::High,
            AlertKind::SoilWet => Priority::Medium,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AlertKind::TemperatureLow => "Temperature Too Low",
            AlertKind::TemperatureHigh => "Temperature Too High",
            AlertKind::HumidityLow => "Humidity Too Low",
            AlertKind::HumidityHigh => "Humidity Too High",
            AlertKind::SoilDry => "Soil Too Dry",
            AlertKind::SoilWet => "Soil Waterlogged",
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            AlertKind::TemperatureLow => "Take measures to keep the plants warm",
            AlertKind::TemperatureHigh => "Provide shade and cool the plot",
            AlertKind::HumidityLow => "Mist the plants or water more often",
            AlertKind::HumidityHigh => "Improve ventilation to prevent disease",
            AlertKind::SoilDry => "Water immediately",
            AlertKind::SoilWet => "Check drainage and pause watering",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "temperature_low" => Some(AlertKind::TemperatureLow),
            "temperature_high" => Some(AlertKind::TemperatureHigh),
            "humidity_low" => Some(AlertKind::HumidityLow),
            "humidity_high" => Some(AlertKind::HumidityHigh),
            "soil_dry" => Some(AlertKind::SoilDry),
            "soil_wet" => Some(AlertKind::SoilWet),
            _ => None,
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// A threshold breach raised from a sensor reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub kind: AlertKind,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub garden_label: String,
    pub action: String,
}

impl AlertRecord {
    pub fn new(
        kind: AlertKind,
        description: impl Into<String>,
        garden_label: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            description: description.into(),
            priority: kind.priority(),
            garden_label: garden_label.into(),
            action: kind.action().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAlert {
    pub id: i64,
    #[serde(flatten)]
    pub alert: AlertRecord,
    pub status: ReminderStatus,
    pub created_at: DateTime<Utc>,
}
