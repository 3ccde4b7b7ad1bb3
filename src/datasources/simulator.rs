use crate::models::SensorReading;
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::f64::consts::PI;

/// Weather overlays for exercising alert paths on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherEvent {
    Rain,
    HeatWave,
    Cold,
    Drought,
}

impl WeatherEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherEvent::Rain => "rain",
            WeatherEvent::HeatWave => "heat_wave",
            WeatherEvent::Cold => "cold",
            WeatherEvent::Drought => "drought",
        }
    }

    fn apply(&self, reading: &mut SensorReading) {
        match self {
            WeatherEvent::Rain => {
                reading.soil_moisture = 82.0;
                reading.humidity = 90.0;
                reading.light_intensity = Some(1200.0);
            }
            WeatherEvent::HeatWave => {
                reading.temperature = 38.0;
                reading.humidity = 32.0;
                reading.soil_moisture = 22.0;
            }
            WeatherEvent::Cold => {
                reading.temperature = 4.0;
                reading.humidity = 78.0;
            }
            WeatherEvent::Drought => {
                reading.soil_moisture = 15.0;
                reading.humidity = 38.0;
            }
        }
    }
}

impl std::fmt::Display for WeatherEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deterministic telemetry for plots without sensors: a seasonal swing plus a
/// day/night cycle, and a soil moisture curve that decays from a daily 08:00 watering.
#[derive(Debug, Clone, Default)]
pub struct TelemetrySimulator {
    event: Option<WeatherEvent>,
}

impl TelemetrySimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event(mut self, event: WeatherEvent) -> Self {
        self.event = Some(event);
        self
    }

    pub fn reading_at(&self, at: DateTime<Utc>) -> SensorReading {
        let hour = at.hour() as f64 + at.minute() as f64 / 60.0;
        let day_of_year = at.ordinal() as f64;

        let mut reading = SensorReading::new(
            round1(temperature(day_of_year, hour)),
            round1(humidity(hour)),
            round1(soil_moisture(hour)),
        )
        .with_light(round1(light(hour)));

        if let Some(event) = self.event {
            tracing::debug!(event = %event, "Applying simulated weather event");
            event.apply(&mut reading);
        }

        reading
    }
}

fn daily_wave(hour: f64) -> f64 {
    ((hour - 6.0) * PI / 12.0).sin()
}

fn temperature(day_of_year: f64, hour: f64) -> f64 {
    let seasonal = 20.0 + 10.0 * ((day_of_year - 80.0) * 2.0 * PI / 365.0).sin();
    (seasonal + 5.0 * daily_wave(hour)).clamp(5.0, 40.0)
}

fn humidity(hour: f64) -> f64 {
    (65.0 - 20.0 * daily_wave(hour)).clamp(30.0, 95.0)
}

fn soil_moisture(hour: f64) -> f64 {
    let since_watering = (hour - 8.0).rem_euclid(24.0);
    let loss = 25.0 * (1.0 - (-since_watering / 12.0).exp());
    (70.0 - loss).clamp(15.0, 85.0)
}

fn light(hour: f64) -> f64 {
    if (6.0..20.0).contains(&hour) {
        (8000.0 * ((hour - 6.0) * PI / 14.0).sin()).max(0.0)
    } else {
        0.0
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
