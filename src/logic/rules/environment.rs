use super::AlertRule;
use crate::models::{AlertKind, AlertRecord, CropProfile, SensorReading};

/// Soil moisture (%) below which a plot is considered dry, for every crop.
pub const SOIL_DRY_BELOW: f64 = 30.0;
/// Soil moisture (%) above which a plot is considered waterlogged, for every crop.
pub const SOIL_WET_ABOVE: f64 = 80.0;

/// Air temperature against the crop's optimal range
pub struct TemperatureRule;

impl AlertRule for TemperatureRule {
    fn id(&self) -> &'static str {
        "temperature"
    }

    fn name(&self) -> &'static str {
        "Temperature Range"
    }

    fn evaluate(
        &self,
        reading: &SensorReading,
        profile: &CropProfile,
        garden_label: &str,
    ) -> Option<AlertRecord> {
        let range = profile.optimal_temperature;
        let temp = reading.temperature;

        let (kind, relation) = if range.is_below(temp) {
            (AlertKind::TemperatureLow, "below")
        } else if range.is_above(temp) {
            (AlertKind::TemperatureHigh, "above")
        } else {
            return None;
        };

        Some(AlertRecord::new(
            kind,
            format!(
                "Current temperature {}°C is {} the optimal {}°C for {}",
                temp, relation, range, profile.name
            ),
            garden_label,
        ))
    }
}

/// Relative humidity against the crop's optimal range
pub struct HumidityRule;

impl AlertRule for HumidityRule {
    fn id(&self) -> &'static str {
        "humidity"
    }

    fn name(&self) -> &'static str {
        "Humidity Range"
    }

    fn evaluate(
        &self,
        reading: &SensorReading,
        profile: &CropProfile,
        garden_label: &str,
    ) -> Option<AlertRecord> {
        let range = profile.optimal_humidity;
        let humidity = reading.humidity;

        let (kind, description) = if range.is_below(humidity) {
            (
                AlertKind::HumidityLow,
                format!(
                    "Current humidity {}% is below the optimal {}%; water more often",
                    humidity, range
                ),
            )
        } else if range.is_above(humidity) {
            (
                AlertKind::HumidityHigh,
                format!(
                    "Current humidity {}% is above the optimal {}%; watch for disease",
                    humidity, range
                ),
            )
        } else {
            return None;
        };

        Some(AlertRecord::new(kind, description, garden_label))
    }
}

/// Soil moisture against fixed global thresholds. Not crop-specific.
pub struct SoilMoistureRule;

impl AlertRule for SoilMoistureRule {
    fn id(&self) -> &'static str {
        "soil_moisture"
    }

    fn name(&self) -> &'static str {
        "Soil Moisture"
    }

    fn evaluate(
        &self,
        reading: &SensorReading,
        _profile: &CropProfile,
        garden_label: &str,
    ) -> Option<AlertRecord> {
        let moisture = reading.soil_moisture;

        if moisture < SOIL_DRY_BELOW {
            Some(AlertRecord::new(
                AlertKind::SoilDry,
                format!("Soil moisture is only {}%; water promptly", moisture),
                garden_label,
            ))
        } else if moisture > SOIL_WET_ABOVE {
            Some(AlertRecord::new(
                AlertKind::SoilWet,
                format!("Soil moisture is {}%; the plot may be waterlogged", moisture),
                garden_label,
            ))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::CropRegistry;
    use crate::models::Priority;

    fn tomato() -> CropProfile {
        CropRegistry::builtin().lookup("tomato").unwrap().clone()
    }

    #[test]
    fn temperature_high_and_low() {
        let profile = tomato();
        let hot = TemperatureRule
            .evaluate(&SensorReading::new(30.0, 70.0, 50.0), &profile, "A1")
            .unwrap();
        assert_eq!(hot.kind, AlertKind::TemperatureHigh);
        assert_eq!(hot.priority, Priority::High);
        assert_eq!(
            hot.description,
            "Current temperature 30°C is above the optimal 15-28°C for Tomato"
        );

        let cold = TemperatureRule
            .evaluate(&SensorReading::new(12.5, 70.0, 50.0), &profile, "A1")
            .unwrap();
        assert_eq!(cold.kind, AlertKind::TemperatureLow);
        assert_eq!(cold.action, "Take measures to keep the plants warm");
    }

    #[test]
    fn temperature_inside_range_and_on_bounds() {
        let profile = tomato();
        for temp in [15.0, 20.0, 28.0] {
            assert!(TemperatureRule
                .evaluate(&SensorReading::new(temp, 70.0, 50.0), &profile, "A1")
                .is_none());
        }
    }

    #[test]
    fn humidity_alerts() {
        let profile = tomato();
        let dry_air = HumidityRule
            .evaluate(&SensorReading::new(20.0, 45.0, 50.0), &profile, "A1")
            .unwrap();
        assert_eq!(dry_air.kind, AlertKind::HumidityLow);
        assert_eq!(dry_air.priority, Priority::Medium);

        let muggy = HumidityRule
            .evaluate(&SensorReading::new(20.0, 91.0, 50.0), &profile, "A1")
            .unwrap();
        assert_eq!(muggy.kind, AlertKind::HumidityHigh);

        assert!(HumidityRule
            .evaluate(&SensorReading::new(20.0, 80.0, 50.0), &profile, "A1")
            .is_none());
    }

    #[test]
    fn soil_thresholds_are_strict() {
        let profile = tomato();
        let check = |m: f64| {
            SoilMoistureRule
                .evaluate(&SensorReading::new(20.0, 70.0, m), &profile, "A1")
                .map(|a| a.kind)
        };
        assert_eq!(check(29.9), Some(AlertKind::SoilDry));
        assert_eq!(check(30.0), None);
        assert_eq!(check(80.0), None);
        assert_eq!(check(80.1), Some(AlertKind::SoilWet));
    }

    #[test]
    fn soil_alert_priorities_differ() {
        let profile = tomato();
        let dry = SoilMoistureRule
            .evaluate(&SensorReading::new(20.0, 70.0, 10.0), &profile, "A1")
            .unwrap();
        let wet = SoilMoistureRule
            .evaluate(&SensorReading::new(20.0, 70.0, 95.0), &profile, "A1")
            .unwrap();
        assert_eq!(dry.priority, Priority::High);
        assert_eq!(wet.priority, Priority::Medium);
    }
}
