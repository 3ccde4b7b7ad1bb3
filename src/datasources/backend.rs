use crate::config::BackendConfig;
use crate::error::{PlotCareError, Result};
use crate::models::SensorReading;
use serde::Deserialize;

/// Client for the plot-rental REST backend's telemetry endpoints.
pub struct BackendClient {
    client: reqwest::Client,
    config: BackendConfig,
}

#[derive(Debug, Deserialize)]
pub struct GardenStatus {
    #[serde(default)]
    pub sensors: Vec<SensorStatus>,
    #[serde(default)]
    pub last_update: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SensorStatus {
    pub sensor_type: String,
    pub current_value: Option<f64>,
    #[serde(default)]
    pub is_abnormal: bool,
}

impl GardenStatus {
    fn value_of(&self, sensor_type: &str) -> Option<f64> {
        self.sensors
            .iter()
            .find(|s| s.sensor_type == sensor_type)
            .and_then(|s| s.current_value)
    }

    /// Fold the per-sensor list into one reading. Temperature, humidity and
    /// soil moisture are required; light is optional.
    pub fn to_reading(&self) -> Result<SensorReading> {
        let required = |sensor_type: &str| {
            self.value_of(sensor_type).ok_or_else(|| {
                PlotCareError::DataSourceUnavailable(format!(
                    "backend reported no {} reading",
                    sensor_type
                ))
            })
        };

        let mut reading = SensorReading::new(
            required("temperature")?,
            required("humidity")?,
            required("soil_moisture")?,
        );
        reading.light_intensity = self.value_of("light");

        for sensor in self.sensors.iter().filter(|s| s.is_abnormal) {
            tracing::debug!(sensor = %sensor.sensor_type, "Backend flagged sensor as abnormal");
        }

        Ok(reading)
    }
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub async fn fetch_reading(&self, garden_id: i64) -> Result<SensorReading> {
        let url = format!(
            "{}/iot/gardens/{}/status",
            self.config.base_url.trim_end_matches('/'),
            garden_id
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.token))
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| PlotCareError::DataSourceUnavailable(format!("Plot backend: {}", e)))?;

        if !response.status().is_success() {
            return Err(PlotCareError::DataSourceUnavailable(format!(
                "Plot backend returned {} for garden {}",
                response.status(),
                garden_id
            )));
        }

        let status: GardenStatus = response.json().await.map_err(|e| {
            PlotCareError::DataSourceUnavailable(format!(
                "Failed to parse plot backend response: {}",
                e
            ))
        })?;

        tracing::debug!(
            garden_id,
            sensors = status.sensors.len(),
            last_update = status.last_update.as_deref().unwrap_or("unknown"),
            "Fetched garden telemetry"
        );

        status.to_reading()
    }

    /// The health endpoint lives at the server root, outside the `/api` prefix.
    fn health_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let origin = base.strip_suffix("/api").unwrap_or(base);
        format!("{}/health", origin)
    }

    pub async fn test_connection(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.health_url())
            .send()
            .await
            .map_err(|e| PlotCareError::DataSourceUnavailable(format!("Plot backend: {}", e)))?;

        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config(base_url: &str) -> BackendConfig {
        BackendConfig {
            base_url: base_url.to_string(),
            token: "test_token".to_string(),
            enabled: true,
        }
    }

    #[test]
    fn folds_status_payload() {
        let status: GardenStatus = serde_json::from_str(
            r#"{
                "sensors": [
                    {"id": 1, "sensor_type": "temperature", "current_value": 31.2, "unit": "°C",
                     "is_abnormal": true, "last_reading_time": "2025-12-09T10:30:00"},
                    {"id": 2, "sensor_type": "humidity", "current_value": 58.0, "unit": "%",
                     "is_abnormal": false},
                    {"id": 3, "sensor_type": "soil_moisture", "current_value": 41.5, "unit": "%",
                     "is_abnormal": false},
                    {"id": 4, "sensor_type": "light", "current_value": 5200.0, "unit": "lux",
                     "is_abnormal": false},
                    {"id": 5, "sensor_type": "soil_ph", "current_value": 6.4, "unit": "pH",
                     "is_abnormal": false}
                ],
                "last_update": "2025-12-09T10:30:00"
            }"#,
        )
        .unwrap();

        let reading = status.to_reading().unwrap();
        assert_eq!(reading.temperature, 31.2);
        assert_eq!(reading.humidity, 58.0);
        assert_eq!(reading.soil_moisture, 41.5);
        assert_eq!(reading.light_intensity, Some(5200.0));
    }

    #[test]
    fn missing_required_sensor_is_unavailable() {
        let status: GardenStatus = serde_json::from_str(
            r#"{"sensors": [{"sensor_type": "temperature", "current_value": 20.0}]}"#,
        )
        .unwrap();
        let err = status.to_reading().unwrap_err();
        assert!(matches!(err, PlotCareError::DataSourceUnavailable(_)));
        assert!(err.to_string().contains("humidity"));
    }

    #[test]
    fn health_url_strips_api_prefix() {
        let client = BackendClient::new(sample_config("http://localhost:8000/api/"));
        assert_eq!(client.health_url(), "http://localhost:8000/health");

        let client = BackendClient::new(sample_config("http://localhost:8000"));
        assert_eq!(client.health_url(), "http://localhost:8000/health");
    }
}
