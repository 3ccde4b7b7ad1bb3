use crate::config::{Config, PlantingConfig};
use crate::datasources::{BackendClient, TelemetrySimulator};
use crate::db::Database;
use crate::error::{PlotCareError, Result};
use crate::logic::RulesEngine;
use crate::models::{AlertRecord, SensorReading, TelemetrySource};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Polls telemetry for configured plots and records threshold alerts in the ledger.
pub struct MonitorService {
    config: Config,
    db: Database,
    engine: Arc<RulesEngine>,
    backend_client: Option<BackendClient>,
    simulator: Option<TelemetrySimulator>,
}

/// Outcome of one poll for one plot.
#[derive(Debug, Clone, Serialize)]
pub struct GardenPoll {
    pub garden: String,
    pub garden_id: i64,
    pub crop_type: String,
    pub source: TelemetrySource,
    pub reading: SensorReading,
    pub alerts: Vec<AlertRecord>,
    /// Alerts actually written; duplicates inside the dedup window are not.
    pub recorded: usize,
}

impl MonitorService {
    pub fn new(config: Config, db: Database, engine: Arc<RulesEngine>) -> Self {
        let backend_client = config.active_backend().cloned().map(|c| {
            tracing::info!(base_url = %c.base_url, "Plot backend configured for telemetry");
            BackendClient::new(c)
        });

        let simulator = if backend_client.is_none() && config.monitor.simulate_without_backend {
            tracing::info!("No plot backend configured - using simulated telemetry");
            Some(TelemetrySimulator::new())
        } else {
            None
        };

        if backend_client.is_none() && simulator.is_none() {
            tracing::warn!("No telemetry source available - monitoring will record nothing");
        }

        Self {
            config,
            db,
            engine,
            backend_client,
            simulator,
        }
    }

    /// Replace the telemetry simulator, e.g. to overlay a weather event.
    pub fn with_simulator(mut self, simulator: TelemetrySimulator) -> Self {
        self.simulator = Some(simulator);
        self
    }

    fn monitored_plantings(&self) -> impl Iterator<Item = (&PlantingConfig, i64)> {
        self.config
            .plantings
            .iter()
            .filter_map(|p| p.garden_id.map(|id| (p, id)))
    }

    async fn fetch(
        &self,
        garden_id: i64,
        now: DateTime<Utc>,
    ) -> Result<(SensorReading, TelemetrySource)> {
        if let Some(ref client) = self.backend_client {
            let reading = client.fetch_reading(garden_id).await?;
            return Ok((reading, TelemetrySource::Backend));
        }
        if let Some(ref simulator) = self.simulator {
            return Ok((simulator.reading_at(now), TelemetrySource::Simulator));
        }
        Err(PlotCareError::DataSourceUnavailable(
            "no telemetry source configured".into(),
        ))
    }

    /// Fetch, evaluate and record once for every planting with a backend plot id.
    pub async fn poll_once(&self, now: DateTime<Utc>) -> Result<Vec<GardenPoll>> {
        let mut results = Vec::new();

        for (planting, garden_id) in self.monitored_plantings() {
            let (reading, source) = match self.fetch(garden_id, now).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    tracing::warn!(
                        garden = %planting.garden,
                        garden_id,
                        "Failed to fetch telemetry: {}",
                        e
                    );
                    continue;
                }
            };

            let alerts = self.engine.evaluate_environment(
                &reading,
                &planting.crop_type,
                &planting.garden,
            );
            let recorded = self.db.record_alerts(&alerts, now)?;

            tracing::debug!(
                garden = %planting.garden,
                source = source.as_str(),
                alerts = alerts.len(),
                recorded,
                "Polled garden"
            );

            results.push(GardenPoll {
                garden: planting.garden.clone(),
                garden_id,
                crop_type: planting.crop_type.clone(),
                source,
                reading,
                alerts,
                recorded,
            });
        }

        self.db.set_setting("last_poll", &now.to_rfc3339())?;
        Ok(results)
    }

    /// Poll on a fixed interval until Ctrl-C.
    pub async fn run(&self, interval: Duration) -> Result<()> {
        self.run_until(interval, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Poll on a fixed interval until `shutdown` resolves.
    pub async fn run_until<F>(&self, interval: Duration, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(interval);
        tokio::pin!(shutdown);
        tracing::info!(interval_secs = interval.as_secs(), "Monitor started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.poll_once(Utc::now()).await {
                        Ok(polls) => {
                            let recorded: usize = polls.iter().map(|p| p.recorded).sum();
                            tracing::info!(gardens = polls.len(), recorded, "Poll complete");
                        }
                        Err(e) => tracing::error!("Poll failed: {}", e),
                    }
                }
                _ = &mut shutdown => {
                    tracing::info!("Monitor stopping");
                    return Ok(());
                }
            }
        }
    }

    pub async fn check_connections(&self) -> ConnectionStatus {
        let mut status = ConnectionStatus {
            simulator: self.simulator.is_some(),
            ..Default::default()
        };

        if let Some(ref client) = self.backend_client {
            status.backend_configured = true;
            status.backend = client.test_connection().await.unwrap_or(false);
        }

        status
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionStatus {
    pub backend_configured: bool,
    pub backend: bool,
    pub simulator: bool,
}

impl ConnectionStatus {
    pub fn any_source(&self) -> bool {
        self.backend || self.simulator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasources::WeatherEvent;
    use crate::models::AlertKind;
    use chrono::TimeZone;

    fn config_with_plantings() -> Config {
        Config {
            plantings: vec![
                PlantingConfig {
                    crop_type: "tomato".into(),
                    planted_on: "2026-03-01".into(),
                    garden: "Plot A-12".into(),
                    garden_id: Some(12),
                },
                PlantingConfig {
                    crop_type: "lettuce".into(),
                    planted_on: "2026-03-10".into(),
                    garden: "Balcony".into(),
                    garden_id: None,
                },
            ],
            ..Default::default()
        }
    }

    fn service(config: Config) -> MonitorService {
        MonitorService::new(
            config,
            Database::open_in_memory().unwrap(),
            Arc::new(RulesEngine::default()),
        )
    }

    #[tokio::test]
    async fn polls_only_plots_with_ids() {
        let monitor = service(config_with_plantings());
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        let polls = monitor.poll_once(now).await.unwrap();

        assert_eq!(polls.len(), 1);
        assert_eq!(polls[0].garden, "Plot A-12");
        assert_eq!(polls[0].source, TelemetrySource::Simulator);
        assert!(monitor.db.get_setting("last_poll").unwrap().is_some());
    }

    #[tokio::test]
    async fn heat_wave_records_alerts_once() {
        let monitor = service(config_with_plantings())
            .with_simulator(TelemetrySimulator::new().with_event(WeatherEvent::HeatWave));
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();

        let first = monitor.poll_once(now).await.unwrap();
        let kinds: Vec<AlertKind> = first[0].alerts.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![AlertKind::TemperatureHigh, AlertKind::HumidityLow, AlertKind::SoilDry]
        );
        assert_eq!(first[0].recorded, 3);

        let again = monitor
            .poll_once(now + chrono::Duration::minutes(5))
            .await
            .unwrap();
        assert_eq!(again[0].alerts.len(), 3);
        assert_eq!(again[0].recorded, 0);
        assert_eq!(monitor.db.list_alerts(None).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn run_stops_when_shutdown_resolves() {
        let monitor = service(config_with_plantings());
        let (stop, stopped) = tokio::sync::oneshot::channel::<()>();

        let run = monitor.run_until(Duration::from_millis(10), async {
            let _ = stopped.await;
        });
        let trigger = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = stop.send(());
        };
        let (result, ()) = tokio::join!(run, trigger);

        result.unwrap();
        assert!(monitor.db.get_setting("last_poll").unwrap().is_some());
    }

    #[tokio::test]
    async fn no_source_skips_every_plot() {
        let mut config = config_with_plantings();
        config.monitor.simulate_without_backend = false;
        let monitor = service(config);

        let polls = monitor.poll_once(Utc::now()).await.unwrap();
        assert!(polls.is_empty());
        assert!(!monitor.check_connections().await.any_source());
    }
}
