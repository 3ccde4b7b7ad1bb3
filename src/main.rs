mod cli;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::Parser;
use cli::{Cli, Commands, LedgerCommand, WeatherEventCli};
use plotcare::config::Config;
use plotcare::datasources::{TelemetrySimulator, WeatherEvent};
use plotcare::db::Database;
use plotcare::logic::schedule::{elapsed_days, parse_planting_date};
use plotcare::logic::stages::current_stage;
use plotcare::models::{
    AlertRecord, PlantingContext, Reminder, ReminderStatus, SensorReading, StoredAlert,
    StoredReminder, TelemetrySource,
};
use plotcare::{CropRegistry, MonitorService, RulesEngine};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Init = cli.command {
        let crop_ids: Vec<String> = CropRegistry::builtin()
            .profiles()
            .iter()
            .map(|p| p.id.clone())
            .collect();
        Config::setup_interactive(&crop_ids).context("Interactive setup failed")?;
        return Ok(());
    }

    let config = Config::load_or_default(cli.config.clone()).context("Configuration error")?;
    let registry = CropRegistry::with_profiles(config.crops.clone())
        .context("Invalid crop profile in config")?;
    let engine = Arc::new(RulesEngine::new(Arc::new(registry)));

    let app = App {
        config,
        engine,
        data_dir: cli.data_dir,
        json: cli.json,
    };

    match cli.command {
        Commands::Crops => app.crops(),
        Commands::Reminders {
            crop,
            planted,
            garden,
            at,
            save,
        } => app.reminders(crop, planted, &garden, at.as_deref(), save),
        Commands::Alerts {
            crop,
            temperature,
            humidity,
            soil_moisture,
            light,
            garden,
            save,
        } => {
            let mut reading = SensorReading::new(temperature, humidity, soil_moisture);
            reading.light_intensity = light;
            app.alerts(&crop, &reading, &garden, save)
        }
        Commands::Simulate {
            crop,
            garden,
            at,
            event,
        } => app.simulate(&crop, &garden, at.as_deref(), event),
        Commands::Ledger { command } => app.ledger(command),
        Commands::Watch { once } => app.watch(once).await,
        Commands::Check => app.check().await,
        Commands::Init => Ok(()),
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_at(at: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    match at {
        Some(raw) => {
            parse_planting_date(raw).with_context(|| format!("Invalid --at value '{}'", raw))
        }
        None => Ok(Utc::now()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

struct App {
    config: Config,
    engine: Arc<RulesEngine>,
    data_dir: Option<std::path::PathBuf>,
    json: bool,
}

/// One evaluated reading, as printed by `alerts` and `simulate`.
#[derive(Serialize)]
struct ReadingReport<'a> {
    source: TelemetrySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    at: Option<DateTime<Utc>>,
    reading: &'a SensorReading,
    alerts: &'a [AlertRecord],
}

#[derive(Serialize)]
struct PlantingReminders {
    garden: String,
    crop_type: String,
    planted_on: String,
    day: Option<i64>,
    stage: Option<String>,
    reminders: Vec<Reminder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl App {
    fn open_db(&self) -> anyhow::Result<Database> {
        Database::open(self.data_dir.as_ref()).context("Failed to open reminder ledger")
    }

    fn crops(&self) -> anyhow::Result<()> {
        if self.json {
            return print_json(&self.engine.crop_catalog());
        }

        for profile in self.engine.registry().profiles() {
            println!(
                "{:<10} {:<20} {} days",
                profile.id,
                profile.display_label(),
                profile.growth_duration_days
            );
        }
        Ok(())
    }

    fn reminders(
        &self,
        crop: Option<String>,
        planted: Option<String>,
        garden: &str,
        at: Option<&str>,
        save: bool,
    ) -> anyhow::Result<()> {
        let now = parse_at(at)?;

        let plantings: Vec<PlantingContext> = match (crop, planted) {
            (Some(crop), Some(planted)) => vec![PlantingContext::new(&crop, &planted, garden)],
            _ => self.config.plantings.iter().map(|p| p.context()).collect(),
        };

        if plantings.is_empty() {
            bail!("No plantings configured. Pass --crop and --planted, or run `plotcare init`.");
        }

        let results: Vec<PlantingReminders> = plantings
            .iter()
            .map(|planting| self.plan(planting, now))
            .collect();

        if save {
            let db = self.open_db()?;
            let mut inserted = 0;
            for result in &results {
                inserted += db.record_reminders(&result.reminders, now)?;
            }
            tracing::info!(inserted, "Recorded reminders in ledger");
            if !self.json {
                println!("Recorded {} new reminder(s) in the ledger", inserted);
            }
        }

        if self.json {
            return print_json(&results);
        }

        for result in &results {
            print_planting(result);
        }
        Ok(())
    }

    fn plan(&self, planting: &PlantingContext, now: DateTime<Utc>) -> PlantingReminders {
        let profile = self.engine.registry().lookup(&planting.crop_type);
        let day = parse_planting_date(&planting.planting_date)
            .ok()
            .map(|planted_at| elapsed_days(planted_at, now));
        let stage = profile
            .zip(day)
            .and_then(|(profile, day)| current_stage(profile, day))
            .map(|w| w.stage.name.clone());

        let mut result = PlantingReminders {
            garden: planting.garden_label.clone(),
            crop_type: planting.crop_type.clone(),
            planted_on: planting.planting_date.clone(),
            day,
            stage,
            reminders: Vec::new(),
            error: None,
        };

        match self.engine.generate(planting, now) {
            Ok(reminders) => result.reminders = reminders,
            Err(e) => {
                tracing::warn!(garden = %planting.garden_label, "Skipping planting: {}", e);
                result.error = Some(e.to_string());
            }
        }
        result
    }

    fn alerts(
        &self,
        crop: &str,
        reading: &SensorReading,
        garden: &str,
        save: bool,
    ) -> anyhow::Result<()> {
        if self.engine.registry().lookup(crop).is_none() {
            eprintln!("Unknown crop '{}'; see `plotcare crops`", crop);
        }
        let alerts = self.engine.evaluate_environment(reading, crop, garden);

        if save {
            let recorded = self.open_db()?.record_alerts(&alerts, Utc::now())?;
            if !self.json {
                println!("Recorded {} new alert(s) in the ledger", recorded);
            }
        }

        if self.json {
            return print_json(&ReadingReport {
                source: TelemetrySource::Manual,
                at: None,
                reading,
                alerts: &alerts,
            });
        }
        print_alerts(&alerts);
        Ok(())
    }

    fn simulate(
        &self,
        crop: &str,
        garden: &str,
        at: Option<&str>,
        event: Option<WeatherEventCli>,
    ) -> anyhow::Result<()> {
        let at = parse_at(at)?;
        let mut simulator = TelemetrySimulator::new();
        if let Some(event) = event {
            simulator = simulator.with_event(WeatherEvent::from(event));
        }

        let reading = simulator.reading_at(at);
        let alerts = self.engine.evaluate_environment(&reading, crop, garden);

        if self.json {
            return print_json(&ReadingReport {
                source: TelemetrySource::Simulator,
                at: Some(at),
                reading: &reading,
                alerts: &alerts,
            });
        }

        println!("Simulated reading at {}", at.format("%Y-%m-%d %H:%M UTC"));
        print_reading(&reading);
        println!();
        print_alerts(&alerts);
        Ok(())
    }

    fn ledger(&self, command: LedgerCommand) -> anyhow::Result<()> {
        let db = self.open_db()?;

        match command {
            LedgerCommand::List { status } => {
                let reminders = db.list_reminders(status.map(ReminderStatus::from))?;
                if self.json {
                    return print_json(&reminders);
                }
                if reminders.is_empty() {
                    println!("No reminders recorded");
                }
                for stored in &reminders {
                    print_stored(stored);
                }
            }
            LedgerCommand::Complete { id } => {
                db.complete_reminder(id, Utc::now())?;
                println!("Reminder {} marked completed", id);
            }
            LedgerCommand::Ignore { id } => {
                db.ignore_reminder(id)?;
                println!("Reminder {} ignored", id);
            }
            LedgerCommand::Stats => {
                let stats = db.reminder_statistics()?;
                if self.json {
                    return print_json(&stats);
                }
                println!("Total:     {}", stats.total);
                println!("Pending:   {}", stats.pending);
                println!("Completed: {}", stats.completed);
                println!("Ignored:   {}", stats.ignored);
            }
            LedgerCommand::Alerts { status } => {
                let alerts = db.list_alerts(status.map(ReminderStatus::from))?;
                if self.json {
                    return print_json(&alerts);
                }
                if alerts.is_empty() {
                    println!("No alerts recorded");
                }
                for stored in &alerts {
                    print_stored_alert(stored);
                }
            }
            LedgerCommand::Ack { id } => {
                db.acknowledge_alert(id)?;
                println!("Alert {} acknowledged", id);
            }
        }
        Ok(())
    }

    async fn watch(self, once: bool) -> anyhow::Result<()> {
        let db = self.open_db()?;
        let interval = Duration::from_secs(self.config.monitor.poll_interval_secs.max(1));
        let json = self.json;
        let monitor = MonitorService::new(self.config, db, self.engine);

        if once {
            let polls = monitor.poll_once(Utc::now()).await?;
            if json {
                return print_json(&polls);
            }
            if polls.is_empty() {
                println!("No plantings with a garden_id to monitor");
            }
            for poll in &polls {
                println!("{} ({}) via {}", poll.garden, poll.crop_type, poll.source);
                print_reading(&poll.reading);
                print_alerts(&poll.alerts);
                println!("  {} new alert(s) recorded", poll.recorded);
                println!();
            }
            return Ok(());
        }

        println!("Monitoring every {}s, Ctrl-C to stop", interval.as_secs());
        monitor.run(interval).await?;
        Ok(())
    }

    async fn check(self) -> anyhow::Result<()> {
        println!("Config: OK");
        println!("Crops:  {} registered", self.engine.registry().profiles().len());

        for planting in &self.config.plantings {
            match self.engine.generate(&planting.context(), Utc::now()) {
                Ok(_) => println!("  {} ({}): OK", planting.garden, planting.crop_type),
                Err(e) => println!("  {} ({}): {}", planting.garden, planting.crop_type, e),
            }
        }

        let db = self.open_db()?;
        println!("Ledger: {}", db.path().display());

        let monitor = MonitorService::new(self.config, db, self.engine);
        let status = monitor.check_connections().await;
        if status.backend_configured {
            let state = if status.backend { "OK" } else { "OFFLINE" };
            println!("Backend: {}", state);
        } else {
            println!("Backend: not configured");
        }
        if status.simulator {
            println!("Simulator: enabled");
        }
        if !status.any_source() {
            bail!("No telemetry source available");
        }
        Ok(())
    }
}

fn print_planting(result: &PlantingReminders) {
    print!(
        "{} - {} planted {}",
        result.garden, result.crop_type, result.planted_on
    );
    match (result.day, &result.stage) {
        (Some(day), Some(stage)) => println!(" (day {}, {})", day, stage),
        (Some(day), None) => println!(" (day {})", day),
        _ => println!(),
    }

    if let Some(ref error) = result.error {
        println!("  error: {}", error);
    } else if result.reminders.is_empty() {
        println!("  no reminders");
    }
    for reminder in &result.reminders {
        println!(
            "  {} {}  {}",
            reminder.priority.symbol(),
            reminder.due_date.format("%Y-%m-%d"),
            reminder.title
        );
        println!("      {}", reminder.description);
        if let Some(ref tips) = reminder.tips {
            println!("      tips: {}", tips);
        }
    }
    println!();
}

fn print_reading(reading: &SensorReading) {
    println!("  temperature:   {:.1}°C", reading.temperature);
    println!("  humidity:      {:.1}%", reading.humidity);
    println!("  soil moisture: {:.1}%", reading.soil_moisture);
    if let Some(light) = reading.light_intensity {
        println!("  light:         {:.0} lux", light);
    }
}

fn print_alerts(alerts: &[AlertRecord]) {
    if alerts.is_empty() {
        println!("  conditions within optimal ranges");
        return;
    }
    for alert in alerts {
        println!("  {} {}", alert.priority.symbol(), alert.title);
        println!("      {}", alert.description);
        println!("      action: {}", alert.action);
    }
}

fn print_stored(stored: &StoredReminder) {
    let r = &stored.reminder;
    println!(
        "#{:<4} [{}] {} {}  {}  ({})",
        stored.id,
        stored.status.as_str(),
        r.priority.symbol(),
        r.due_date.format("%Y-%m-%d"),
        r.title,
        r.garden_label
    );
}

fn print_stored_alert(stored: &StoredAlert) {
    let a = &stored.alert;
    println!(
        "#{:<4} [{}] {} {}  {}  ({})",
        stored.id,
        stored.status.as_str(),
        a.priority.symbol(),
        stored.created_at.format("%Y-%m-%d %H:%M"),
        a.title,
        a.garden_label
    );
}
