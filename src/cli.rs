use clap::{Parser, Subcommand, ValueEnum};
use plotcare::datasources::WeatherEvent;
use plotcare::models::ReminderStatus;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plotcare", version)]
#[command(about = "Care reminders and plot alerts for rented garden plots")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the supported crops
    Crops,
    /// Generate care reminders for one planting, or every configured planting
    Reminders {
        #[arg(long, requires = "planted")]
        crop: Option<String>,
        /// Planting date, YYYY-MM-DD
        #[arg(long, requires = "crop")]
        planted: Option<String>,
        #[arg(long, default_value = "My Plot")]
        garden: String,
        /// Evaluate as of this time (YYYY-MM-DD or RFC 3339) instead of now
        #[arg(long)]
        at: Option<String>,
        /// Record the reminders in the ledger
        #[arg(long)]
        save: bool,
    },
    /// Check a manual sensor reading against a crop's optimal ranges
    Alerts {
        #[arg(long)]
        crop: String,
        /// Air temperature in °C
        #[arg(long, allow_negative_numbers = true)]
        temperature: f64,
        /// Relative humidity in %
        #[arg(long)]
        humidity: f64,
        /// Soil moisture in %
        #[arg(long)]
        soil_moisture: f64,
        /// Light intensity in lux
        #[arg(long)]
        light: Option<f64>,
        #[arg(long, default_value = "My Plot")]
        garden: String,
        /// Record the alerts in the ledger
        #[arg(long)]
        save: bool,
    },
    /// Evaluate a simulated sensor reading
    Simulate {
        #[arg(long)]
        crop: String,
        #[arg(long, default_value = "My Plot")]
        garden: String,
        #[arg(long)]
        at: Option<String>,
        /// Overlay a weather event
        #[arg(long, value_enum)]
        event: Option<WeatherEventCli>,
    },
    /// Inspect and update recorded reminders and alerts
    Ledger {
        #[command(subcommand)]
        command: LedgerCommand,
    },
    /// Poll telemetry for configured plots and record alerts
    Watch {
        /// Poll once and exit
        #[arg(long)]
        once: bool,
    },
    /// Re-run interactive setup
    Init,
    /// Validate config and test connections
    Check,
}

#[derive(Subcommand)]
pub enum LedgerCommand {
    /// List reminders, optionally filtered by status
    List {
        #[arg(long, value_enum)]
        status: Option<StatusCli>,
    },
    /// Mark a reminder as done
    Complete { id: i64 },
    /// Dismiss a reminder
    Ignore { id: i64 },
    /// Reminder counts by status
    Stats,
    /// List recorded environment alerts, optionally filtered by status
    Alerts {
        #[arg(long, value_enum)]
        status: Option<StatusCli>,
    },
    /// Acknowledge an alert
    Ack { id: i64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum WeatherEventCli {
    Rain,
    #[value(alias = "heat-wave")]
    HeatWave,
    Cold,
    Drought,
}

impl From<WeatherEventCli> for WeatherEvent {
    fn from(value: WeatherEventCli) -> Self {
        match value {
            WeatherEventCli::Rain => WeatherEvent::Rain,
            WeatherEventCli::HeatWave => WeatherEvent::HeatWave,
            WeatherEventCli::Cold => WeatherEvent::Cold,
            WeatherEventCli::Drought => WeatherEvent::Drought,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatusCli {
    Pending,
    #[value(alias = "done")]
    Completed,
    #[value(alias = "dismissed")]
    Ignored,
}

impl From<StatusCli> for ReminderStatus {
    fn from(value: StatusCli) -> Self {
        match value {
            StatusCli::Pending => ReminderStatus::Pending,
            StatusCli::Completed => ReminderStatus::Completed,
            StatusCli::Ignored => ReminderStatus::Ignored,
        }
    }
}
