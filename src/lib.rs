pub mod config;
pub mod datasources;
pub mod db;
pub mod error;
pub mod logic;
pub mod models;

pub use error::{PlotCareError, Result};
pub use logic::{CropRegistry, MonitorService, RulesEngine};
