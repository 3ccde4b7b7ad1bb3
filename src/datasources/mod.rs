pub mod backend;
pub mod simulator;

pub use backend::BackendClient;
pub use simulator::{TelemetrySimulator, WeatherEvent};
