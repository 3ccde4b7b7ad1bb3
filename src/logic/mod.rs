pub mod monitor;
pub mod registry;
pub mod rules;
pub mod schedule;
pub mod stages;

pub use monitor::MonitorService;
pub use registry::CropRegistry;
pub use rules::RulesEngine;
