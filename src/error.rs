use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlotCareError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Invalid planting date '{0}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),

    #[error("Invalid interval: {0} days (must be positive)")]
    InvalidInterval(i64),

    #[error("Due date {0} days after planting is outside the supported calendar")]
    DateOutOfRange(i64),

    #[error("Planting date {0} is in the future")]
    PlantingInFuture(String),

    #[error("Invalid crop profile '{crop}': {reason}")]
    InvalidProfile { crop: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, PlotCareError>;
