//! Error types for the status dashboard

use std::fmt;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug)]
pub enum DashboardError {
    /// HTTP request failed before a response arrived
    Network(reqwest::Error),

    /// Source answered with a non-success status
    NetworkStatus { status: u16, url: String },

    /// Body is not valid JSON
    Parse(serde_json::Error),

    /// Body is valid JSON but not an object of records
    NotACollection(String),

    /// A record is missing a field or has an unexpected type
    Shape { service_id: String, reason: String },

    /// The container element could not be located or cannot hold children
    Mount(String),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),
}

impl DashboardError {
    pub fn shape(service_id: &str, reason: impl Into<String>) -> Self {
        DashboardError::Shape {
            service_id: service_id.to_string(),
            reason: reason.into(),
        }
    }

    /// Taxonomy name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            DashboardError::Network(_) | DashboardError::NetworkStatus { .. } => "NetworkError",
            DashboardError::Parse(_) | DashboardError::NotACollection(_) => "ParseError",
            DashboardError::Shape { .. } => "ShapeError",
            DashboardError::Mount(_) => "MountError",
            DashboardError::Io(_) => "IoError",
            DashboardError::Config(_) => "ConfigError",
        }
    }
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::Network(err) => write!(f, "Network error: {}", err),
            DashboardError::NetworkStatus { status, url } => {
                write!(f, "Network error: {} responded with status {}", url, status)
            }
            DashboardError::Parse(err) => write!(f, "Parse error: {}", err),
            DashboardError::NotACollection(found) => {
                write!(f, "Parse error: expected an object of records, found {}", found)
            }
            DashboardError::Shape { service_id, reason } => {
                write!(f, "Shape error in record {}: {}", service_id, reason)
            }
            DashboardError::Mount(msg) => write!(f, "Mount error: {}", msg),
            DashboardError::Io(err) => write!(f, "IO error: {}", err),
            DashboardError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DashboardError::Network(err) => Some(err),
            DashboardError::Parse(err) => Some(err),
            DashboardError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Io(err)
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::Network(err)
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Parse(err)
    }
}
