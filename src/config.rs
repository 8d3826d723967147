//! Configuration management for the status dashboard

use crate::card::DisplayZone;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SOURCE: &str =
    "https://raw.githubusercontent.com/bluestar-b/ping-github-workflow/main/pingdata.json";

#[derive(Debug, Clone, Parser)]
#[command(name = "status_dashboard", version, about = "Render service status cards into an HTML page")]
pub struct Config {
    /// URL or file path of the status document
    #[arg(long, env = "STATUS_SOURCE", default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// Id of the element that receives the cards
    #[arg(long, env = "STATUS_CONTAINER_ID", default_value = "container")]
    pub container_id: String,

    /// HTML page shell; a built-in shell is used when absent
    #[arg(long, env = "STATUS_SHELL")]
    pub shell: Option<PathBuf>,

    /// Where the rendered page is written
    #[arg(long, env = "STATUS_OUTPUT", default_value = "index.html")]
    pub output: PathBuf,

    /// HTTP timeout for the status source
    #[arg(long, env = "HTTP_TIMEOUT_SECONDS", default_value_t = 10)]
    pub http_timeout_seconds: u64,

    /// Fixed display offset such as +07:00; local time when absent
    #[arg(long, env = "STATUS_UTC_OFFSET")]
    pub utc_offset: Option<String>,

    /// HTML-escape interpolated record values
    #[arg(long, env = "STATUS_ESCAPE_MARKUP")]
    pub escape_markup: bool,

    /// Fallback log filter when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            container_id: "container".to_string(),
            shell: None,
            output: PathBuf::from("index.html"),
            http_timeout_seconds: 10,
            utc_offset: None,
            escape_markup: false,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    /// Zone last-check times are displayed in
    pub fn display_zone(&self) -> Result<DisplayZone, String> {
        match &self.utc_offset {
            Some(offset) => DisplayZone::parse(offset),
            None => Ok(DisplayZone::Local),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.source.trim().is_empty() {
            return Err("source cannot be empty".to_string());
        }

        if self.container_id.trim().is_empty() {
            return Err("container_id cannot be empty".to_string());
        }

        if self.output.as_os_str().is_empty() {
            return Err("output cannot be empty".to_string());
        }

        if self.http_timeout_seconds == 0 {
            return Err("http_timeout_seconds must be greater than 0".to_string());
        }

        self.display_zone()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.display_zone().unwrap(), DisplayZone::Local);
        assert_eq!(config.http_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_cli_arguments() {
        let config = Config::try_parse_from([
            "status_dashboard",
            "--source",
            "./pingdata.json",
            "--container-id",
            "services",
            "--utc-offset",
            "+07:00",
            "--escape-markup",
        ])
        .unwrap();

        assert_eq!(config.source, "./pingdata.json");
        assert_eq!(config.container_id, "services");
        assert!(config.escape_markup);
        assert!(matches!(config.display_zone().unwrap(), DisplayZone::Fixed(_)));
    }

    #[test]
    fn test_validation_failures() {
        let mut config = Config::default();
        config.container_id = String::new();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.http_timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.utc_offset = Some("seven".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.contains("invalid UTC offset"));
    }
}
