//! Server configuration via CLI args and environment variables.

use std::time::Duration;

use clap::Parser;
use folio_service::ServiceConfig;

/// API gate for the Folio portfolio builder.
#[derive(Parser, Debug, Clone)]
#[command(name = "folio-server", version, about)]
pub struct Config {
    /// Bind address.
    #[arg(long, default_value = "0.0.0.0", env = "FOLIO_HOST")]
    pub host: String,

    /// Bind port.
    #[arg(long, default_value_t = 8080, env = "FOLIO_PORT")]
    pub port: u16,

    /// CORS allowed origins (comma-separated). Empty for no CORS.
    #[arg(long, env = "FOLIO_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Seconds between sweeps of expired rate-limit records.
    #[arg(long, default_value_t = 300, env = "FOLIO_SWEEP_INTERVAL",
          value_parser = clap::value_parser!(u64).range(1..))]
    pub sweep_interval: u64,

    /// Log level.
    #[arg(long, default_value = "info", env = "FOLIO_LOG_LEVEL")]
    pub log_level: String,

    /// Log format: "text" or "json".
    #[arg(long, default_value = "text", env = "FOLIO_LOG_FORMAT")]
    pub log_format: String,
}

impl Config {
    /// Parses configuration from CLI args and env vars.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Service-layer subset of the configuration.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            sweep_interval: Duration::from_secs(self.sweep_interval),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["folio-server"]).unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.cors_origins.is_empty());
        assert_eq!(
            config.service_config().sweep_interval,
            Duration::from_secs(300)
        );
    }

    #[test]
    fn cors_origins_are_comma_separated() {
        let config = Config::try_parse_from([
            "folio-server",
            "--cors-origins",
            "https://folio.app,https://www.folio.app",
            "--sweep-interval",
            "60",
        ])
        .unwrap();
        assert_eq!(
            config.cors_origins,
            vec!["https://folio.app", "https://www.folio.app"]
        );
        assert_eq!(config.sweep_interval, 60);
    }

    #[test]
    fn zero_sweep_interval_rejected() {
        assert!(Config::try_parse_from(["folio-server", "--sweep-interval", "0"]).is_err());
    }
}
