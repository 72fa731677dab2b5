//! Config - 起動オプション（CLI フラグ + 環境変数）

use std::time::Duration;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "tickler", about = "Todo reminder service over HTTP")]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port the HTTP server listens on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Seconds between reminder sweeps
    #[arg(long, env = "REMINDER_INTERVAL_SECS", default_value_t = 15)]
    pub reminder_interval_secs: u64,
}

impl Config {
    pub fn reminder_interval(&self) -> Duration {
        Duration::from_secs(self.reminder_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let config = Config::try_parse_from([
            "tickler",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--reminder-interval-secs",
            "2",
        ])
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.reminder_interval(), Duration::from_secs(2));
    }

    #[test]
    fn test_rejects_non_numeric_port() {
        assert!(Config::try_parse_from(["tickler", "--port", "http"]).is_err());
    }
}
