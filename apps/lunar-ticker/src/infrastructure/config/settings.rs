//! Dashboard Configuration Settings
//!
//! Loaded from environment variables. Unset, blank or unparsable numeric
//! values fall back to their defaults; only an empty watchlist is fatal.

use std::time::Duration;

use crate::domain::feed::{Instrument, Subscription};
use crate::infrastructure::okx::{KeepaliveConfig, OKX_PUBLIC_URL, OkxClientConfig};

/// Feed connection settings.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    /// WebSocket URL.
    pub url: String,
    /// Channel subscribed to on open.
    pub channel: String,
    /// Watched instruments, in display order.
    pub instruments: Vec<Instrument>,
    /// Keepalive ping interval (zero disables).
    pub keepalive_interval: Duration,
}

impl Default for FeedSettings {
    fn default() -> Self {
        let watchlist = Subscription::default_watchlist();
        Self {
            url: OKX_PUBLIC_URL.to_string(),
            channel: watchlist.channel,
            instruments: watchlist.instruments,
            keepalive_interval: KeepaliveConfig::default().interval,
        }
    }
}

impl FeedSettings {
    /// Subscription requested when the feed opens.
    #[must_use]
    pub fn subscription(&self) -> Subscription {
        Subscription::new(self.channel.clone(), self.instruments.clone())
    }

    /// Client configuration for these settings.
    #[must_use]
    pub fn client_config(&self) -> OkxClientConfig {
        OkxClientConfig {
            url: self.url.clone(),
            keepalive: KeepaliveConfig {
                interval: self.keepalive_interval,
            },
        }
    }
}

/// Dashboard server settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// HTTP port.
    pub http_port: u16,
    /// Page auto-refresh interval in seconds (0 = no refresh).
    pub page_refresh_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            http_port: 8080,
            page_refresh_secs: 2,
        }
    }
}

/// Complete dashboard configuration.
#[derive(Debug, Clone, Default)]
pub struct TickerConfig {
    /// Feed connection settings.
    pub feed: FeedSettings,
    /// Server settings.
    pub server: ServerSettings,
}

impl TickerConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `LUNAR_TICKER_INSTRUMENTS` is set but names no
    /// instruments.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`TickerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let feed_defaults = FeedSettings::default();
        let server_defaults = ServerSettings::default();

        let instruments = match lookup("LUNAR_TICKER_INSTRUMENTS") {
            Some(list) => parse_instruments(&list)?,
            None => feed_defaults.instruments,
        };

        let feed = FeedSettings {
            url: var("OKX_WS_URL").unwrap_or(feed_defaults.url),
            channel: var("LUNAR_TICKER_CHANNEL")
                .map_or(feed_defaults.channel, |c| c.trim().to_string()),
            instruments,
            keepalive_interval: parse_duration_secs(
                var("LUNAR_TICKER_KEEPALIVE_SECS"),
                feed_defaults.keepalive_interval,
            ),
        };

        let server = ServerSettings {
            http_port: parse_or(var("LUNAR_TICKER_HTTP_PORT"), server_defaults.http_port),
            page_refresh_secs: parse_or(
                var("LUNAR_TICKER_PAGE_REFRESH_SECS"),
                server_defaults.page_refresh_secs,
            ),
        };

        Ok(Self { feed, server })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
}

fn parse_instruments(list: &str) -> Result<Vec<Instrument>, ConfigError> {
    let instruments: Vec<Instrument> = list
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(Instrument::new)
        .collect();

    if instruments.is_empty() {
        return Err(ConfigError::EmptyValue(
            "LUNAR_TICKER_INSTRUMENTS".to_string(),
        ));
    }
    Ok(instruments)
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_duration_secs(value: Option<String>, default: Duration) -> Duration {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<TickerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        TickerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.feed.url, "wss://ws.okx.com:8443/ws/v5/public");
        assert_eq!(config.feed.channel, "tickers");
        assert_eq!(
            config.feed.subscription(),
            Subscription::default_watchlist()
        );
        assert_eq!(config.feed.keepalive_interval, Duration::from_secs(25));
        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.server.page_refresh_secs, 2);
    }

    #[test]
    fn overrides_from_vars() {
        let config = load(&[
            ("OKX_WS_URL", "ws://127.0.0.1:9000"),
            ("LUNAR_TICKER_CHANNEL", "mark-price"),
            ("LUNAR_TICKER_INSTRUMENTS", " ETH-USDT-SWAP , SOL-USDT ,"),
            ("LUNAR_TICKER_HTTP_PORT", "9999"),
            ("LUNAR_TICKER_KEEPALIVE_SECS", "0"),
            ("LUNAR_TICKER_PAGE_REFRESH_SECS", "10"),
        ])
        .unwrap();

        assert_eq!(config.feed.url, "ws://127.0.0.1:9000");
        assert_eq!(config.feed.channel, "mark-price");
        assert_eq!(
            config.feed.instruments,
            vec![Instrument::new("ETH-USDT-SWAP"), Instrument::new("SOL-USDT")]
        );
        assert_eq!(config.server.http_port, 9999);
        assert_eq!(config.server.page_refresh_secs, 10);
        assert!(!config.feed.client_config().keepalive.is_enabled());
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = load(&[
            ("LUNAR_TICKER_HTTP_PORT", "eighty"),
            ("LUNAR_TICKER_KEEPALIVE_SECS", "-5"),
            ("LUNAR_TICKER_PAGE_REFRESH_SECS", "1.5"),
        ])
        .unwrap();

        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.feed.keepalive_interval, Duration::from_secs(25));
        assert_eq!(config.server.page_refresh_secs, 2);
    }

    #[test]
    fn blank_strings_use_defaults() {
        let config = load(&[("OKX_WS_URL", "  "), ("LUNAR_TICKER_CHANNEL", "")]).unwrap();
        assert_eq!(config.feed.url, OKX_PUBLIC_URL);
        assert_eq!(config.feed.channel, "tickers");
    }

    #[test]
    fn empty_instrument_list_is_error() {
        let err = load(&[("LUNAR_TICKER_INSTRUMENTS", " , ,")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::EmptyValue(ref key) if key == "LUNAR_TICKER_INSTRUMENTS"
        ));
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn client_config_carries_url_and_keepalive() {
        let settings = FeedSettings {
            keepalive_interval: Duration::from_secs(5),
            ..FeedSettings::default()
        };
        let client = settings.client_config();
        assert_eq!(client.url, OKX_PUBLIC_URL);
        assert_eq!(client.keepalive.interval, Duration::from_secs(5));
    }
}
