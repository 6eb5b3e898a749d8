//! Client configuration.

use std::time::Duration;

use serde::Deserialize;
use uuid::Uuid;
use wire::DecodeLimits;

use crate::error::SessionResult;

/// Timing, queue and concurrency settings of a client session.
///
/// Durations are in milliseconds so the TOML form stays flat:
///
/// ```
/// let config = client::ClientConfig::from_toml_str(
///     "rebake_delay_ms = 5000\nmax_concurrent_downloads = 2",
/// )
/// .unwrap();
/// assert_eq!(config.rebake_delay().as_secs(), 5);
/// assert_eq!(config.max_concurrent_uploads, 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Target period of the interpolation loop.
    pub interpolation_interval_ms: u64,
    /// Floor on the delay between interpolation ticks.
    pub interpolation_min_delay_ms: u64,
    pub inbound_queue_depth: usize,
    pub outbound_queue_depth: usize,
    /// Minimum gap between two outbound sends.
    pub send_spacing_ms: u64,
    pub event_capacity: usize,
    pub wearables_timeout_ms: u64,
    pub cache_check_timeout_ms: u64,
    /// Bound on a whole download batch.
    pub download_batch_timeout_ms: u64,
    /// Bound on a single asset or image request.
    pub download_timeout_ms: u64,
    pub upload_timeout_ms: u64,
    /// Quiet period after an outfit change before rebaking.
    pub rebake_delay_ms: u64,
    pub max_concurrent_downloads: usize,
    pub max_concurrent_uploads: usize,
    /// Retries after a failed upload, not counting the first attempt.
    pub upload_retries: u32,
    /// Texture advertised on the head, eyes and skull slots.
    pub client_identification: Option<Uuid>,
    #[serde(skip)]
    pub decode_limits: DecodeLimits,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            interpolation_interval_ms: 250,
            interpolation_min_delay_ms: 50,
            inbound_queue_depth: 1024,
            outbound_queue_depth: 256,
            send_spacing_ms: 5,
            event_capacity: 1024,
            wearables_timeout_ms: 60_000,
            cache_check_timeout_ms: 20_000,
            download_batch_timeout_ms: 120_000,
            download_timeout_ms: 30_000,
            upload_timeout_ms: 60_000,
            rebake_delay_ms: 20_000,
            max_concurrent_downloads: 5,
            max_concurrent_uploads: 6,
            upload_retries: 2,
            client_identification: None,
            decode_limits: DecodeLimits::default(),
        }
    }
}

impl ClientConfig {
    /// Small queues and short timeouts for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            inbound_queue_depth: 16,
            outbound_queue_depth: 16,
            send_spacing_ms: 0,
            event_capacity: 64,
            wearables_timeout_ms: 1_000,
            cache_check_timeout_ms: 1_000,
            download_batch_timeout_ms: 5_000,
            download_timeout_ms: 1_000,
            upload_timeout_ms: 1_000,
            rebake_delay_ms: 2_000,
            decode_limits: DecodeLimits::for_testing(),
            ..Self::default()
        }
    }

    /// Parses a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> SessionResult<Self> {
        Ok(toml::from_str(source)?)
    }

    #[must_use]
    pub const fn interpolation_interval(&self) -> Duration {
        Duration::from_millis(self.interpolation_interval_ms)
    }

    #[must_use]
    pub const fn interpolation_min_delay(&self) -> Duration {
        Duration::from_millis(self.interpolation_min_delay_ms)
    }

    #[must_use]
    pub const fn send_spacing(&self) -> Duration {
        Duration::from_millis(self.send_spacing_ms)
    }

    #[must_use]
    pub const fn wearables_timeout(&self) -> Duration {
        Duration::from_millis(self.wearables_timeout_ms)
    }

    #[must_use]
    pub const fn cache_check_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_check_timeout_ms)
    }

    #[must_use]
    pub const fn download_batch_timeout(&self) -> Duration {
        Duration::from_millis(self.download_batch_timeout_ms)
    }

    #[must_use]
    pub const fn download_timeout(&self) -> Duration {
        Duration::from_millis(self.download_timeout_ms)
    }

    #[must_use]
    pub const fn upload_timeout(&self) -> Duration {
        Duration::from_millis(self.upload_timeout_ms)
    }

    #[must_use]
    pub const fn rebake_delay(&self) -> Duration {
        Duration::from_millis(self.rebake_delay_ms)
    }
}
