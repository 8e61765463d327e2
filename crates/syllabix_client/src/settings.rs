use std::time::Duration;

use url::Url;

use crate::{FailureKind, StreamError};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub connect_timeout: Duration,
    /// Whole-request timeout for uploads. Streams have no deadline.
    pub upload_timeout: Duration,
    pub reconnect: ReconnectPolicy,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            upload_timeout: Duration::from_secs(120),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl ClientSettings {
    /// `{server}/processing-stream/{job_id}`.
    pub fn stream_url(&self, job_id: &str) -> Result<Url, StreamError> {
        endpoint(&self.server_url, &["processing-stream", job_id])
    }

    /// `{server}/upload-files`.
    pub fn upload_url(&self) -> Result<Url, StreamError> {
        endpoint(&self.server_url, &["upload-files"])
    }
}

fn endpoint(server_url: &str, segments: &[&str]) -> Result<Url, StreamError> {
    let mut url = Url::parse(server_url)
        .map_err(|err| StreamError::new(FailureKind::InvalidUrl, err.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| StreamError::new(FailureKind::InvalidUrl, "url cannot be a base"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Bounded exponential backoff between stream reconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Reconnect attempts per subscription; 0 disables reconnecting.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl ReconnectPolicy {
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before reconnect `attempt` (1-based), or `None` once retries are spent.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.max_retries {
            return None;
        }
        let factor = 2u32.saturating_pow(attempt - 1);
        Some(
            self.initial_delay
                .saturating_mul(factor)
                .min(self.max_delay),
        )
    }
}
