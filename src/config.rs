//! Configuration for the conversion client.
//!
//! All client behaviour is controlled through [`ClientConfig`], built via
//! its [`ClientConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a configuration across concurrent conversions and to
//! log the settings a given run used.
//!
//! # Design choice: builder over constructor
//! Callers almost always want the defaults — the public service endpoint
//! and the service's expected 3-second poll cadence. The builder lets them
//! set only what they care about (typically nothing, or a custom
//! [`Transport`] in tests).

use crate::error::ConversionError;
use crate::progress::SharedObserver;
use crate::transport::Transport;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Endpoint of the public conversion cloud.
const DEFAULT_BASE_URL: &str = "http://www.listentoyoutube.com";

/// Poll cadence the service expects; faster polling buys nothing because
/// the service updates job state on roughly this period.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a conversion session.
///
/// Built via [`ClientConfig::builder()`] or [`ClientConfig::default()`].
///
/// # Example
/// ```rust
/// use listube::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::builder()
///     .request_timeout(Duration::from_secs(10))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the conversion service. Default: the public
    /// listentoyoutube.com endpoint.
    pub base_url: Url,

    /// Delay between status polls. Default: 3 seconds.
    ///
    /// There is no upper bound on the number of polls; a conversion that
    /// never finishes polls forever. Callers wanting a timeout drop the
    /// stream (or race the `resolve` future against a deadline).
    pub poll_interval: Duration,

    /// Per-request HTTP timeout. Default: 30 seconds.
    pub request_timeout: Duration,

    /// User agent sent with every request.
    pub user_agent: String,

    /// Pre-constructed transport. Takes precedence over the built-in
    /// reqwest transport; tests inject scripted doubles here.
    pub transport: Option<Arc<dyn Transport>>,

    /// Observer receiving progress callbacks from [`crate::resolve`].
    /// Default: none (events are silently discarded on the eager path).
    pub observer: Option<SharedObserver>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: concat!("listube/", env!("CARGO_PKG_VERSION")).to_string(),
            transport: None,
            observer: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("poll_interval", &self.poll_interval)
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .field("transport", &self.transport.as_ref().map(|_| "<dyn Transport>"))
            .field("observer", &self.observer.as_ref().map(|_| "<dyn ProgressObserver>"))
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// URL of the job-submission endpoint under the configured base.
    pub(crate) fn submit_url(&self) -> String {
        format!("{}/cc/conversioncloud.php", self.base_url.as_str().trim_end_matches('/'))
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: Url) -> Self {
        self.config.base_url = url;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.config.transport = Some(transport);
        self
    }

    pub fn observer(mut self, observer: SharedObserver) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, ConversionError> {
        let c = &self.config;
        if c.poll_interval.is_zero() {
            return Err(ConversionError::InvalidConfig(
                "poll interval must be non-zero".into(),
            ));
        }
        if c.request_timeout.is_zero() {
            return Err(ConversionError::InvalidConfig(
                "request timeout must be non-zero".into(),
            ));
        }
        match c.base_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ConversionError::InvalidConfig(format!(
                    "base URL must be http(s), got scheme '{other}'"
                )));
            }
        }
        Ok(self.config)
    }
}
