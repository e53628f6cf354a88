//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::SiteConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration and the remote API
/// client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    api: ApiClient,
}

impl AppState {
    /// Create application state with a default API client.
    #[must_use]
    pub fn new(config: SiteConfig) -> Self {
        let api = ApiClient::new(&config);
        Self::with_api(config, api)
    }

    /// Create application state with a preconfigured API client (used by
    /// tests to shrink retry delays).
    #[must_use]
    pub fn with_api(config: SiteConfig, api: ApiClient) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, api }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the TrackZone API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }
}
