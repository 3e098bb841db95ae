use bevy_log::{info, warn};

use super::{PersistError, PlacementRecord, PlacementSink};
use constants::api::{DEFAULT_API_HOST, SAVE_ROUTE, TUNNEL_DOMAIN_SUFFIX};

/// Base URL of the placement API.
///
/// A non-empty `configured` value wins. Otherwise the URL is built from the
/// host the app is served from and `port`.
pub fn resolve_api_base_url(configured: Option<&str>, hostname: &str, port: u16) -> String {
    if let Some(configured) = configured.map(str::trim).filter(|value| !value.is_empty()) {
        return configured.trim_end_matches('/').to_string();
    }

    let hostname = match hostname.trim() {
        "" => DEFAULT_API_HOST,
        host => host,
    };

    if hostname.ends_with(TUNNEL_DOMAIN_SUFFIX) {
        warn!(
            "Tunnel domain detected ({}). Configure an explicit API base URL if saves fail.",
            hostname
        );
    }

    format!("http://{}:{}", hostname, port)
}

/// Base URL for the page currently hosting the app.
#[cfg(target_arch = "wasm32")]
pub fn page_api_base_url(configured: Option<&str>) -> String {
    let hostname = web_sys::window()
        .and_then(|window| window.location().hostname().ok())
        .unwrap_or_default();
    resolve_api_base_url(configured, &hostname, constants::api::DEFAULT_API_PORT)
}

/// Sends each record as `POST {base}/api/save` without waiting for the response.
#[derive(Clone)]
pub struct HttpPlacementSink {
    client: reqwest::Client,
    save_url: String,
    #[cfg(not(target_arch = "wasm32"))]
    runtime: Option<tokio::runtime::Handle>,
}

impl HttpPlacementSink {
    /// On native targets this captures the tokio runtime entered by the caller.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            save_url: format!("{}{}", base_url.trim_end_matches('/'), SAVE_ROUTE),
            #[cfg(not(target_arch = "wasm32"))]
            runtime: tokio::runtime::Handle::try_current().ok(),
        }
    }

    pub fn save_url(&self) -> &str {
        &self.save_url
    }

    async fn post(
        client: reqwest::Client,
        url: String,
        record: PlacementRecord,
    ) -> Result<serde_json::Value, PersistError> {
        let response = client.post(&url).json(&record).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PersistError::UnexpectedStatus(status.as_u16()));
        }

        Ok(response.json::<serde_json::Value>().await?)
    }

    async fn save(client: reqwest::Client, url: String, record: PlacementRecord) {
        match Self::post(client, url, record).await {
            Ok(payload) => info!("Placement saved: {}", payload),
            Err(e) => warn!("Failed to save placement: {}", e),
        }
    }
}

impl PlacementSink for HttpPlacementSink {
    #[cfg(not(target_arch = "wasm32"))]
    fn submit(&self, record: PlacementRecord) -> Result<(), PersistError> {
        let runtime = self.runtime.as_ref().ok_or(PersistError::NoRuntime)?;
        runtime.spawn(Self::save(self.client.clone(), self.save_url.clone(), record));
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    fn submit(&self, record: PlacementRecord) -> Result<(), PersistError> {
        wasm_bindgen_futures::spawn_local(Self::save(
            self.client.clone(),
            self.save_url.clone(),
            record,
        ));
        Ok(())
    }
}
