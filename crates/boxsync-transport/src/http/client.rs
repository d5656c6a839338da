//! reqwest-based [`ContainerRemote`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use tracing::{debug, warn};

use boxsync_core::config::RemoteConfig;
use boxsync_core::error::{AppError, ErrorKind};
use boxsync_core::result::AppResult;
use boxsync_core::types::ContainerId;
use boxsync_entity::container::ContainerRecord;
use boxsync_entity::remote::ContainerRemote;

use super::decode::{decode_snapshot, decode_unlock};
use super::endpoints::{self, PARAM_CONTAINER_ID};

/// Talks to the device's `.fcgi` container endpoints.
#[derive(Debug, Clone)]
pub struct HttpContainerRemote {
    client: Client,
    base_url: String,
}

impl HttpContainerRemote {
    /// Create a client for the device at `config.base_url`.
    pub fn new(config: &RemoteConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, format!("Failed to build HTTP client: {e}"), e)
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The device base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of `path` with `params` as query string.
    pub fn endpoint_url(&self, path: &str, params: &[(&str, String)]) -> AppResult<Url> {
        let raw = format!("{}{path}", self.base_url);
        let mut url = Url::parse(&raw)
            .map_err(|e| AppError::configuration(format!("Invalid device URL '{raw}': {e}")))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    async fn call(&self, method: Method, path: &str, params: &[(&str, String)]) -> AppResult<String> {
        let url = self.endpoint_url(path, params)?;
        debug!(%method, path, "Device request");

        let response = self
            .client
            .request(method, url)
            .send()
            .await
            .map_err(|e| map_send_error(path, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_send_error(path, e))?;

        if !status.is_success() {
            warn!(path, status = status.as_u16(), "Device rejected request");
            return Err(rejected(path, status, body));
        }
        Ok(body)
    }

    async fn post(&self, path: &str, params: &[(&str, String)]) -> AppResult<String> {
        self.call(Method::POST, path, params).await
    }
}

fn map_send_error(path: &str, e: reqwest::Error) -> AppError {
    if e.is_connect() || e.is_timeout() {
        AppError::with_source(ErrorKind::ServiceUnavailable, format!("Device unreachable at {path}: {e}"), e)
    } else {
        AppError::with_source(ErrorKind::Remote, format!("Request to {path} failed: {e}"), e)
    }
}

fn rejected(path: &str, status: StatusCode, body: String) -> AppError {
    let err = AppError::remote(format!("{path} returned {status}"));
    let body = body.trim();
    if body.is_empty() {
        err
    } else {
        err.with_user_message(body)
    }
}

fn id_param(id: ContainerId) -> (&'static str, String) {
    (PARAM_CONTAINER_ID, id.to_string())
}

#[async_trait]
impl ContainerRemote for HttpContainerRemote {
    async fn fetch_containers(&self) -> AppResult<Vec<ContainerRecord>> {
        let body = self.call(Method::GET, endpoints::CONTAINERS, &[]).await?;
        decode_snapshot(&body)
    }

    async fn lock(&self, id: ContainerId) -> AppResult<()> {
        self.post(endpoints::LOCK, &[id_param(id)]).await?;
        Ok(())
    }

    async fn unlock(&self, id: ContainerId, password: &str) -> AppResult<bool> {
        let params = [
            id_param(id),
            (endpoints::PARAM_CONTAINER_PASSWORD, password.to_string()),
        ];
        let body = self.post(endpoints::UNLOCK, &params).await?;
        decode_unlock(&body)
    }

    async fn create(&self, parent: ContainerId, name: &str, password: Option<&str>) -> AppResult<()> {
        let mut params = vec![
            id_param(parent),
            (endpoints::PARAM_CONTAINER_NAME, name.to_string()),
        ];
        if let Some(password) = password {
            params.push((endpoints::PARAM_CONTAINER_PASSWORD, password.to_string()));
        }
        self.post(endpoints::CREATE, &params).await?;
        Ok(())
    }

    async fn rename(&self, id: ContainerId, name: &str) -> AppResult<()> {
        let params = [
            id_param(id),
            (endpoints::PARAM_CONTAINER_NAME, name.to_string()),
        ];
        self.post(endpoints::RENAME, &params).await?;
        Ok(())
    }

    async fn delete(&self, id: ContainerId) -> AppResult<()> {
        self.post(endpoints::DELETE, &[id_param(id)]).await?;
        Ok(())
    }

    async fn set_password(&self, id: ContainerId, old_password: &str, new_password: &str) -> AppResult<()> {
        let params = [
            id_param(id),
            (endpoints::PARAM_OLD_PASSWORD, old_password.to_string()),
            (endpoints::PARAM_NEW_PASSWORD, new_password.to_string()),
        ];
        self.post(endpoints::SET_PASSWORD, &params).await?;
        Ok(())
    }
}
