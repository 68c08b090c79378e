//! HTTP client for the game server's RL endpoint.
//!
//! One request per call, no retries: a failed request is returned to the
//! caller, which decides whether to abandon the episode.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{GameServer, InfoResponse, ResetResponse, StepResponse};
use crate::config::ServerConfig;
use crate::domain::TradeInstruction;
use crate::error::{Result, TradefestError};

#[derive(Debug, Clone)]
pub struct HttpGameServer {
    http: Client,
    base_url: Url,
}

impl HttpGameServer {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        // Trailing slash so `join` appends instead of replacing the last segment
        let mut base = config.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base)?;

        let http = Client::builder()
            .user_agent("tradefest-env/0.1")
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| TradefestError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&TradeInstruction>,
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!(%method, %url, trade = ?body, "game server request");

        let mut req = self.http.request(method, url);
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(TradefestError::Server {
                endpoint: format!("/{}", path),
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl GameServer for HttpGameServer {
    async fn reset(&self) -> Result<ResetResponse> {
        self.request_json(Method::POST, "reset", None).await
    }

    async fn info(&self) -> Result<InfoResponse> {
        self.request_json(Method::GET, "info", None).await
    }

    async fn step(&self, trade: Option<TradeInstruction>) -> Result<StepResponse> {
        self.request_json(Method::POST, "step", trade.as_ref()).await
    }
}
