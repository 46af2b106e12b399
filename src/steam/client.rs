use std::time::Duration;

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tokio::time::Instant;
use tracing::debug;

use crate::config::settings::SteamConfig;
use crate::error::{ServiceError, UpstreamError};
use crate::observability::metrics::get_metrics;
use crate::steam::account::{Account, ServersResponse};
use crate::steam::service::AccountService;
use crate::utils::constants::{STEAM_API_VERSION, STEAM_ERROR_HEADER};

static LIST_ACCOUNTS: &'static str = "GetAccountList";
static CREATE_ACCOUNT: &'static str = "CreateAccount";
static RESET_LOGIN_TOKEN: &'static str = "ResetLoginToken";
static DELETE_ACCOUNT: &'static str = "DeleteAccount";

/// Every Steam Web API answer is wrapped as `{ "response": ... }`.
#[derive(Debug, Deserialize)]
struct SteamResponse {
    response: Value,
}

/// `IGameServersService` client authenticated with a publisher/user web API key.
#[derive(Debug, Clone)]
pub struct SteamClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SteamClient {
    pub fn new(config: &SteamConfig) -> Result<Self, ServiceError> {
        if config.api_key.trim().is_empty() {
            return Err(ServiceError::StartupConfiguration(
                "missing steam web api key".to_owned(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ServiceError::StartupConfiguration(format!("http client: {}", e)))?;

        let mut base_url = config.base_url.to_owned();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            client,
            api_key: config.api_key.to_owned(),
            base_url,
        })
    }

    async fn query(
        &self,
        operation: &'static str,
        method: Method,
        params: &[(&str, String)],
    ) -> Result<Value, UpstreamError> {
        let metrics = get_metrics().await;
        let start = Instant::now();
        metrics.upstream_calls.with_label_values(&[operation]).inc();

        let result = self.send(operation, method, params).await;

        metrics
            .upstream_duration
            .with_label_values(&[operation])
            .observe(start.elapsed().as_secs_f64());
        if let Err(err) = &result {
            metrics.upstream_failures.with_label_values(&[operation]).inc();
            debug!("steam {} failed: {}", operation, err);
        }
        result
    }

    async fn send(
        &self,
        operation: &'static str,
        method: Method,
        params: &[(&str, String)],
    ) -> Result<Value, UpstreamError> {
        let url = format!("{}{}/{}", self.base_url, operation, STEAM_API_VERSION);
        let response = self
            .client
            .request(method, &url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        // steam reports failures in a header, often alongside a 200
        if let Some(message) = response
            .headers()
            .get(STEAM_ERROR_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|message| !message.is_empty())
        {
            return Err(UpstreamError::Signaled {
                operation,
                message: message.to_owned(),
            });
        }

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { operation, status });
        }

        let body = response.bytes().await?;
        let envelope: SteamResponse = serde_json::from_slice(&body)?;
        Ok(envelope.response)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, UpstreamError> {
    serde_json::from_value(value).map_err(UpstreamError::from)
}

impl AccountService for SteamClient {
    async fn list_accounts(&self) -> Result<Vec<Account>, UpstreamError> {
        let value = self.query(LIST_ACCOUNTS, Method::GET, &[]).await?;
        decode::<ServersResponse>(value).map(|list| list.servers)
    }

    async fn create_account(&self, app_id: u32, memo: &str) -> Result<Account, UpstreamError> {
        let params = [("appid", app_id.to_string()), ("memo", memo.to_owned())];
        let value = self.query(CREATE_ACCOUNT, Method::POST, &params).await?;
        decode(value)
    }

    async fn reset_login_token(&self, steam_id: &str) -> Result<Account, UpstreamError> {
        let params = [("steamid", steam_id.to_owned())];
        let value = self.query(RESET_LOGIN_TOKEN, Method::POST, &params).await?;
        decode(value)
    }

    async fn delete_account(&self, steam_id: &str) -> Result<(), UpstreamError> {
        let params = [("steamid", steam_id.to_owned())];
        self.query(DELETE_ACCOUNT, Method::POST, &params).await?;
        Ok(())
    }
}
