/// Thin wrapper around `reqwest` for the remote dashboard API.
///
/// Every endpoint answers with the same `{ success, message, data }`
/// envelope; this module turns transport failures, non-2xx statuses and
/// `success != 1` into typed `DashboardError`s so callers never poke at
/// optional JSON fields.
mod types;

pub use types::*;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::config::ApiConfig;
use crate::error::{DashboardError, Result};

const LOGIN_PATH: &str = "login";
const USER_PATH: &str = "user";
const BUNDLES_PATH: &str = "cg-bundles";
const BUY_WALLET_PATH: &str = "cg-bundles/buy";
const BUY_TRANSFER_PATH: &str = "cg-bundles/transfer";
const TRANSACTIONS_PATH: &str = "transactions";

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

/// Decoded envelope after the success check: server message plus raw data.
struct Accepted {
    message: Option<String>,
    data: Option<serde_json::Value>,
}

impl Accepted {
    fn data<T: DeserializeOwned>(self, what: &str) -> Result<T> {
        let data = self
            .data
            .ok_or_else(|| DashboardError::InvalidResponse(format!("missing {what} data")))?;
        serde_json::from_value(data)
            .map_err(|e| DashboardError::InvalidResponse(format!("malformed {what} data: {e}")))
    }
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DashboardError::Network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Exchange credentials for a bearer token and the user profile.
    pub async fn login(&self, user_name: &str, password: &str) -> Result<LoginResult> {
        let body = LoginRequest {
            user_name,
            password,
        };
        let accepted = self
            .send(self.request(Method::POST, LOGIN_PATH, None).json(&body))
            .await?;
        let message = accepted.message.clone();
        let data: LoginData = accepted.data("login")?;
        Ok(LoginResult {
            token: Zeroizing::new(data.token),
            user: data.user,
            message,
        })
    }

    /// Fetch the profile (name and wallet balance) for the token's owner.
    pub async fn current_user(&self, token: &str) -> Result<UserProfile> {
        let data: UserData = self
            .get(USER_PATH, token)
            .await?
            .data("user")?;
        Ok(data.user)
    }

    /// Fetch the full, unfiltered bundle catalog.
    pub async fn bundles(&self, token: &str) -> Result<Vec<Bundle>> {
        let data: BundlesData = self
            .get(BUNDLES_PATH, token)
            .await?
            .data("bundle")?;
        debug!(count = data.bundles.len(), "fetched bundle catalog");
        Ok(data.bundles)
    }

    pub async fn buy_with_wallet(
        &self,
        token: &str,
        purchase: &WalletPurchase,
    ) -> Result<PurchaseReceipt> {
        self.mutate(BUY_WALLET_PATH, token, purchase).await
    }

    pub async fn buy_with_transfer(
        &self,
        token: &str,
        purchase: &TransferPurchase,
    ) -> Result<PurchaseReceipt> {
        self.mutate(BUY_TRANSFER_PATH, token, purchase).await
    }

    pub async fn transactions(&self, token: &str) -> Result<Vec<Transaction>> {
        let data: TransactionsData = self
            .get(TRANSACTIONS_PATH, token)
            .await?
            .data("transaction")?;
        Ok(data.transactions)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = self.config.endpoint(path);
        debug!(%method, %url, "api request");
        let builder = self.client.request(method, url);
        match token {
            Some(t) => builder.bearer_auth(t),
            None => builder,
        }
    }

    async fn get(&self, path: &str, token: &str) -> Result<Accepted> {
        self.send(self.request(Method::GET, path, Some(token))).await
    }

    async fn mutate<B: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<PurchaseReceipt> {
        let accepted = self
            .send(self.request(Method::POST, path, Some(token)).json(body))
            .await?;
        Ok(PurchaseReceipt {
            message: accepted.message,
        })
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Accepted> {
        let response = builder.send().await?;
        decode(response).await
    }
}

/// Classify a response: transport errors, HTTP rejections, envelope
/// rejections, then the accepted payload.
async fn decode(response: Response) -> Result<Accepted> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .unwrap_or_default()
            .into_message()
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
        warn!(status = status.as_u16(), %message, "request rejected");
        return Err(DashboardError::Rejected {
            status: Some(status.as_u16()),
            message,
        });
    }

    let envelope: Envelope<serde_json::Value> = serde_json::from_str(&body)
        .map_err(|e| DashboardError::InvalidResponse(e.to_string()))?;

    if !envelope.success {
        // Some endpoints nest the reason like an HTTP error body.
        let message = envelope
            .message
            .filter(|m| !m.trim().is_empty())
            .or_else(|| {
                serde_json::from_str::<ErrorBody>(&body)
                    .ok()
                    .and_then(ErrorBody::into_message)
            })
            .unwrap_or_else(|| "Request was not successful.".to_string());
        warn!(%message, "request not successful");
        return Err(DashboardError::Rejected {
            status: Some(status.as_u16()),
            message,
        });
    }

    Ok(Accepted {
        message: envelope.message,
        data: envelope.data,
    })
}
