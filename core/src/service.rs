use tracing::{info, warn};

use crate::api::{ApiClient, PurchaseReceipt, Transaction, UserProfile};
use crate::error::{Result, ValidationErrors};
use crate::purchase::PurchaseRequest;
use crate::session::{Session, SessionStore};

/// Check sign-in input before it goes to the server.
pub fn validate_login(user_name: &str, password: &str) -> std::result::Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if user_name.trim().is_empty() {
        errors.push("user_name", "Username is required");
    }
    if password.is_empty() {
        errors.push("password", "Password is required");
    }
    errors.into_result(())
}

/// API access bound to one authenticated session. The session is passed in
/// explicitly and only replaced by `refresh_user`.
pub struct DashboardService {
    api: ApiClient,
    session: Session,
}

impl DashboardService {
    pub fn new(api: ApiClient, session: Session) -> Self {
        Self { api, session }
    }

    /// Sign in and return the service plus the server's greeting, if any.
    pub async fn login(
        api: ApiClient,
        user_name: &str,
        password: &str,
    ) -> Result<(Self, Option<String>)> {
        validate_login(user_name, password)?;
        let result = api.login(user_name.trim(), password).await?;
        info!(user = %result.user.user_name, "signed in");
        let session = Session::new(result.token, result.user);
        Ok((Self::new(api, session), result.message))
    }

    /// Pick up a remembered session. The profile is re-fetched so the wallet
    /// balance comes from the server, not from the file.
    ///
    /// `Ok(None)` when nothing is remembered, or when the token was refused
    /// (401); the stale file is removed in that case.
    pub async fn resume(api: ApiClient, store: &SessionStore) -> Result<Option<Self>> {
        let Some(session) = store.load() else {
            return Ok(None);
        };
        let mut service = Self::new(api, session);
        let refreshed = service.refresh_user().await.map(|_| ());
        match refreshed {
            Ok(()) => {
                info!(user = %service.user().user_name, "resumed remembered session");
                Ok(Some(service))
            }
            Err(e) if e.is_unauthorized() => {
                warn!("remembered session expired, signing in again");
                store.clear()?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user(&self) -> &UserProfile {
        self.session.user()
    }

    /// Re-fetch the profile so the wallet balance reflects the server.
    pub async fn refresh_user(&mut self) -> Result<&UserProfile> {
        let user = self.api.current_user(self.session.token()).await?;
        self.session = self.session.with_user(user);
        Ok(self.session.user())
    }

    pub async fn purchase(&self, request: &PurchaseRequest) -> Result<PurchaseReceipt> {
        let token = self.session.token();
        match request {
            PurchaseRequest::Wallet(p) => {
                info!(bundle_id = %p.bundle_id, "buying bundle with wallet");
                self.api.buy_with_wallet(token, p).await
            }
            PurchaseRequest::Transfer(p) => {
                info!(amount = %p.amount, "buying bundle by transfer");
                self.api.buy_with_transfer(token, p).await
            }
        }
    }

    pub async fn transactions(&self) -> Result<Vec<Transaction>> {
        self.api.transactions(self.session.token()).await
    }
}
