/// The bundle page: catalog, purchase dialog and the signed-in service.
///
/// Mirrors one mounted page of the web dashboard. Dropping it aborts any
/// catalog fetch still in flight.
use rust_decimal::Decimal;
use tracing::warn;

use crate::api::{Bundle, Transaction, UserProfile};
use crate::catalog::{BundleQuery, CatalogLoader};
use crate::error::{DashboardError, Result};
use crate::purchase::{Notice, PurchaseController};
use crate::service::DashboardService;
use crate::session::Session;

pub struct Dashboard {
    service: DashboardService,
    catalog: CatalogLoader,
    query: BundleQuery,
    bundles: Vec<Bundle>,
    purchase: PurchaseController,
}

impl Dashboard {
    pub fn new(service: DashboardService) -> Self {
        let catalog = CatalogLoader::new(service.api().clone());
        let purchase = PurchaseController::new(service.session());
        Self {
            service,
            catalog,
            query: BundleQuery::default(),
            bundles: Vec::new(),
            purchase,
        }
    }

    pub fn service(&self) -> &DashboardService {
        &self.service
    }

    pub fn session(&self) -> &Session {
        self.service.session()
    }

    pub fn wallet_balance(&self) -> Decimal {
        self.service.session().wallet_balance()
    }

    pub fn query(&self) -> &BundleQuery {
        &self.query
    }

    /// Bundles currently shown on the page.
    pub fn bundles(&self) -> &[Bundle] {
        &self.bundles
    }

    pub fn purchase(&self) -> &PurchaseController {
        &self.purchase
    }

    pub fn purchase_mut(&mut self) -> &mut PurchaseController {
        &mut self.purchase
    }

    /// Load the catalog for `query`. On failure the page is left empty and
    /// the error is returned for the caller to surface.
    pub async fn load_bundles(&mut self, query: BundleQuery) -> Result<&[Bundle]> {
        self.query = query.clone();
        let token = self.service.session().token().to_string();
        match self.catalog.load(&token, query).await {
            Ok(bundles) => {
                self.bundles = bundles;
                Ok(&self.bundles)
            }
            Err(e) => {
                self.bundles.clear();
                Err(e)
            }
        }
    }

    /// Open the purchase dialog for a bundle shown on the page.
    pub fn select(&mut self, bundle_id: &str) -> Result<&Bundle> {
        let bundle = self
            .bundles
            .iter()
            .find(|b| b.id == bundle_id)
            .cloned()
            .ok_or_else(|| {
                DashboardError::InvalidState(format!(
                    "No bundle with ID '{bundle_id}' on this page. Use 'bundles' to list them."
                ))
            })?;
        self.purchase.select(bundle);
        self.purchase
            .selection()
            .bundle()
            .ok_or_else(|| DashboardError::InvalidState("Purchase dialog did not open.".into()))
    }

    /// Submit the active payment tab.
    ///
    /// Validation and state errors come back as `Err` with the dialog still
    /// open. Once a request has been sent the dialog closes whatever the
    /// answer, and the outcome is returned as a `Notice`.
    pub async fn submit(&mut self) -> Result<Notice> {
        let request = self.purchase.begin_submit(self.service.session())?;
        let result = self.service.purchase(&request).await;
        let succeeded = result.is_ok();
        let notice = self.purchase.complete(result);

        if succeeded {
            if let Err(e) = self.service.refresh_user().await {
                warn!("could not refresh balance after purchase: {e}");
            }
        }
        Ok(notice)
    }

    pub async fn refresh_user(&mut self) -> Result<&UserProfile> {
        self.service.refresh_user().await
    }

    pub async fn transactions(&self) -> Result<Vec<Transaction>> {
        self.service.transactions().await
    }
}
