/// Bundle catalog loading and client-side filtering.
///
/// The API always returns the whole catalog; narrowing by `network`/`type`
/// happens here, with a fallback to the unfiltered list so the page is never
/// empty when the server has data.
use std::fmt;

use tokio::task::JoinHandle;
use tracing::debug;
use zeroize::Zeroizing;

use crate::api::{ApiClient, Bundle};
use crate::error::{DashboardError, Result};

/// Optional `network` and `type` parameters of the bundle page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleQuery {
    pub network: Option<String>,
    pub kind: Option<String>,
}

impl BundleQuery {
    pub fn new(network: Option<&str>, kind: Option<&str>) -> Self {
        let clean = |s: Option<&str>| {
            s.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            network: clean(network),
            kind: clean(kind),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.network.is_none() && self.kind.is_none()
    }

    /// This query, or `fallback` when no filter was given.
    #[must_use]
    pub fn or(self, fallback: BundleQuery) -> BundleQuery {
        if self.is_empty() {
            fallback
        } else {
            self
        }
    }
}

impl fmt::Display for BundleQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.network, &self.kind) {
            (None, None) => write!(f, "all bundles"),
            (Some(n), None) => write!(f, "network={n}"),
            (None, Some(k)) => write!(f, "type={k}"),
            (Some(n), Some(k)) => write!(f, "network={n} type={k}"),
        }
    }
}

/// Apply the page's filter policy:
/// - no `type`: the full list, whatever `network` says;
/// - otherwise bundles matching both `network` and `type` exactly;
/// - if nothing matches, the full list again.
#[must_use]
pub fn filter_bundles(bundles: Vec<Bundle>, query: &BundleQuery) -> Vec<Bundle> {
    let Some(kind) = query.kind.as_deref() else {
        return bundles;
    };
    let network = query.network.as_deref();

    let matching: Vec<Bundle> = bundles
        .iter()
        .filter(|b| Some(b.network.as_str()) == network && b.kind == kind)
        .cloned()
        .collect();

    if matching.is_empty() {
        debug!(%query, "no bundles match filter, showing full catalog");
        bundles
    } else {
        matching
    }
}

struct InFlight {
    query: BundleQuery,
    handle: JoinHandle<Result<Vec<Bundle>>>,
}

/// Runs catalog fetches as abortable tasks. Only the most recent request
/// can produce a result; dropping the loader aborts whatever is in flight.
pub struct CatalogLoader {
    api: ApiClient,
    in_flight: Option<InFlight>,
}

impl CatalogLoader {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            in_flight: None,
        }
    }

    /// Start fetching for `query`, aborting any earlier fetch.
    pub fn request(&mut self, token: &str, query: BundleQuery) {
        self.cancel();
        let api = self.api.clone();
        let token = Zeroizing::new(token.to_string());
        debug!(%query, "loading bundle catalog");
        let handle = tokio::spawn(async move { api.bundles(&token).await });
        self.in_flight = Some(InFlight { query, handle });
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Abort the in-flight fetch, if any. Its result is discarded.
    pub fn cancel(&mut self) {
        if let Some(prev) = self.in_flight.take() {
            prev.handle.abort();
        }
    }

    /// Wait for the latest request and return its filtered bundles.
    /// `None` when nothing was requested.
    pub async fn finish(&mut self) -> Option<Result<Vec<Bundle>>> {
        let InFlight { query, handle } = self.in_flight.take()?;
        let result = match handle.await {
            Ok(fetched) => fetched.map(|all| filter_bundles(all, &query)),
            Err(e) => Err(DashboardError::Other(anyhow::anyhow!(
                "catalog fetch did not complete: {e}"
            ))),
        };
        Some(result)
    }

    /// `request` then `finish`.
    pub async fn load(&mut self, token: &str, query: BundleQuery) -> Result<Vec<Bundle>> {
        self.request(token, query);
        match self.finish().await {
            Some(result) => result,
            None => Ok(Vec::new()),
        }
    }
}

impl Drop for CatalogLoader {
    fn drop(&mut self) {
        self.cancel();
    }
}
