use std::path::PathBuf;

use anyhow::Context;

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod purchase;
pub mod selection;
pub mod service;
pub mod session;

pub use api::{ApiClient, Bundle, Transaction, UserProfile};
pub use catalog::{filter_bundles, BundleQuery, CatalogLoader};
pub use commands::Command;
pub use config::ApiConfig;
pub use dashboard::Dashboard;
pub use error::{DashboardError, ValidationErrors};
pub use purchase::{Notice, PaymentTab, PurchaseController, TransferForm};
pub use selection::{CloseReason, Selection};
pub use service::DashboardService;
pub use session::{Session, SessionStore};

/// XDG-compliant data directory for the remembered session.
/// Linux: `~/.local/share/cg-dashboard/`, macOS: `~/Library/Application Support/cg-dashboard/`
pub fn data_dir() -> anyhow::Result<PathBuf> {
    let dir = dirs::data_dir()
        .context("Cannot determine data directory")?
        .join("cg-dashboard");
    Ok(dir)
}
