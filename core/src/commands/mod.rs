/// Command definitions and parsing for the dashboard REPL and one-shot mode.
mod execute;
mod help;
mod parse;

pub use help::help_text;

use crate::catalog::BundleQuery;
use crate::dashboard::Dashboard;
use crate::display;
use crate::purchase::{PaymentTab, TransferField};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Sign in: login [user_name] [--remember]
    Login {
        user_name: Option<String>,
        remember: bool,
    },
    /// Sign out and forget the remembered session
    Logout,
    /// Show the signed-in user and wallet balance
    Balance,
    /// List bundles: bundles [network] [type] or bundles network=MTN type=data
    Bundles { query: BundleQuery },
    /// Open the purchase dialog: buy <bundle_id>
    Buy { bundle_id: String },
    /// Switch payment method: tab <wallet|transfer>
    Tab { tab: PaymentTab },
    /// Fill a transfer form field: set <user_name|amount|cgwallet_id> <value>
    Set { field: TransferField, value: String },
    /// Show the purchase dialog
    Dialog,
    /// Submit the active payment method
    Pay,
    /// Close the purchase dialog
    Close,
    /// Show transaction history
    History,
    /// Print help
    Help { command: Option<String> },
    /// Exit the dashboard
    Exit,
}

impl Command {
    /// Returns a confirmation prompt if this command should ask before executing.
    pub fn confirmation_prompt(&self, dashboard: &Dashboard) -> Option<String> {
        match self {
            Command::Pay => {
                let purchase = dashboard.purchase();
                let bundle = purchase.selection().bundle()?;
                let method = match purchase.tab() {
                    PaymentTab::Wallet => "your wallet balance".to_string(),
                    PaymentTab::Transfer => format!(
                        "a transfer of {} from {}",
                        purchase.form().amount.trim(),
                        purchase.form().user_name.trim()
                    ),
                };
                Some(format!(
                    "Buy {} for {} with {method}?",
                    bundle.display_name,
                    display::format_naira(bundle.price),
                ))
            }
            _ => None,
        }
    }
}
