use anyhow::{bail, Result};

use super::help::help_text;
use super::Command;
use crate::dashboard::Dashboard;
use crate::display;
use crate::purchase::PaymentTab;
use crate::selection::CloseReason;

impl Command {
    /// Execute a command against the bundle page and return the output string.
    pub async fn execute(&self, dashboard: &mut Dashboard, json_output: bool) -> Result<String> {
        match self {
            Command::Balance => {
                let user = dashboard.refresh_user().await?;
                if json_output {
                    Ok(display::format_user_json(user))
                } else {
                    Ok(display::format_user(user))
                }
            }

            Command::Bundles { query } => {
                let bundles = dashboard.load_bundles(query.clone()).await?;
                if json_output {
                    Ok(display::format_bundles_json(bundles))
                } else {
                    Ok(display::format_bundles(bundles))
                }
            }

            Command::Buy { bundle_id } => {
                dashboard.select(bundle_id)?;
                Ok(display::format_purchase_dialog(
                    dashboard.purchase(),
                    dashboard.wallet_balance(),
                ))
            }

            Command::Tab { tab } => {
                dashboard.purchase_mut().set_tab(*tab);
                Ok(display::format_purchase_dialog(
                    dashboard.purchase(),
                    dashboard.wallet_balance(),
                ))
            }

            Command::Set { field, value } => {
                let purchase = dashboard.purchase_mut();
                purchase.set_field(*field, value);
                if purchase.tab() != PaymentTab::Transfer {
                    purchase.set_tab(PaymentTab::Transfer);
                }
                Ok(display::format_purchase_dialog(
                    dashboard.purchase(),
                    dashboard.wallet_balance(),
                ))
            }

            Command::Dialog => Ok(display::format_purchase_dialog(
                dashboard.purchase(),
                dashboard.wallet_balance(),
            )),

            Command::Pay => {
                let notice = dashboard.submit().await?;
                if json_output {
                    Ok(serde_json::json!({
                        "success": notice.is_success(),
                        "message": notice.message(),
                    })
                    .to_string())
                } else {
                    Ok(notice.to_string())
                }
            }

            Command::Close => {
                let was_open = dashboard.purchase().selection().is_open();
                dashboard.purchase_mut().close(CloseReason::Explicit);
                if was_open {
                    Ok("Purchase dialog closed.".to_string())
                } else {
                    Ok(String::new())
                }
            }

            Command::History => {
                let txs = dashboard.transactions().await?;
                if json_output {
                    Ok(display::format_transactions_json(&txs))
                } else {
                    Ok(display::format_transactions(&txs))
                }
            }

            Command::Help { command } => Ok(help_text(command.as_deref())),

            Command::Exit => Ok(String::new()),

            Command::Login { .. } | Command::Logout => {
                bail!("'{}' is handled by the shell.", self.name())
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Command::Login { .. } => "login",
            Command::Logout => "logout",
            Command::Balance => "balance",
            Command::Bundles { .. } => "bundles",
            Command::Buy { .. } => "buy",
            Command::Tab { .. } => "tab",
            Command::Set { .. } => "set",
            Command::Dialog => "dialog",
            Command::Pay => "pay",
            Command::Close => "close",
            Command::History => "history",
            Command::Help { .. } => "help",
            Command::Exit => "exit",
        }
    }
}
