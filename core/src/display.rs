/// Output formatting: naira amounts, the bundle table, the purchase dialog
/// and the transaction list.
use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::api::{Bundle, Transaction, UserProfile};
use crate::purchase::{PaymentTab, PurchaseController};
use crate::selection::Selection;

const NAIRA: char = '₦';

/// Format an amount as naira with thousands separators and two decimals.
/// Examples: 1500 -> "₦1,500.00", 250.5 -> "₦250.50", -3 -> "-₦3.00"
#[must_use]
pub fn format_naira(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let abs = rounded.abs();
    let whole = abs.trunc();
    let cents = ((abs - whole) * Decimal::ONE_HUNDRED).to_u32().unwrap_or(0);
    let whole_str = match whole.to_u128() {
        Some(w) => w.to_formatted_string(&Locale::en),
        None => whole.to_string(),
    };
    format!("{sign}{NAIRA}{whole_str}.{cents:02}")
}

/// Format the bundle catalog as an aligned table.
#[must_use]
pub fn format_bundles(bundles: &[Bundle]) -> String {
    if bundles.is_empty() {
        return "No bundles available.".to_string();
    }

    let name_w = bundles
        .iter()
        .map(|b| b.display_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Display Name".len());
    let id_w = bundles
        .iter()
        .map(|b| b.id.chars().count())
        .max()
        .unwrap_or(0)
        .max(2);

    let mut lines = Vec::with_capacity(bundles.len() + 1);
    lines.push(format!(
        "{:<id_w$}  {:<name_w$}  {:<8}  {:<8}  {:<8}  {:>12}",
        "ID", "Display Name", "Value", "Network", "Type", "Price"
    ));
    for b in bundles {
        lines.push(format!(
            "{:<id_w$}  {:<name_w$}  {:<8}  {:<8}  {:<8}  {:>12}",
            b.id,
            b.display_name,
            b.value,
            b.network,
            b.kind,
            format_naira(b.price),
        ));
    }
    lines.join("\n")
}

/// Render the purchase dialog for the current controller state.
#[must_use]
pub fn format_purchase_dialog(controller: &PurchaseController, balance: Decimal) -> String {
    let bundle = match controller.selection() {
        Selection::Open(b) => b,
        Selection::Closed => return "No purchase in progress.".to_string(),
    };

    let tab_label = |tab: PaymentTab, label: &str| {
        if controller.tab() == tab {
            format!("[{label}]")
        } else {
            format!(" {label} ")
        }
    };

    let mut lines = vec![
        format!(
            "Buy {} ({} {} {}) for {}",
            bundle.display_name,
            bundle.network,
            bundle.kind,
            bundle.value,
            format_naira(bundle.price)
        ),
        format!(
            "  {}  {}",
            tab_label(PaymentTab::Wallet, "Pay with Wallet"),
            tab_label(PaymentTab::Transfer, "Pay with Transfer")
        ),
    ];

    match controller.tab() {
        PaymentTab::Wallet => {
            lines.push(format!("  Wallet balance: {}", format_naira(balance)));
        }
        PaymentTab::Transfer => {
            let form = controller.form();
            let show = |v: &str| if v.is_empty() { "-".to_string() } else { v.to_string() };
            lines.push(format!("  user_name:   {}", show(&form.user_name)));
            lines.push(format!("  amount:      {}", show(&form.amount)));
            lines.push(format!("  cgwallet_id: {}", show(&form.cgwallet_id)));
        }
    }
    if controller.is_busy() {
        lines.push("  Submitting...".to_string());
    } else {
        lines.push("  Type 'pay' to submit or 'close' to cancel.".to_string());
    }
    lines.join("\n")
}

/// Format the signed-in user and balance.
#[must_use]
pub fn format_user(user: &UserProfile) -> String {
    format!(
        "  User:    {}\n  Balance: {}",
        user.user_name,
        format_naira(user.balance)
    )
}

/// Format a list of transactions for display.
#[must_use]
pub fn format_transactions(txs: &[Transaction]) -> String {
    if txs.is_empty() {
        return "No transactions found.".to_string();
    }

    let mut lines = Vec::with_capacity(txs.len());
    for tx in txs {
        let date = tx.created_at.as_deref().unwrap_or("-");
        let reference = tx.reference.as_deref().unwrap_or(&tx.id);
        let amount = tx
            .amount
            .map(format_naira)
            .unwrap_or_else(|| "-".to_string());
        let status = tx.status.as_deref().unwrap_or("-");
        let description = tx.description.as_deref().unwrap_or("");
        lines.push(
            format!("{date:<20}  {reference:<16}  {amount:>14}  {status:<10}  {description}")
                .trim_end()
                .to_string(),
        );
    }
    lines.join("\n")
}

#[must_use]
pub fn format_bundles_json(bundles: &[Bundle]) -> String {
    serde_json::to_string_pretty(bundles).unwrap_or_else(|_| "[]".to_string())
}

#[must_use]
pub fn format_transactions_json(txs: &[Transaction]) -> String {
    serde_json::to_string_pretty(txs).unwrap_or_else(|_| "[]".to_string())
}

#[must_use]
pub fn format_user_json(user: &UserProfile) -> String {
    serde_json::json!({
        "user_name": user.user_name,
        "balance": user.balance.to_string(),
    })
    .to_string()
}
