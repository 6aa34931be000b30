/// Purchase dialog controller: bundle selection, payment tab, the transfer
/// form and the submit/complete cycle.
///
/// The controller never talks to the network. `begin_submit` validates and
/// hands back the request to send; `complete` takes the server's answer and
/// moves the dialog to its next state.
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::info;

use crate::api::{Bundle, PurchaseReceipt, TransferPurchase, WalletPurchase};
use crate::error::{DashboardError, Result, ValidationErrors};
use crate::selection::{CloseReason, Selection};
use crate::session::Session;

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Purchase successful.";

/// Which payment method the dialog shows. Exactly one is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaymentTab {
    #[default]
    Wallet,
    Transfer,
}

impl FromStr for PaymentTab {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wallet" | "balance" => Ok(Self::Wallet),
            "transfer" | "bank" => Ok(Self::Transfer),
            other => Err(format!(
                "Unknown payment method: '{other}'. Use 'wallet' or 'transfer'."
            )),
        }
    }
}

impl fmt::Display for PaymentTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wallet => write!(f, "wallet"),
            Self::Transfer => write!(f, "transfer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferField {
    UserName,
    Amount,
    CgWalletId,
}

impl FromStr for TransferField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user_name" | "username" | "user" => Ok(Self::UserName),
            "amount" | "amt" => Ok(Self::Amount),
            "cgwallet_id" | "wallet_id" | "cgwallet" => Ok(Self::CgWalletId),
            other => Err(format!(
                "Unknown field: '{other}'. Use 'user_name', 'amount' or 'cgwallet_id'."
            )),
        }
    }
}

/// Raw input of the transfer form. Values stay as typed until validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForm {
    pub user_name: String,
    pub amount: String,
    pub cgwallet_id: String,
}

impl TransferForm {
    /// Empty form with the user name taken from the session.
    pub fn prefilled(user_name: &str) -> Self {
        Self {
            user_name: user_name.to_string(),
            ..Self::default()
        }
    }

    pub fn set(&mut self, field: TransferField, value: &str) {
        let slot = match field {
            TransferField::UserName => &mut self.user_name,
            TransferField::Amount => &mut self.amount,
            TransferField::CgWalletId => &mut self.cgwallet_id,
        };
        *slot = value.to_string();
    }
}

/// Check the transfer form and build its payload.
/// `user_name` must be non-blank and `amount` a positive number.
pub fn validate_transfer(form: &TransferForm) -> std::result::Result<TransferPurchase, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let user_name = form.user_name.trim();
    if user_name.is_empty() {
        errors.push("user_name", "Username is required");
    }

    let raw_amount = form.amount.trim();
    let amount = if raw_amount.is_empty() {
        errors.push("amount", "Amount is required");
        None
    } else {
        match Decimal::from_str(raw_amount) {
            Ok(a) if a > Decimal::ZERO => Some(a),
            Ok(_) => {
                errors.push("amount", "Amount must be greater than 0");
                None
            }
            Err(_) => {
                errors.push("amount", "Amount must be a number");
                None
            }
        }
    };

    errors.into_result(()).map(|()| TransferPurchase {
        user_name: user_name.to_string(),
        amount: amount.unwrap_or_default(),
        cgwallet_id: form.cgwallet_id.trim().to_string(),
    })
}

/// Build the wallet-pay payload. No sufficiency check: the server decides.
#[must_use]
pub fn wallet_purchase(bundle: &Bundle, session: &Session) -> WalletPurchase {
    WalletPurchase {
        bundle_id: bundle.id.clone(),
        paywith: session.wallet_balance(),
    }
}

/// A validated request ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseRequest {
    Wallet(WalletPurchase),
    Transfer(TransferPurchase),
}

/// User-visible outcome of an action, rendered by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn is_success(&self) -> bool {
        matches!(self, Notice::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::Error(m) => m,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Success(m) => write!(f, "{m}"),
            Notice::Error(m) => write!(f, "Error: {m}"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PurchaseController {
    selection: Selection,
    tab: PaymentTab,
    form: TransferForm,
    busy: bool,
}

impl PurchaseController {
    pub fn new(session: &Session) -> Self {
        Self {
            form: TransferForm::prefilled(session.user_name()),
            ..Self::default()
        }
    }

    pub fn select(&mut self, bundle: Bundle) {
        self.selection.open(bundle);
    }

    pub fn close(&mut self, reason: CloseReason) {
        self.selection.close(reason);
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn tab(&self) -> PaymentTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: PaymentTab) {
        self.tab = tab;
    }

    pub fn form(&self) -> &TransferForm {
        &self.form
    }

    pub fn set_field(&mut self, field: TransferField, value: &str) {
        self.form.set(field, value);
    }

    /// True while a submission awaits its answer (the submit control is disabled).
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Validate the active tab and produce the request to send.
    /// Validation failures leave the dialog open and the controller idle.
    pub fn begin_submit(&mut self, session: &Session) -> Result<PurchaseRequest> {
        if self.busy {
            return Err(DashboardError::InvalidState(
                "A purchase is already in progress.".into(),
            ));
        }
        let bundle = self.selection.bundle().ok_or_else(|| {
            DashboardError::InvalidState(
                "No bundle selected. Use 'buy <id>' to pick one first.".into(),
            )
        })?;

        let request = match self.tab {
            PaymentTab::Wallet => PurchaseRequest::Wallet(wallet_purchase(bundle, session)),
            PaymentTab::Transfer => PurchaseRequest::Transfer(validate_transfer(&self.form)?),
        };
        self.busy = true;
        Ok(request)
    }

    /// Apply the server's answer. Both outcomes close the dialog; the form
    /// keeps its values.
    pub fn complete(&mut self, result: Result<PurchaseReceipt>) -> Notice {
        self.busy = false;
        self.selection.close(CloseReason::Submitted);
        match result {
            Ok(receipt) => {
                let message = receipt
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string());
                info!(tab = %self.tab, "purchase accepted");
                Notice::Success(message)
            }
            Err(e) => Notice::Error(e.to_string()),
        }
    }
}
