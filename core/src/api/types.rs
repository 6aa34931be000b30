use std::fmt;

use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// A purchasable catalog item. Immutable snapshot from the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub value: String,
    #[serde(default)]
    pub network: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub price: Decimal,
}

/// The authenticated user as reported by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_name: String,
    /// Wallet balance. Only the server mutates it.
    #[serde(rename = "account_details", default)]
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Outcome of a purchase mutation. The server owns the result; the client
/// only relays its message.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseReceipt {
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: Zeroizing<String>,
    pub user: UserProfile,
    pub message: Option<String>,
}

// -- Request bodies --

#[derive(Debug, Clone, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub user_name: &'a str,
    pub password: &'a str,
}

/// Payload for buying with the stored wallet balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletPurchase {
    pub bundle_id: String,
    pub paywith: Decimal,
}

/// Payload for buying by transfer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferPurchase {
    pub user_name: String,
    pub amount: Decimal,
    pub cgwallet_id: String,
}

// -- Envelope --

/// `{ success, message?, data? }` wrapper used by every endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(deserialize_with = "success_flag")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

/// Error body for non-2xx responses: `{ error: { message } }` or `{ message }`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<ErrorDetail>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error
            .and_then(|e| e.message)
            .or(self.message)
            .filter(|m| !m.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BundlesData {
    #[serde(default)]
    pub bundles: Vec<Bundle>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserData {
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginData {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransactionsData {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

// -- Lenient field decoding --

/// Accept `"42"`, `42` or `42.5` and keep the textual form.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumber;

    impl Visitor<'_> for StringOrNumber {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}

/// `success` arrives as `1`, `true` or `"1"` depending on the endpoint.
fn success_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct Flag;

    impl Visitor<'_> for Flag {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("0, 1, a boolean, or a numeric string")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            Ok(v == 1)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            Ok(v == 1)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            Ok(v.trim() == "1" || v.trim().eq_ignore_ascii_case("true"))
        }
    }

    deserializer.deserialize_any(Flag)
}
