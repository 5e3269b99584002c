use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Amount;

/// Opaque identifier assigned when an account is opened.
pub type AccountNumber = String;

/// Prefix shared by every generated account number.
pub const ACCOUNT_NUMBER_PREFIX: &str = "AC";

/// Generate a fresh account number. Uniqueness is enforced by the registry on insert.
pub fn generate_account_number() -> AccountNumber {
    format!("{}{}", ACCOUNT_NUMBER_PREFIX, Uuid::new_v4())
}

/// Account type tag. Unrecognized tags are kept verbatim so they round-trip
/// through the API unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountType {
    Savings,
    Checking,
    Other(String),
}

impl AccountType {
    pub fn as_str(&self) -> &str {
        match self {
            AccountType::Savings => "SAVINGS",
            AccountType::Checking => "CHECKING",
            AccountType::Other(tag) => tag,
        }
    }

    /// Parse a type tag. Matching is case-sensitive; anything unknown becomes `Other`.
    pub fn parse(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<String> for AccountType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "SAVINGS" => AccountType::Savings,
            "CHECKING" => AccountType::Checking,
            _ => AccountType::Other(tag),
        }
    }
}

impl From<AccountType> for String {
    fn from(account_type: AccountType) -> Self {
        match account_type {
            AccountType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Point-in-time view of an account. The canonical record lives in the
/// registry; this is what gets handed to callers and serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_number: AccountNumber,
    pub owner_name: String,
    pub account_type: AccountType,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Amount,
}
