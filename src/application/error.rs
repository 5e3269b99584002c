use thiserror::Error;

use crate::domain::{AccountNumber, Amount};

/// Kind of balance movement an amount was supplied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Deposit,
    Withdrawal,
    Transfer,
}

impl std::fmt::Display for Movement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Movement::Deposit => "Deposit",
            Movement::Withdrawal => "Withdrawal",
            Movement::Transfer => "Transfer",
        };
        write!(f, "{}", label)
    }
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{0} amount must be greater than 0")]
    InvalidAmount(Movement),

    #[error("Insufficient funds")]
    InsufficientFunds {
        account_number: AccountNumber,
        balance: Amount,
        requested: Amount,
    },

    #[error("Cannot transfer to the same account")]
    SameAccount(AccountNumber),

    #[error("Account does not exist")]
    AccountNotFound(AccountNumber),

    #[error("Unexpected ledger failure: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl LedgerError {
    /// True for failures caused by the request itself rather than by the ledger.
    pub fn is_validation(&self) -> bool {
        !matches!(self, LedgerError::Unexpected(_))
    }
}
