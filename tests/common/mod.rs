// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::Arc;

use bankledger::api::Dispatcher;
use bankledger::application::LedgerService;
use bankledger::domain::{Account, AccountType};
use bankledger::storage::AccountRegistry;
use rust_decimal::Decimal;

/// Helper to create a service over a fresh, isolated registry
pub fn test_service() -> LedgerService {
    LedgerService::new(AccountRegistry::new())
}

/// Helper to create a dispatcher over a fresh, isolated registry
pub fn test_dispatcher() -> Dispatcher {
    Dispatcher::new(Arc::new(test_service()))
}

/// Shorthand for whole-unit amounts
pub fn dec(units: i64) -> Decimal {
    Decimal::from(units)
}

/// Assert two amounts agree to within 0.0001
pub fn assert_close(actual: Decimal, expected: Decimal) {
    let tolerance = Decimal::new(1, 4);
    assert!(
        (actual - expected).abs() < tolerance,
        "expected {expected}, got {actual}"
    );
}

/// Test fixture: standard account setup
pub struct StandardAccounts {
    pub savings: Account,
    pub checking: Account,
}

impl StandardAccounts {
    /// Open a savings and a checking account, both empty
    pub fn open(service: &LedgerService) -> Self {
        Self {
            savings: service.open_account("Nguyen Van A".into(), AccountType::Savings),
            checking: service.open_account("Tran Thi B".into(), AccountType::Checking),
        }
    }

    /// Open both accounts and fund savings
    pub fn open_funded(service: &LedgerService, savings_balance: i64) -> anyhow::Result<Self> {
        let accounts = Self::open(service);
        service.deposit(&accounts.savings.account_number, dec(savings_balance))?;
        Ok(accounts)
    }
}

pub fn balance_of(service: &LedgerService, account_number: &str) -> Decimal {
    service
        .get_account(account_number)
        .expect("account should exist")
        .balance
}
