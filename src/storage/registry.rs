use std::sync::Arc;

use anyhow::{Result, anyhow};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::{Mutex, MutexGuard};

use crate::domain::{
    Account, AccountNumber, AccountType, Amount, checked_credit, checked_debit,
    generate_account_number,
};

/// Canonical record for one account. Identity fields are immutable; the
/// balance is only reachable through [`AccountRecord::lock`].
#[derive(Debug)]
pub struct AccountRecord {
    account_number: AccountNumber,
    owner_name: String,
    account_type: AccountType,
    balance: Mutex<Amount>,
}

impl AccountRecord {
    fn new(account_number: AccountNumber, owner_name: String, account_type: AccountType) -> Self {
        Self {
            account_number,
            owner_name,
            account_type,
            balance: Mutex::new(Amount::ZERO),
        }
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub fn account_type(&self) -> &AccountType {
        &self.account_type
    }

    /// Acquire exclusive access to the balance. The lock is released when the
    /// guard is dropped, including on early returns and `?` propagation.
    pub fn lock(&self) -> BalanceGuard<'_> {
        BalanceGuard {
            record: self,
            balance: self.balance.lock(),
        }
    }

    /// Copy the current state out of the record.
    pub fn snapshot(&self) -> Account {
        self.lock().snapshot()
    }
}

/// Scoped access to one account's balance: a critical section.
pub struct BalanceGuard<'a> {
    record: &'a AccountRecord,
    balance: MutexGuard<'a, Amount>,
}

impl BalanceGuard<'_> {
    pub fn account_number(&self) -> &str {
        &self.record.account_number
    }

    pub fn account_type(&self) -> &AccountType {
        &self.record.account_type
    }

    pub fn balance(&self) -> Amount {
        *self.balance
    }

    /// Increase the balance, failing if the result is not representable.
    pub fn credit(&mut self, amount: Amount) -> Result<Amount> {
        let updated = checked_credit(*self.balance, amount).ok_or_else(|| {
            anyhow!(
                "balance overflow crediting {} to account {}",
                amount,
                self.record.account_number
            )
        })?;
        *self.balance = updated;
        Ok(updated)
    }

    /// Decrease the balance. Callers check funds first; this refuses to go
    /// below zero regardless.
    pub fn debit(&mut self, amount: Amount) -> Result<Amount> {
        let updated = checked_debit(*self.balance, amount).ok_or_else(|| {
            anyhow!(
                "debit of {} would overdraw account {}",
                amount,
                self.record.account_number
            )
        })?;
        *self.balance = updated;
        Ok(updated)
    }

    pub fn snapshot(&self) -> Account {
        Account {
            account_number: self.record.account_number.clone(),
            owner_name: self.record.owner_name.clone(),
            account_type: self.record.account_type.clone(),
            balance: *self.balance,
        }
    }
}

/// Concurrent store of accounts keyed by account number.
/// Entries are never removed.
#[derive(Debug, Default)]
pub struct AccountRegistry {
    accounts: DashMap<AccountNumber, Arc<AccountRecord>>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new account with a zero balance under a freshly generated number.
    pub fn create(&self, owner_name: String, account_type: AccountType) -> Arc<AccountRecord> {
        loop {
            match self.accounts.entry(generate_account_number()) {
                Entry::Vacant(slot) => {
                    let record = Arc::new(AccountRecord::new(
                        slot.key().clone(),
                        owner_name,
                        account_type,
                    ));
                    slot.insert(Arc::clone(&record));
                    return record;
                }
                // Number already issued; draw another.
                Entry::Occupied(_) => continue,
            }
        }
    }

    /// Look up an account by number.
    pub fn get(&self, account_number: &str) -> Option<Arc<AccountRecord>> {
        self.accounts
            .get(account_number)
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
