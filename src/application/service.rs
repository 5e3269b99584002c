use std::sync::Arc;

use tracing::{error, info};

use crate::domain::{Account, AccountType, Amount, is_positive, monthly_interest};
use crate::storage::{AccountRecord, AccountRegistry, BalanceGuard};

use super::{LedgerError, Movement};

/// Application service providing the ledger operations.
/// This is the primary interface for any client (HTTP dispatcher, tests, etc.).
pub struct LedgerService {
    registry: AccountRegistry,
}

/// Result of a transfer: both accounts as they stood right after the move.
#[derive(Debug, Clone)]
pub struct TransferResult {
    pub from: Account,
    pub to: Account,
    pub amount: Amount,
}

/// Result of applying monthly interest.
#[derive(Debug, Clone)]
pub struct InterestResult {
    pub account: Account,
    pub interest: Amount,
}

impl LedgerService {
    /// Create a new ledger service over the given registry.
    pub fn new(registry: AccountRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    // ========================
    // Account operations
    // ========================

    /// Open a new account with a zero balance.
    pub fn open_account(&self, owner_name: String, account_type: AccountType) -> Account {
        let account = self.registry.create(owner_name, account_type).snapshot();
        info!(
            account_number = %account.account_number,
            account_type = %account.account_type,
            "account opened"
        );
        account
    }

    /// Get a snapshot of an account.
    pub fn get_account(&self, account_number: &str) -> Result<Account, LedgerError> {
        Ok(self.resolve(account_number)?.snapshot())
    }

    fn resolve(&self, account_number: &str) -> Result<Arc<AccountRecord>, LedgerError> {
        self.registry
            .get(account_number)
            .ok_or_else(|| LedgerError::AccountNotFound(account_number.to_string()))
    }

    // ========================
    // Balance operations
    // ========================

    /// Add `amount` to the account's balance.
    pub fn deposit(&self, account_number: &str, amount: Amount) -> Result<Account, LedgerError> {
        let record = self.resolve(account_number)?;
        if !is_positive(amount) {
            return Err(LedgerError::InvalidAmount(Movement::Deposit));
        }

        let mut guard = record.lock();
        let balance = guard.credit(amount)?;
        info!(account_number, %amount, %balance, "deposit applied");
        Ok(guard.snapshot())
    }

    /// Remove `amount` from the account's balance if it is covered.
    pub fn withdraw(&self, account_number: &str, amount: Amount) -> Result<Account, LedgerError> {
        let record = self.resolve(account_number)?;
        if !is_positive(amount) {
            return Err(LedgerError::InvalidAmount(Movement::Withdrawal));
        }

        let mut guard = record.lock();
        let balance = withdraw_locked(&mut guard, amount)?;
        info!(account_number, %amount, %balance, "withdrawal applied");
        Ok(guard.snapshot())
    }

    /// Move `amount` from one account to another.
    ///
    /// This is a two-phase protocol, not an all-or-nothing transaction: the
    /// withdraw leg runs first and is kept even if the deposit leg then fails.
    /// Both legs are validated up front, so under normal execution either both
    /// complete or neither does; the only deposit-leg failure left is a
    /// balance overflow, reported as [`LedgerError::Unexpected`].
    ///
    /// Both accounts stay locked for the duration, acquired in ascending
    /// account-number order so opposite-direction transfers cannot deadlock.
    pub fn transfer(
        &self,
        from_account_number: &str,
        to_account_number: &str,
        amount: Amount,
    ) -> Result<TransferResult, LedgerError> {
        if from_account_number == to_account_number {
            return Err(LedgerError::SameAccount(from_account_number.to_string()));
        }

        let from = self.resolve(from_account_number)?;
        let to = self.resolve(to_account_number)?;
        if !is_positive(amount) {
            return Err(LedgerError::InvalidAmount(Movement::Transfer));
        }

        let (mut from_guard, mut to_guard) = lock_in_order(&from, &to);

        withdraw_locked(&mut from_guard, amount)?;
        if let Err(err) = to_guard.credit(amount) {
            error!(
                from = from_account_number,
                to = to_account_number,
                %amount,
                "deposit leg failed after withdrawal; funds not credited"
            );
            return Err(err.into());
        }

        info!(
            from = from_account_number,
            to = to_account_number,
            %amount,
            "transfer completed"
        );

        Ok(TransferResult {
            from: from_guard.snapshot(),
            to: to_guard.snapshot(),
            amount,
        })
    }

    /// Credit one month of interest according to the account type.
    /// The balance is read and updated inside a single critical section.
    pub fn apply_monthly_interest(
        &self,
        account_number: &str,
    ) -> Result<InterestResult, LedgerError> {
        let record = self.resolve(account_number)?;

        let mut guard = record.lock();
        let interest = monthly_interest(guard.account_type(), guard.balance());
        let balance = guard.credit(interest)?;
        info!(account_number, %interest, %balance, "monthly interest applied");

        Ok(InterestResult {
            account: guard.snapshot(),
            interest,
        })
    }
}

/// Check-then-debit under a held lock.
fn withdraw_locked(guard: &mut BalanceGuard<'_>, amount: Amount) -> Result<Amount, LedgerError> {
    let balance = guard.balance();
    if balance < amount {
        return Err(LedgerError::InsufficientFunds {
            account_number: guard.account_number().to_string(),
            balance,
            requested: amount,
        });
    }
    Ok(guard.debit(amount)?)
}

/// Lock two distinct accounts, lower account number first. Guards are
/// returned in argument order.
fn lock_in_order<'a>(
    first: &'a AccountRecord,
    second: &'a AccountRecord,
) -> (BalanceGuard<'a>, BalanceGuard<'a>) {
    if first.account_number() < second.account_number() {
        let first_guard = first.lock();
        let second_guard = second.lock();
        (first_guard, second_guard)
    } else {
        let second_guard = second.lock();
        let first_guard = first.lock();
        (first_guard, second_guard)
    }
}
