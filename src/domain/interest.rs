use rust_decimal::Decimal;

use super::{AccountType, Amount};

const MONTHS_PER_YEAR: i64 = 12;

impl AccountType {
    /// Annual interest rate for the account type: 5% savings, 1% checking, nothing otherwise.
    pub fn annual_rate(&self) -> Decimal {
        match self {
            AccountType::Savings => Decimal::new(5, 2),
            AccountType::Checking => Decimal::new(1, 2),
            AccountType::Other(_) => Decimal::ZERO,
        }
    }
}

/// Interest earned in one month: `balance * annual_rate / 12`.
pub fn monthly_interest(account_type: &AccountType, balance: Amount) -> Amount {
    balance * account_type.annual_rate() / Decimal::from(MONTHS_PER_YEAR)
}
