use rust_decimal::Decimal;

/// Money is represented as an exact decimal so that interest and balance
/// arithmetic is reproducible across platforms.
pub type Amount = Decimal;

/// Returns true if the amount can be moved in or out of an account.
pub fn is_positive(amount: Amount) -> bool {
    amount > Decimal::ZERO
}

/// Add `amount` to `balance`, returning `None` if the result is not representable.
pub fn checked_credit(balance: Amount, amount: Amount) -> Option<Amount> {
    balance.checked_add(amount)
}

/// Subtract `amount` from `balance`, returning `None` if the result would go negative.
pub fn checked_debit(balance: Amount, amount: Amount) -> Option<Amount> {
    balance
        .checked_sub(amount)
        .filter(|remaining| *remaining >= Decimal::ZERO)
}
