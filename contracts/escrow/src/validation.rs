use shared::errors::Error;
use shared::types::Amount;

/// Amounts moved through escrow must be positive
pub fn validate_amount(amount: Amount) -> Result<(), Error> {
    if amount <= 0 {
        Err(Error::ZeroAmount)
    } else {
        Ok(())
    }
}

/// Check that `amount` can be taken out of `balance`
pub fn validate_available(balance: Amount, amount: Amount, shortfall: Error) -> Result<(), Error> {
    if amount > balance {
        Err(shortfall)
    } else {
        Ok(())
    }
}
