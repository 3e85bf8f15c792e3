//! Display formatting for money and percentages.

use crate::TransactionType;

pub const CURRENCY_SYMBOL: &str = "¥";

/// `¥1234.50`
pub fn currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-{CURRENCY_SYMBOL}{:.2}", amount.abs())
    } else {
        format!("{CURRENCY_SYMBOL}{amount:.2}")
    }
}

/// Amount prefixed with the sign of its type, e.g. `-¥12.00` for an expense
pub fn signed_amount(transaction_type: TransactionType, amount: f64) -> String {
    format!("{}{CURRENCY_SYMBOL}{:.2}", transaction_type.sign(), amount.abs())
}

/// `42.0%`
pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        assert_eq!(currency(1234.5), "¥1234.50");
        assert_eq!(currency(0.0), "¥0.00");
        assert_eq!(currency(-20.0), "-¥20.00");
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(signed_amount(TransactionType::Income, 10.0), "+¥10.00");
        assert_eq!(signed_amount(TransactionType::Expense, 3.456), "-¥3.46");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(33.333), "33.3%");
    }
}
