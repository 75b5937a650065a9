use thiserror::Error;

/// Amounts are plain decimal numbers in the implicit trip currency.
/// Storage is never rounded; only display rounds to two decimals.
pub type Amount = f64;

/// Smallest amount worth settling (one cent of a two-decimal currency).
pub const SETTLEMENT_EPSILON: Amount = 0.01;

/// Format an amount with two decimals.
/// Example: 20.0 -> "20.00", -3.333 -> "-3.33"
pub fn format_amount(amount: Amount) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    // Avoid printing "-0.00" for tiny negative remainders
    if rounded == 0.0 {
        return "0.00".to_string();
    }
    format!("{:.2}", rounded)
}

/// Format an amount prefixed by a currency symbol.
/// Example: ("₹", -12.5) -> "-₹12.50"
pub fn format_money(symbol: &str, amount: Amount) -> String {
    let formatted = format_amount(amount);
    match formatted.strip_prefix('-') {
        Some(abs) => format!("-{}{}", symbol, abs),
        None => format!("{}{}", symbol, formatted),
    }
}

/// Parse a decimal string into an amount.
/// Example: "50.00" -> 50.0, "12.5" -> 12.5, ".5" -> 0.5
///
/// Only the number format is checked here; positivity is a ledger rule.
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    let amount: Amount = input
        .parse()
        .map_err(|_| ParseAmountError::InvalidFormat(input.to_string()))?;

    if !amount.is_finite() {
        return Err(ParseAmountError::NotFinite(input.to_string()));
    }
    Ok(amount)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAmountError {
    #[error("amount is empty")]
    Empty,

    #[error("invalid money format: {0}")]
    InvalidFormat(String),

    #[error("amount is not a finite number: {0}")]
    NotFinite(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(50.0), "50.00");
        assert_eq!(format_amount(12.346), "12.35");
        assert_eq!(format_amount(1.0), "1.00");
        assert_eq!(format_amount(0.01), "0.01");
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(-50.0), "-50.00");
        assert_eq!(format_amount(-0.001), "0.00");
        assert_eq!(format_amount(10.0 / 3.0), "3.33");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money("₹", 20.0), "₹20.00");
        assert_eq!(format_money("$", -12.5), "-$12.50");
        assert_eq!(format_money("€", -0.0001), "€0.00");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("50.00"), Ok(50.0));
        assert_eq!(parse_amount("50"), Ok(50.0));
        assert_eq!(parse_amount(" 12.5 "), Ok(12.5));
        assert_eq!(parse_amount(".5"), Ok(0.5));
        assert_eq!(parse_amount("-3"), Ok(-3.0));
    }

    #[test]
    fn test_parse_amount_invalid() {
        assert_eq!(parse_amount(""), Err(ParseAmountError::Empty));
        assert!(matches!(
            parse_amount("abc"),
            Err(ParseAmountError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_amount("12.34.56"),
            Err(ParseAmountError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_amount("inf"),
            Err(ParseAmountError::NotFinite(_))
        ));
        assert!(matches!(
            parse_amount("NaN"),
            Err(ParseAmountError::NotFinite(_))
        ));
    }
}
