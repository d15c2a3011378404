//! Form field parsing shared by the pages

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parse a positive shilling amount. Thousands separators and a leading
/// "KES" are tolerated; anything else yields `invalid`.
pub fn parse_amount(input: &str, invalid: &str) -> Result<Decimal, String> {
    let cleaned: String = input
        .trim()
        .trim_start_matches("KES")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();

    match Decimal::from_str(&cleaned) {
        Ok(amount) if amount > Decimal::ZERO => Ok(amount),
        _ => Err(invalid.to_string()),
    }
}

/// Trimmed text, or an error when nothing was entered.
pub fn required(input: &str, missing: &str) -> Result<String, String> {
    let value = input.trim();
    if value.is_empty() {
        Err(missing.to_string())
    } else {
        Ok(value.to_string())
    }
}

/// Trimmed text, `None` when blank.
pub fn optional(input: &str) -> Option<String> {
    let value = input.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Id picked from a `<select>`; the empty placeholder option maps to `None`.
pub fn selected_id(input: &str) -> Option<i64> {
    input.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_accept_separators_and_currency() {
        assert_eq!(parse_amount("1,500.50", "bad"), Ok(Decimal::new(150050, 2)));
        assert_eq!(parse_amount(" KES 2 000 ", "bad"), Ok(Decimal::from(2000)));
    }

    #[test]
    fn amounts_must_be_positive_numbers() {
        let invalid = "Invalid transfer amount";
        for input in ["", "0", "-5", "ten", "1.2.3"] {
            assert_eq!(parse_amount(input, invalid), Err(invalid.to_string()), "{input}");
        }
    }

    #[test]
    fn blank_text_fields() {
        assert_eq!(
            required("   ", "Please provide a purpose for the transfer"),
            Err("Please provide a purpose for the transfer".to_string())
        );
        assert_eq!(required(" Roads ", "x"), Ok("Roads".to_string()));
        assert_eq!(optional(""), None);
        assert_eq!(optional(" a@b.ke "), Some("a@b.ke".to_string()));
    }

    #[test]
    fn select_placeholders() {
        assert_eq!(selected_id(""), None);
        assert_eq!(selected_id("4"), Some(4));
    }
}
