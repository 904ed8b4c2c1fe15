//! Currency formatting and unformatting.

use serde::{Deserialize, Serialize};

/// How currency values are displayed.
///
/// `format` is a template where `%s` is the symbol and `%v` the number.
/// Negative values use the same template with `-` placed before `%v`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub format: String,
    pub decimal: String,
    pub thousand: String,
    pub precision: usize,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            format: "%s%v".to_string(),
            decimal: ".".to_string(),
            thousand: ",".to_string(),
            precision: 2,
        }
    }
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}

/// Format a non-negative number with grouping and fixed precision.
pub fn format_number(value: f64, precision: usize, thousand: &str, decimal: &str) -> String {
    let fixed = format!("{:.*}", precision, value.abs());
    let (whole, fraction) = match fixed.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (fixed.as_str(), None),
    };
    let mut out = group_thousands(whole, thousand);
    if let Some(fraction) = fraction {
        out.push_str(decimal);
        out.push_str(fraction);
    }
    out
}

/// Format `value` as money.
pub fn format_money(value: f64, fmt: &CurrencyFormat) -> String {
    let template = if value < 0.0 {
        fmt.format.replace('-', "").replace("%v", "-%v")
    } else {
        fmt.format.clone()
    };
    let number = format_number(value, fmt.precision, &fmt.thousand, &fmt.decimal);
    template.replace("%s", &fmt.symbol).replace("%v", &number)
}

/// Strip currency formatting and parse the remaining number.
///
/// Keeps digits, a minus sign and the decimal mark; a value wrapped in
/// parentheses is negative. Returns `None` when no number remains.
pub fn unformat(raw: &str, decimal: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let decimal = decimal.chars().next().unwrap_or('.');

    let negative_parens = trimmed
        .find('(')
        .zip(trimmed.rfind(')'))
        .is_some_and(|(open, close)| {
            open < close
                && trimmed[open + 1..]
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_digit())
        });

    let mut cleaned: String = trimmed
        .chars()
        .filter(|&c| c.is_ascii_digit() || c == '-' || c == decimal)
        .map(|c| if c == decimal { '.' } else { c })
        .collect();
    if negative_parens && !cleaned.starts_with('-') {
        cleaned.insert(0, '-');
    }

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_grouping_and_precision() {
        let fmt = CurrencyFormat::default();
        assert_eq!(format_money(1234567.891, &fmt), "$1,234,567.89");
        assert_eq!(format_money(0.0, &fmt), "$0.00");
        assert_eq!(format_money(12.0, &fmt), "$12.00");
    }

    #[test]
    fn negative_values_put_minus_before_number() {
        let fmt = CurrencyFormat::default();
        assert_eq!(format_money(-5.5, &fmt), "$-5.50");
    }

    #[test]
    fn honors_custom_template_and_separators() {
        let fmt = CurrencyFormat {
            symbol: "€".to_string(),
            format: "%v %s".to_string(),
            decimal: ",".to_string(),
            thousand: ".".to_string(),
            precision: 2,
        };
        assert_eq!(format_money(9876.5, &fmt), "9.876,50 €");
    }

    #[test]
    fn zero_precision_has_no_decimal_mark() {
        assert_eq!(format_number(1500.4, 0, ",", "."), "1,500");
    }

    #[test]
    fn unformat_strips_symbols_and_grouping() {
        assert_eq!(unformat("$1,234.50", "."), Some(1234.5));
        assert_eq!(unformat("-$5", "."), Some(-5.0));
        assert_eq!(unformat("  42 ", "."), Some(42.0));
    }

    #[test]
    fn unformat_treats_parentheses_as_negative() {
        assert_eq!(unformat("(12.00)", "."), Some(-12.0));
    }

    #[test]
    fn unformat_honors_custom_decimal_mark() {
        assert_eq!(unformat("9.876,50 €", ","), Some(9876.5));
    }

    #[test]
    fn unformat_rejects_text_without_digits() {
        assert_eq!(unformat("n/a", "."), None);
        assert_eq!(unformat("", "."), None);
    }

    #[test]
    fn format_then_unformat_round_trips_within_precision() {
        let fmt = CurrencyFormat::default();
        for value in [0.0, 1.25, -1999.99, 1_000_000.1] {
            let back = unformat(&format_money(value, &fmt), &fmt.decimal).unwrap();
            assert!((back - value).abs() < 0.005, "{} -> {}", value, back);
        }
    }
}
