//! Extraction of brewing statistics from the formatted strings a model
//! returns ("1.050", "12", "5.5%").
//!
//! Only a leading number is read; trailing unit text is ignored. Anything
//! that does not start with a number, or that is negative, yields `None`.

use std::sync::LazyLock;

use regex::Regex;

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+(?:[.,]\d*)?|[.,]\d+))").expect("valid regex")
});

fn leading_number(text: &str) -> Option<f64> {
    let captures = LEADING_NUMBER.captures(text)?;
    let value: f64 = captures[1].replace(',', ".").parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Parse a specific gravity such as `"1.050"` or `"1.050 SG"`.
#[must_use]
pub fn parse_gravity(text: &str) -> Option<f64> {
    leading_number(text)
}

/// Parse an integer statistic (EBC, IBU) such as `"12"` or `"35 IBU"`.
///
/// Fractional parts are truncated.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_integer(text: &str) -> Option<u32> {
    // `leading_number` never yields a negative value; the upper bound is checked here.
    let value = leading_number(text)?.trunc();
    (value <= f64::from(u32::MAX)).then_some(value as u32)
}

/// Parse a percentage such as `"5.5%"` or `"5.5 % alc./vol."`.
#[must_use]
pub fn parse_percentage(text: &str) -> Option<f64> {
    leading_number(text)
}
