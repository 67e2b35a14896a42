use std::fmt;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// 1 USD = 100 cents, so $50.00 = 5000 cents.
///
/// The simulated accounts hold balances in the hundreds of quadrillions of dollars,
/// which overflow an `i64` once expressed in cents, so this is an `i128`.
pub type Cents = i128;

/// Format cents as a plain decimal string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Format cents as a US dollar amount with thousands separators.
/// Example: 123456789 -> "$1,234,567.89", -100 -> "-$1.00"
pub fn format_usd(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let units = (abs_cents / 100).to_string();
    let remainder = abs_cents % 100;

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}${}.{:02}", sign, grouped, remainder)
}

/// Parse a decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000, "1e3" -> 100000
///
/// Exponent notation is accepted because JSON clients emit it for large floats.
/// The result is exact: digits that would land below one cent must be zero.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, body) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(at) => (&body[..at], parse_exponent(&body[at + 1..])?),
        None => (body, 0),
    };

    let (units, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if units.is_empty() && fraction.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    if !is_digits(units) || !is_digits(fraction) {
        return Err(ParseCentsError::InvalidFormat);
    }

    // value = digits * 10^(exponent - fraction.len()), so cents shift by two more
    let digits = format!("{}{}", units, fraction);
    let digits = digits.trim_start_matches('0');
    let shift = exponent + 2 - fraction.len() as i64;

    let cents = if digits.is_empty() {
        0
    } else if shift >= 0 {
        let scale = u32::try_from(shift)
            .ok()
            .and_then(|s| (10 as Cents).checked_pow(s))
            .ok_or(ParseCentsError::Overflow)?;
        parse_digits(digits)?
            .checked_mul(scale)
            .ok_or(ParseCentsError::Overflow)?
    } else {
        let cut = usize::try_from(-shift).map_err(|_| ParseCentsError::SubCent)?;
        let keep = digits.len().saturating_sub(cut);
        let (whole, dropped) = digits.split_at(keep);
        if dropped.bytes().any(|b| b != b'0') {
            return Err(ParseCentsError::SubCent);
        }
        if whole.is_empty() { 0 } else { parse_digits(whole)? }
    };

    Ok(if negative { -cents } else { cents })
}

fn is_digits(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}

fn parse_digits(digits: &str) -> Result<Cents, ParseCentsError> {
    if digits.is_empty() || !is_digits(digits) {
        return Err(ParseCentsError::InvalidFormat);
    }
    digits.parse().map_err(|_| ParseCentsError::Overflow)
}

fn parse_exponent(text: &str) -> Result<i64, ParseCentsError> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !is_digits(digits) {
        return Err(ParseCentsError::InvalidFormat);
    }
    // Anything wider than an i32 exponent is out of range for cents anyway
    let magnitude: i32 = digits.parse().map_err(|_| ParseCentsError::Overflow)?;
    Ok(if text.starts_with('-') {
        -i64::from(magnitude)
    } else {
        i64::from(magnitude)
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    Overflow,
    /// The amount has a non-zero digit beyond the second decimal place
    SubCent,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::Overflow => write!(f, "amount out of range"),
            ParseCentsError::SubCent => write!(f, "more than two decimal places"),
        }
    }
}

impl std::error::Error for ParseCentsError {}
