use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

use super::{Cents, ParseCentsError, parse_cents};

/// A simulated transfer request as it arrives from a client.
///
/// Fields are kept as raw JSON so that a missing key, `null`, `""` and `0`
/// can all be rejected the same way. A zero amount is missing whether it is
/// sent as a number or as a string such as `"0.00"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    #[serde(default)]
    pub source_hash: Value,
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub target_account: Value,
}

impl TransferRequest {
    pub fn new(source_hash: &str, amount: impl Into<Value>, target_account: &str) -> Self {
        Self {
            source_hash: Value::from(source_hash),
            amount: amount.into(),
            target_account: Value::from(target_account),
        }
    }
}

/// A transfer request whose fields have all been checked for presence and shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub source_hash: String,
    pub amount_cents: Cents,
    pub target_account: String,
}

/// Why a [`TransferRequest`] could not be turned into a [`Transfer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferValidationError {
    MissingFields,
    InvalidAmount(String),
}

impl TryFrom<&TransferRequest> for Transfer {
    type Error = TransferValidationError;

    fn try_from(request: &TransferRequest) -> Result<Self, Self::Error> {
        if !is_present(&request.source_hash)
            || !is_present(&request.amount)
            || is_zero_text(&request.amount)
            || !is_present(&request.target_account)
        {
            return Err(TransferValidationError::MissingFields);
        }

        let amount_cents = match amount_to_cents(&request.amount) {
            Ok(cents) => cents,
            // Too large for any balance; let the funds check reject it
            Err(AmountError::Unparseable {
                text,
                reason: ParseCentsError::Overflow,
            }) if !text.trim_start().starts_with('-') => Cents::MAX,
            Err(e) => return Err(TransferValidationError::InvalidAmount(e.to_string())),
        };
        if amount_cents <= 0 {
            return Err(TransferValidationError::InvalidAmount(
                "Amount must be positive".to_string(),
            ));
        }

        Ok(Self {
            source_hash: field_text(&request.source_hash),
            amount_cents,
            target_account: field_text(&request.target_account),
        })
    }
}

/// Outcome of a successful simulated transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    pub success: bool,
    pub message: String,
    pub transaction_id: String,
    pub new_source_balance: String,
    pub timestamp: String,
}

impl TransferReceipt {
    pub fn new(new_source_balance: String, now: DateTime<Utc>) -> Self {
        Self {
            success: true,
            message: "Simulated transfer successful.".to_string(),
            transaction_id: generate_transaction_id(now),
            new_source_balance,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Build a `SIM-TXN-<millis>-<9 base36 chars>` label.
/// Collisions are improbable, not impossible.
pub fn generate_transaction_id(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("SIM-TXN-{}-{}", now.timestamp_millis(), suffix)
}

/// Whether a JSON field counts as supplied. Absent, null, false, empty strings and zero do not.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A string amount that parses to exactly zero, e.g. `"0"` or `"0.00"`.
fn is_zero_text(value: &Value) -> bool {
    matches!(value, Value::String(s) if parse_cents(s) == Ok(0))
}

/// Why a JSON amount could not be converted to cents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    NotANumber(String),
    Unparseable {
        text: String,
        reason: ParseCentsError,
    },
}

impl fmt::Display for AmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::NotANumber(got) => write!(f, "Amount must be a number, got {}", got),
            AmountError::Unparseable { text, reason } => {
                write!(f, "Invalid amount '{}': {}", text, reason)
            }
        }
    }
}

impl std::error::Error for AmountError {}

/// Convert a JSON number or numeric string into exact cents.
///
/// Floats are read back from their shortest decimal form, so `1e16` and
/// `10000000000000000.0` both mean ten quadrillion dollars.
pub fn amount_to_cents(value: &Value) -> Result<Cents, AmountError> {
    let text = match value {
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        other => return Err(AmountError::NotANumber(other.to_string())),
    };
    parse_cents(&text).map_err(|reason| AmountError::Unparseable { text, reason })
}

/// Plain decimal text of a JSON number. `f64`'s `Display` never uses exponent form.
fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string())
    }
}

/// Text of a string field, or the JSON rendering of anything else.
pub fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields() {
        let cases = [
            json!({"amount": 10, "targetAccount": "t"}),
            json!({"sourceHash": "", "amount": 10, "targetAccount": "t"}),
            json!({"sourceHash": "s", "amount": 0, "targetAccount": "t"}),
            json!({"sourceHash": "s", "amount": null, "targetAccount": "t"}),
            json!({"sourceHash": "s", "amount": "0", "targetAccount": "t"}),
            json!({"sourceHash": "s", "amount": "0.00", "targetAccount": "t"}),
            json!({"sourceHash": "s", "amount": 10}),
        ];
        for case in cases {
            let request: TransferRequest = serde_json::from_value(case.clone()).unwrap();
            assert_eq!(
                Transfer::try_from(&request),
                Err(TransferValidationError::MissingFields),
                "case {}",
                case
            );
        }
    }

    #[test]
    fn test_amount_forms() {
        let request = TransferRequest::new("s", 100, "t");
        assert_eq!(Transfer::try_from(&request).unwrap().amount_cents, 10000);

        let request = TransferRequest::new("s", 12.5, "t");
        assert_eq!(Transfer::try_from(&request).unwrap().amount_cents, 1250);

        let request = TransferRequest::new("s", "7.25", "t");
        assert_eq!(Transfer::try_from(&request).unwrap().amount_cents, 725);

        let request = TransferRequest::new("s", 1e16, "t");
        assert_eq!(
            Transfer::try_from(&request).unwrap().amount_cents,
            1_000_000_000_000_000_000
        );

        let request = TransferRequest::new("s", "2.5e1", "t");
        assert_eq!(Transfer::try_from(&request).unwrap().amount_cents, 2_500);
    }

    #[test]
    fn test_oversized_amount_saturates() {
        let request = TransferRequest::new("s", 1e300, "t");
        assert_eq!(Transfer::try_from(&request).unwrap().amount_cents, Cents::MAX);

        let request = TransferRequest::new("s", "-1e300", "t");
        assert!(matches!(
            Transfer::try_from(&request),
            Err(TransferValidationError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_target_account_zero_string_is_present() {
        let request = TransferRequest::new("s", 1, "0");
        assert_eq!(Transfer::try_from(&request).unwrap().target_account, "0");
    }

    #[test]
    fn test_amount_to_cents_reads_float_text() {
        assert_eq!(amount_to_cents(&json!(10.0)), Ok(1_000));
        assert_eq!(amount_to_cents(&json!(1e20)), Ok(10_000_000_000_000_000_000_000));
        assert_eq!(
            amount_to_cents(&json!(10.999)),
            Err(AmountError::Unparseable {
                text: "10.999".to_string(),
                reason: ParseCentsError::SubCent,
            })
        );
        assert_eq!(
            amount_to_cents(&json!(true)),
            Err(AmountError::NotANumber("true".to_string()))
        );
    }

    #[test]
    fn test_invalid_amounts() {
        for amount in [
            json!(-5),
            json!("ten"),
            json!([1]),
            json!(true),
            json!(10.999),
            json!("0.001"),
        ] {
            let request = TransferRequest::new("s", amount.clone(), "t");
            assert!(
                matches!(
                    Transfer::try_from(&request),
                    Err(TransferValidationError::InvalidAmount(_))
                ),
                "amount {}",
                amount
            );
        }
    }

    #[test]
    fn test_transaction_id_shape() {
        let now = Utc::now();
        let id = generate_transaction_id(now);
        let prefix = format!("SIM-TXN-{}-", now.timestamp_millis());
        assert!(id.starts_with(&prefix));
        let suffix = &id[prefix.len()..];
        assert_eq!(suffix.len(), 9);
        assert!(suffix.bytes().all(|b| BASE36.contains(&b)));
    }

    #[test]
    fn test_receipt_timestamp_is_iso8601() {
        let now = DateTime::parse_from_rfc3339("2024-01-15T10:20:30.123Z")
            .unwrap()
            .with_timezone(&Utc);
        let receipt = TransferReceipt::new("$1.00".into(), now);
        assert_eq!(receipt.timestamp, "2024-01-15T10:20:30.123Z");
        assert!(receipt.success);
    }
}
