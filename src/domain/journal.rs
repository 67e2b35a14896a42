use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub type JournalEntryId = Uuid;

/// A hash-verified transfer as submitted to the journal endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalRequest {
    #[serde(default)]
    pub account: Value,
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub hash: Option<String>,
}

/// A transfer recorded in the journal. Entries are append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: JournalEntryId,
    pub account: String,
    /// Amount in cents, exactly as requested (sign is not checked)
    pub amount_cents: i64,
    /// Hex SHA-256 of the canonical payload the client signed
    pub digest: String,
    pub recorded_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn new(account: String, amount_cents: i64, digest: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            account,
            amount_cents,
            digest,
            recorded_at: Utc::now(),
        }
    }
}

/// Canonical text of a journal payload: compact JSON with `account` before `amount`.
///
/// Numbers are written the way a JavaScript client's `JSON.stringify` writes them,
/// so `10.0` signs as `10` and `1e21` as `1e+21`.
pub fn canonical_payload(account: &Value, amount: &Value) -> String {
    format!(
        "{{\"account\":{},\"amount\":{}}}",
        canonical_json(account),
        canonical_json(amount),
    )
}

fn canonical_json(value: &Value) -> String {
    match value {
        Value::Number(n) => js_number(n),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let fields: Vec<String> = map
                .iter()
                .map(|(key, value)| {
                    let key = Value::from(key.as_str());
                    format!("{}:{}", canonical_json(&key), canonical_json(value))
                })
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        other => serde_json::to_string(other).unwrap_or_else(|_| "null".to_string()),
    }
}

/// JavaScript `Number#toString` of a JSON number.
fn js_number(n: &Number) -> String {
    const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;
    if let Some(u) = n.as_u64().filter(|u| *u <= MAX_SAFE_INTEGER) {
        return u.to_string();
    }
    if let Some(i) = n.as_i64().filter(|i| i.unsigned_abs() <= MAX_SAFE_INTEGER) {
        return i.to_string();
    }
    match n.as_f64() {
        Some(f) => js_float(f),
        None => n.to_string(),
    }
}

fn js_float(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let sign = if f < 0.0 { "-" } else { "" };

    // `{:e}` yields the shortest round-tripping digits, e.g. "1.2345e-7"
    let sci = format!("{:e}", f.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let k = digits.len() as i32;
    let n = exponent + 1;
    let body = if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (whole, frac) = digits.split_at(n as usize);
        format!("{}.{}", whole, frac)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let e = n - 1;
        let e_sign = if e < 0 { "-" } else { "+" };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, e_sign, e.abs())
        } else {
            format!("{}.{}e{}{}", first, rest, e_sign, e.abs())
        }
    };

    format!("{}{}", sign, body)
}

/// Lower-case hex SHA-256 of the canonical payload.
pub fn payload_digest(account: &Value, amount: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_payload(account, amount).as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_payload_is_compact_and_ordered() {
        assert_eq!(
            canonical_payload(&json!("ACC-1"), &json!(250)),
            r#"{"account":"ACC-1","amount":250}"#
        );
        assert_eq!(
            canonical_payload(&json!("ACC-1"), &json!("2.50")),
            r#"{"account":"ACC-1","amount":"2.50"}"#
        );
    }

    #[test]
    fn test_canonical_numbers_match_javascript() {
        let amount = |raw: &str| -> Value { serde_json::from_str(raw).unwrap() };
        let cases = [
            ("10.0", "10"),
            ("1e2", "100"),
            ("12.50", "12.5"),
            ("-0.0", "0"),
            ("-3.25", "-3.25"),
            ("0.000001", "0.000001"),
            ("1e-7", "1e-7"),
            ("1.5e-7", "1.5e-7"),
            ("1e16", "10000000000000000"),
            ("100000000000000000000", "100000000000000000000"),
            ("1e21", "1e+21"),
            ("1.25e22", "1.25e+22"),
            ("18446744073709551615", "18446744073709552000"),
            ("9007199254740991", "9007199254740991"),
        ];
        for (raw, expected) in cases {
            assert_eq!(
                canonical_payload(&json!("a"), &amount(raw)),
                format!(r#"{{"account":"a","amount":{}}}"#, expected),
                "amount {}",
                raw
            );
        }
    }

    #[test]
    fn test_canonical_nested_values() {
        assert_eq!(
            canonical_payload(&json!({"id": 7.0}), &json!([1.0, "x", null])),
            r#"{"account":{"id":7},"amount":[1,"x",null]}"#
        );
    }

    #[test]
    fn test_payload_digest() {
        let digest = payload_digest(&Value::Null, &Value::Null);
        assert_eq!(digest.len(), 64);
        assert!(digest.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));

        let expected = hex::encode(Sha256::digest(br#"{"account":"a","amount":1}"#));
        assert_eq!(payload_digest(&json!("a"), &json!(1)), expected);
        assert_ne!(payload_digest(&json!("a"), &json!(2)), expected);
    }
}
