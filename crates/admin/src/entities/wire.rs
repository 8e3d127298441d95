//! Lenient deserializers and display helpers shared by the entity
//! transforms.
//!
//! The backend is loose with types: ids arrive as numbers or numeric
//! strings, regions as nested objects or bare names, timestamps in two
//! formats. Every helper here maps what it cannot read to `None` instead of
//! failing the whole record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Shown for missing values.
pub const PLACEHOLDER: &str = "-";

/// Nested `province` / `regency` object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[allow(clippy::cast_possible_truncation)]
fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_owned())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Integer or numeric string.
pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(value_to_i64))
}

/// Money amount: integer, decimal or numeric string; decimals are rounded.
#[allow(clippy::cast_possible_truncation)]
pub fn amount<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.and_then(|v| match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
        _ => None,
    }))
}

/// String, number or boolean as text; blank strings are `None`.
pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.and_then(value_to_string))
}

/// `{ "id": .., "name": .. }` or a bare name.
pub fn region<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Region>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.and_then(|v| match v {
        Value::Object(mut map) => Some(Region {
            id: map.get("id").and_then(value_to_i64),
            name: map.remove("name").and_then(value_to_string),
        }),
        other => value_to_string(other).map(|name| Region {
            id: None,
            name: Some(name),
        }),
    }))
}

/// RFC 3339, `YYYY-MM-DD HH:MM:SS` (read as UTC) or `YYYY-MM-DD`.
pub fn timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?
        .and_then(value_to_string)
        .and_then(|s| parse_timestamp(&s)))
}

#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Region name, or the placeholder.
#[must_use]
pub fn region_name(region: Option<&Region>) -> String {
    region
        .and_then(|r| r.name.clone())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Value, or the placeholder when missing.
#[must_use]
pub fn or_placeholder(value: Option<String>) -> String {
    value.unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Display value back as a form value; the placeholder becomes blank.
#[must_use]
pub fn editable(display: &str) -> String {
    if display == PLACEHOLDER {
        String::new()
    } else {
        display.to_owned()
    }
}

/// `12 Mar 2025`, or the placeholder.
#[must_use]
pub fn display_date(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(
        || PLACEHOLDER.to_string(),
        |dt| dt.format("%d %b %Y").to_string(),
    )
}

/// `Rp 5.000.000`.
#[must_use]
pub fn rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "id")]
        id: Option<i64>,
        #[serde(default, deserialize_with = "amount")]
        salary: Option<i64>,
        #[serde(default, deserialize_with = "text")]
        phone: Option<String>,
        #[serde(default, deserialize_with = "region")]
        province: Option<Region>,
        #[serde(default, deserialize_with = "timestamp")]
        created_at: Option<DateTime<Utc>>,
    }

    fn probe(value: serde_json::Value) -> Probe {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_ids_accept_numbers_and_numeric_strings() {
        assert_eq!(probe(json!({"id": 12})).id, Some(12));
        assert_eq!(probe(json!({"id": "42"})).id, Some(42));
        assert_eq!(probe(json!({"id": "abc"})).id, None);
        assert_eq!(probe(json!({"id": null})).id, None);
        assert_eq!(probe(json!({})).id, None);
    }

    #[test]
    fn test_amounts() {
        assert_eq!(probe(json!({"salary": "5000000.00"})).salary, Some(5_000_000));
        assert_eq!(probe(json!({"salary": 4500000})).salary, Some(4_500_000));
        assert_eq!(probe(json!({"salary": "nego"})).salary, None);
    }

    #[test]
    fn test_text_accepts_numbers_and_drops_blanks() {
        assert_eq!(probe(json!({"phone": 81234567})).phone.as_deref(), Some("81234567"));
        assert_eq!(probe(json!({"phone": "  "})).phone, None);
    }

    #[test]
    fn test_region_shapes() {
        let nested = probe(json!({"province": {"id": "35", "name": "Jawa Timur"}}));
        assert_eq!(
            nested.province,
            Some(Region { id: Some(35), name: Some("Jawa Timur".into()) })
        );
        let bare = probe(json!({"province": "Jawa Timur"}));
        assert_eq!(region_name(bare.province.as_ref()), "Jawa Timur");
        assert_eq!(region_name(None), "-");
    }

    #[test]
    fn test_timestamp_formats() {
        let rfc = probe(json!({"created_at": "2025-03-12T08:30:00.000000Z"}))
            .created_at
            .unwrap();
        assert_eq!((rfc.year(), rfc.month(), rfc.day(), rfc.hour()), (2025, 3, 12, 8));

        let sql = probe(json!({"created_at": "2025-03-12 08:30:00"})).created_at.unwrap();
        assert_eq!(sql, rfc);

        assert!(probe(json!({"created_at": "kemarin"})).created_at.is_none());
        assert_eq!(display_date(Some(sql)), "12 Mar 2025");
        assert_eq!(display_date(None), "-");
    }

    #[test]
    fn test_rupiah_grouping() {
        assert_eq!(rupiah(0), "Rp 0");
        assert_eq!(rupiah(950), "Rp 950");
        assert_eq!(rupiah(5_000_000), "Rp 5.000.000");
        assert_eq!(rupiah(12_500), "Rp 12.500");
    }
}
