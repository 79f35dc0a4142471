//! Canonical parsing of relation-id payloads.
//!
//! Clients send `persons`/`tags` as a list of ids, a comma-joined string of
//! ids, or a single bare id. All three shapes funnel through
//! [`relation_ids`], which also distinguishes "field not supplied" (leave the
//! relation alone) from "empty list" (clear the relation).

use serde_json::Value;

/// Outcome of normalizing a relation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationIds {
    /// The field was not present in the request: no relation change.
    Absent,
    /// The field was present; replace the membership set with these ids.
    /// An empty vec means "clear the relation". Duplicates and input order
    /// are preserved — the store's set-replacement dedups naturally.
    Ids(Vec<i64>),
}

impl RelationIds {
    #[cfg(test)]
    pub fn ids(&self) -> Option<&[i64]> {
        match self {
            RelationIds::Absent => None,
            RelationIds::Ids(ids) => Some(ids),
        }
    }
}

/// Normalize a `persons`/`tags` payload into a canonical id list.
///
/// Missing field and JSON `null` both mean [`RelationIds::Absent`]. Strings
/// split on commas with whitespace trimmed; pieces that are not non-negative
/// integers are dropped silently, as are non-integer list elements. A bare
/// scalar is treated as a one-element list.
pub fn relation_ids(payload: Option<&Value>) -> RelationIds {
    let value = match payload {
        None | Some(Value::Null) => return RelationIds::Absent,
        Some(v) => v,
    };

    match value {
        Value::String(s) => RelationIds::Ids(parse_id_string(s)),
        Value::Array(items) => {
            let ids = items.iter().filter_map(element_id).collect();
            RelationIds::Ids(ids)
        }
        // Bare scalar: wrap as a one-element list and apply the same filter.
        other => RelationIds::Ids(element_id(other).into_iter().collect()),
    }
}

/// "3, 5,5,bad,7" -> [3, 5, 5, 7]
fn parse_id_string(s: &str) -> Vec<i64> {
    s.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .filter_map(digits_to_id)
        .collect()
}

/// A list element counts if it is an integer or an integer-shaped string.
fn element_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().filter(|id| *id >= 0),
        Value::String(s) => digits_to_id(s.trim()),
        _ => None,
    }
}

/// Parse a piece that consists solely of ASCII digits (so no sign, no
/// decimal point — mirrors the non-negative-integer contract).
fn digits_to_id(piece: &str) -> Option<i64> {
    if piece.is_empty() || !piece.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    piece.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_field_is_absent() {
        assert_eq!(relation_ids(None), RelationIds::Absent);
    }

    #[test]
    fn null_is_absent() {
        assert_eq!(relation_ids(Some(&Value::Null)), RelationIds::Absent);
    }

    #[test]
    fn empty_list_is_distinct_from_absent() {
        let empty = relation_ids(Some(&json!([])));
        assert_eq!(empty, RelationIds::Ids(vec![]));
        assert_ne!(empty, RelationIds::Absent);
    }

    #[test]
    fn comma_string_keeps_duplicates_and_order() {
        let result = relation_ids(Some(&json!("3, 5,5,bad,7")));
        assert_eq!(result, RelationIds::Ids(vec![3, 5, 5, 7]));
    }

    #[test]
    fn string_drops_empty_and_negative_pieces() {
        let result = relation_ids(Some(&json!(" 1,, -2 , 03 ,4.5")));
        assert_eq!(result, RelationIds::Ids(vec![1, 3]));
    }

    #[test]
    fn bare_scalar_becomes_one_element_list() {
        assert_eq!(relation_ids(Some(&json!(42))), RelationIds::Ids(vec![42]));
    }

    #[test]
    fn bare_non_integer_scalar_yields_empty_list() {
        assert_eq!(relation_ids(Some(&json!(true))), RelationIds::Ids(vec![]));
        assert_eq!(relation_ids(Some(&json!(-7))), RelationIds::Ids(vec![]));
    }

    #[test]
    fn list_keeps_integers_and_integer_strings() {
        let result = relation_ids(Some(&json!([1, "2", "x", null, 3.5, {}, 4])));
        assert_eq!(result, RelationIds::Ids(vec![1, 2, 4]));
    }

    #[test]
    fn single_id_string_without_commas() {
        assert_eq!(relation_ids(Some(&json!("9"))), RelationIds::Ids(vec![9]));
    }

    #[test]
    fn normalization_is_idempotent() {
        let payloads = [
            json!("3, 5,5,bad,7"),
            json!([1, "2", false, 9]),
            json!(12),
            json!([]),
            json!("  ,  "),
        ];
        for payload in &payloads {
            let once = relation_ids(Some(payload));
            let ids = once.ids().unwrap().to_vec();
            let again = relation_ids(Some(&json!(ids)));
            assert_eq!(again, once, "payload {payload} not idempotent");
        }
    }
}
