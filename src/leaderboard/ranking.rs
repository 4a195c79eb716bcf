//! Ranking of raw score documents
//!
//! Stored documents are read loosely: any field may be missing or hold an
//! unexpected type. Decoding applies fixed defaults:
//!
//! | field     | sort key when missing | public value when missing |
//! |-----------|-----------------------|---------------------------|
//! | `time_ms` | +infinity (last)      | `0`                       |
//! | `moves`   | +infinity (last)      | `0`                       |
//! | `name`    | n/a                   | `"Anonymous"`             |
//!
//! Non-numeric `time_ms`/`moves` values are treated as missing. Doubles are
//! truncated toward zero when projected.

use bson::{Bson, Document};
use serde::Serialize;
use std::cmp::Ordering;

/// Name shown for entries stored without one
pub const DEFAULT_NAME: &str = "Anonymous";

/// Public shape of a leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    pub time_ms: i64,
    pub moves: i64,
}

impl LeaderboardEntry {
    /// Project a stored document, applying defaults for absent fields
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.get("_id").map(render_id).unwrap_or_default(),
            name: match doc.get("name") {
                Some(Bson::String(name)) => name.clone(),
                _ => DEFAULT_NAME.to_string(),
            },
            time_ms: integer_field(doc, "time_ms"),
            moves: integer_field(doc, "moves"),
        }
    }
}

fn render_id(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn numeric_field(doc: &Document, key: &str) -> Option<f64> {
    match doc.get(key)? {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) if !v.is_nan() => Some(*v),
        _ => None,
    }
}

fn integer_field(doc: &Document, key: &str) -> i64 {
    match doc.get(key) {
        Some(Bson::Int32(v)) => i64::from(*v),
        Some(Bson::Int64(v)) => *v,
        // `as` saturates at the i64 bounds and maps NaN to 0
        Some(Bson::Double(v)) => v.trunc() as i64,
        _ => 0,
    }
}

fn sort_key(doc: &Document) -> (f64, f64) {
    (
        numeric_field(doc, "time_ms").unwrap_or(f64::INFINITY),
        numeric_field(doc, "moves").unwrap_or(f64::INFINITY),
    )
}

fn compare(a: &Document, b: &Document) -> Ordering {
    let (a_time, a_moves) = sort_key(a);
    let (b_time, b_moves) = sort_key(b);
    a_time.total_cmp(&b_time).then(a_moves.total_cmp(&b_moves))
}

/// Order documents by (time, moves) ascending and keep the best `top`.
///
/// The sort is stable, so equal scores keep storage order.
pub fn rank(mut docs: Vec<Document>, top: usize) -> Vec<LeaderboardEntry> {
    docs.sort_by(compare);
    docs.iter()
        .take(top)
        .map(LeaderboardEntry::from_document)
        .collect()
}
