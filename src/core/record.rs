//! Log record structure

use super::fields::Fields;
use super::level::Level;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The fully resolved unit handed to drivers, sinks, and hooks.
///
/// A record is built once per emission that passes the level filter and is
/// shared behind an `Arc` afterwards; nothing mutates it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub level: Level,
    /// Logger name; empty for the root logger
    pub logger: String,
    pub message: String,
    /// Ambient, bound, and per-call fields, merged
    pub fields: Fields,
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    /// Stamp a record with the current time
    pub fn new(level: Level, logger: impl Into<String>, message: String, fields: Fields) -> Self {
        Self {
            level,
            logger: logger.into(),
            message,
            fields,
            timestamp: Utc::now(),
        }
    }

    /// Merge the three field layers. Precedence on key collision is
    /// per-call over bound over ambient.
    pub fn merge_fields(ambient: &Fields, bound: &Fields, per_call: Option<&Fields>) -> Fields {
        let mut merged = ambient.clone();
        merged.extend_from(bound);
        if let Some(per_call) = per_call {
            merged.extend_from(per_call);
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fields::FieldValue;

    #[test]
    fn test_merge_precedence() {
        let ambient = Fields::new().with("a", 1).with("ambient_only", true);
        let bound = Fields::new().with("a", 2).with("bound_only", true);
        let call = Fields::new().with("a", 3);

        let merged = LogRecord::merge_fields(&ambient, &bound, Some(&call));
        assert_eq!(merged.get("a"), Some(&FieldValue::Int(3)));
        assert_eq!(merged.len(), 3);

        let merged = LogRecord::merge_fields(&ambient, &bound, None);
        assert_eq!(merged.get("a"), Some(&FieldValue::Int(2)));

        let merged = LogRecord::merge_fields(&ambient, &Fields::new(), None);
        assert_eq!(merged.get("a"), Some(&FieldValue::Int(1)));
    }

    #[test]
    fn test_record_serializes_fields_inline() {
        let record = LogRecord::new(
            Level::Info,
            "db",
            "connected".to_string(),
            Fields::new().with("pool", 4),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["logger"], "db");
        assert_eq!(json["level"], "Info");
        assert_eq!(json["fields"]["pool"], 4);
    }
}
