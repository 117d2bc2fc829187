use chrono::Utc;

use crate::types::ParamValue;

/// Dynamic values computed on every reference; never read from the parameter mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Timestamp,
    TimestampMs,
    Date,
    DateTime,
    Uuid,
    RandomInt,
    RandomStr,
}

const RANDOM_STR_LEN: usize = 8;
const RANDOM_INT_MAX: u32 = 1_000_000;

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "timestamp" => Some(Builtin::Timestamp),
            "timestamp_ms" => Some(Builtin::TimestampMs),
            "date" => Some(Builtin::Date),
            "datetime" => Some(Builtin::DateTime),
            "uuid" => Some(Builtin::Uuid),
            "random_int" => Some(Builtin::RandomInt),
            "random_str" => Some(Builtin::RandomStr),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Timestamp => "timestamp",
            Builtin::TimestampMs => "timestamp_ms",
            Builtin::Date => "date",
            Builtin::DateTime => "datetime",
            Builtin::Uuid => "uuid",
            Builtin::RandomInt => "random_int",
            Builtin::RandomStr => "random_str",
        }
    }

    pub fn evaluate(&self) -> ParamValue {
        match self {
            Builtin::Timestamp => ParamValue::from(Utc::now().timestamp()),
            Builtin::TimestampMs => ParamValue::from(Utc::now().timestamp_millis()),
            Builtin::Date => ParamValue::String(Utc::now().format("%Y-%m-%d").to_string()),
            Builtin::DateTime => {
                ParamValue::String(Utc::now().format("%Y-%m-%d %H:%M:%S").to_string())
            }
            Builtin::Uuid => ParamValue::String(uuid::Uuid::new_v4().to_string()),
            Builtin::RandomInt => ParamValue::from(fastrand::u32(0..RANDOM_INT_MAX)),
            Builtin::RandomStr => ParamValue::String(
                std::iter::repeat_with(fastrand::alphanumeric)
                    .take(RANDOM_STR_LEN)
                    .collect(),
            ),
        }
    }
}
