//! Coercion of untyped tool arguments into Discord types.

use std::time::Duration;

use serde_json::{Map, Value};

use crate::error::ToolError;
use crate::platform::Snowflake;

/// Hard cap for `list_members`.
pub const MAX_MEMBER_FETCH: u16 = 1000;
pub const DEFAULT_MEMBER_FETCH: u16 = 100;

/// Hard cap for `read_messages`.
pub const MAX_MESSAGE_FETCH: u8 = 100;
pub const DEFAULT_MESSAGE_FETCH: u8 = 10;

/// Longest timeout Discord accepts: 28 days.
pub const MAX_TIMEOUT_MINUTES: f64 = 40_320.0;

/// Inactivity periods Discord accepts for thread auto-archive.
pub const ARCHIVE_DURATIONS: [u32; 4] = [60, 1440, 4320, 10080];

/// Arguments of one tool call.
#[derive(Debug, Default)]
pub struct ToolArgs {
    map: Map<String, Value>,
}

impl ToolArgs {
    /// Accepts a JSON object; `null` counts as no arguments.
    pub fn from_value(value: Value) -> Result<Self, ToolError> {
        match value {
            Value::Object(map) => Ok(Self { map }),
            Value::Null => Ok(Self::default()),
            other => Err(ToolError::invalid(format!(
                "Tool arguments must be an object, got {}",
                other
            ))),
        }
    }

    /// Present and not `null`.
    fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    pub fn str(&self, key: &str) -> Result<&str, ToolError> {
        self.opt_str(key)?
            .ok_or_else(|| ToolError::invalid(format!("Missing required argument '{}'", key)))
    }

    pub fn opt_str(&self, key: &str) -> Result<Option<&str>, ToolError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(ToolError::invalid(format!(
                "Argument '{}' must be a string, got {}",
                key, other
            ))),
        }
    }

    /// A snowflake given as a decimal string or a JSON integer.
    pub fn id(&self, key: &str) -> Result<Snowflake, ToolError> {
        self.opt_id(key)?
            .ok_or_else(|| ToolError::invalid(format!("Missing required argument '{}'", key)))
    }

    pub fn opt_id(&self, key: &str) -> Result<Option<Snowflake>, ToolError> {
        let parsed = match self.get(key) {
            None => return Ok(None),
            Some(Value::String(s)) => s.trim().parse::<Snowflake>().ok(),
            Some(Value::Number(n)) => n.as_u64(),
            Some(_) => None,
        };
        match parsed {
            Some(id) => Ok(Some(id)),
            None => Err(ToolError::invalid(format!(
                "invalid literal for {}: {} is not a numeric ID",
                key,
                self.map.get(key).map(Value::to_string).unwrap_or_default()
            ))),
        }
    }

    pub fn opt_number(&self, key: &str) -> Result<Option<f64>, ToolError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(Value::String(s)) => s.trim().parse::<f64>().map(Some).map_err(|_| {
                ToolError::invalid(format!("Argument '{}' must be a number, got \"{}\"", key, s))
            }),
            Some(other) => Err(ToolError::invalid(format!(
                "Argument '{}' must be a number, got {}",
                key, other
            ))),
        }
    }

    pub fn opt_integer(&self, key: &str) -> Result<Option<i64>, ToolError> {
        match self.opt_number(key)? {
            None => Ok(None),
            Some(n) if n.fract() == 0.0 && n.is_finite() => Ok(Some(n as i64)),
            Some(n) => Err(ToolError::invalid(format!(
                "Argument '{}' must be an integer, got {}",
                key, n
            ))),
        }
    }

    pub fn str_list(&self, key: &str) -> Result<Vec<&str>, ToolError> {
        let items = match self.get(key) {
            None => {
                return Err(ToolError::invalid(format!("Missing required argument '{}'", key)))
            }
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ToolError::invalid(format!(
                    "Argument '{}' must be an array of strings, got {}",
                    key, other
                )))
            }
        };
        items
            .iter()
            .map(|item| {
                item.as_str().ok_or_else(|| {
                    ToolError::invalid(format!("Argument '{}' may only contain strings", key))
                })
            })
            .collect()
    }

    /// Audit-log reason, or `default` when the caller gave none.
    pub fn reason<'a>(&'a self, default: &'a str) -> Result<&'a str, ToolError> {
        Ok(self.opt_str("reason")?.unwrap_or(default))
    }

    /// Requested fetch size, silently clamped into `1..=max`.
    pub fn limit(&self, default: u16, max: u16) -> Result<u16, ToolError> {
        Ok(match self.opt_number("limit")? {
            None => default.min(max),
            Some(n) if n.is_nan() || n < 1.0 => 1,
            Some(n) if n >= f64::from(max) => max,
            Some(n) => n as u16,
        })
    }

    pub fn color(&self, key: &str) -> Result<Option<u32>, ToolError> {
        self.opt_str(key)?.map(parse_color).transpose()
    }

    pub fn archive_duration(&self) -> Result<Option<u32>, ToolError> {
        match self.opt_integer("auto_archive_duration")? {
            None => Ok(None),
            Some(minutes) => ARCHIVE_DURATIONS
                .iter()
                .copied()
                .find(|d| i64::from(*d) == minutes)
                .map(Some)
                .ok_or_else(|| {
                    ToolError::invalid(format!(
                        "auto_archive_duration must be one of 60, 1440, 4320, 10080; got {}",
                        minutes
                    ))
                }),
        }
    }

    /// Timeout length in minutes. Zero or absent means no timeout.
    pub fn timeout_minutes(&self) -> Result<Option<f64>, ToolError> {
        match self.opt_number("timeout_minutes")? {
            None => Ok(None),
            Some(m) if m.is_nan() || m < 0.0 => Err(ToolError::invalid(
                "timeout_minutes must not be negative",
            )),
            Some(m) if m > MAX_TIMEOUT_MINUTES => Err(ToolError::invalid(format!(
                "timeout_minutes must be at most {} (28 days)",
                MAX_TIMEOUT_MINUTES
            ))),
            Some(m) if m == 0.0 => Ok(None),
            Some(m) => Ok(Some(m)),
        }
    }
}

/// Parse `#RRGGBB` or `RRGGBB` into a 24-bit color.
pub fn parse_color(raw: &str) -> Result<u32, ToolError> {
    let hex = raw.strip_prefix('#').unwrap_or(raw);
    let invalid = || ToolError::invalid("Invalid color format. Use hex code (e.g., #FF0000).");
    if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    u32::from_str_radix(hex, 16)
        .ok()
        .filter(|c| *c <= 0xFF_FFFF)
        .ok_or_else(invalid)
}

pub fn minutes_to_duration(minutes: f64) -> Duration {
    Duration::from_secs_f64(minutes * 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> ToolArgs {
        ToolArgs::from_value(value).unwrap()
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(ToolArgs::from_value(json!([1, 2])).is_err());
        assert!(ToolArgs::from_value(json!("x")).is_err());
        assert_eq!(ToolArgs::from_value(Value::Null).unwrap().opt_str("anything").unwrap(), None);
    }

    #[test]
    fn test_id_accepts_strings_and_integers() {
        let a = args(json!({"a": "123456789012345678", "b": 42, "c": " 7 "}));
        assert_eq!(a.id("a").unwrap(), 123_456_789_012_345_678);
        assert_eq!(a.id("b").unwrap(), 42);
        assert_eq!(a.id("c").unwrap(), 7);
    }

    #[test]
    fn test_id_rejects_non_numeric() {
        let a = args(json!({"channel_id": "general", "neg": -4, "f": 1.5}));
        let err = a.id("channel_id").unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument(_)));
        assert!(err.to_string().contains("channel_id"));
        assert!(a.id("neg").is_err());
        assert!(a.id("f").is_err());
        assert!(a.id("missing").is_err());
        assert_eq!(a.opt_id("missing").unwrap(), None);
    }

    #[test]
    fn test_null_counts_as_absent() {
        let a = args(json!({"topic": null}));
        assert_eq!(a.opt_str("topic").unwrap(), None);
    }

    #[test]
    fn test_limit_clamps_silently() {
        assert_eq!(args(json!({"limit": 5000})).limit(100, 1000).unwrap(), 1000);
        assert_eq!(args(json!({"limit": 50})).limit(100, 1000).unwrap(), 50);
        assert_eq!(args(json!({"limit": 0})).limit(100, 1000).unwrap(), 1);
        assert_eq!(args(json!({"limit": "25"})).limit(10, 100).unwrap(), 25);
        assert_eq!(args(json!({})).limit(10, 100).unwrap(), 10);
        assert!(args(json!({"limit": "lots"})).limit(10, 100).is_err());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#FF0000").unwrap(), 0xFF0000);
        assert_eq!(parse_color("00ff00").unwrap(), 0x00FF00);
        assert_eq!(parse_color("#fff").unwrap(), 0xFFF);
        assert!(parse_color("ZZZZZZ").is_err());
        assert!(parse_color("#").is_err());
        assert!(parse_color("").is_err());
        assert!(parse_color("##FF0000").is_err());
        assert!(parse_color("+12").is_err());
        assert!(parse_color("1000000").is_err());
    }

    #[test]
    fn test_reason_defaults() {
        assert_eq!(args(json!({})).reason("Role created via MCP").unwrap(), "Role created via MCP");
        assert_eq!(args(json!({"reason": "spam"})).reason("x").unwrap(), "spam");
    }

    #[test]
    fn test_archive_duration_enum() {
        assert_eq!(
            args(json!({"auto_archive_duration": 1440})).archive_duration().unwrap(),
            Some(1440)
        );
        assert!(args(json!({"auto_archive_duration": 30})).archive_duration().is_err());
        assert_eq!(args(json!({})).archive_duration().unwrap(), None);
    }

    #[test]
    fn test_timeout_minutes_bounds() {
        assert_eq!(args(json!({"timeout_minutes": 30})).timeout_minutes().unwrap(), Some(30.0));
        assert_eq!(args(json!({"timeout_minutes": 0})).timeout_minutes().unwrap(), None);
        assert!(args(json!({"timeout_minutes": -1})).timeout_minutes().is_err());
        assert!(args(json!({"timeout_minutes": 50000})).timeout_minutes().is_err());
        assert_eq!(minutes_to_duration(30.0), Duration::from_secs(1800));
    }

    #[test]
    fn test_str_list() {
        let a = args(json!({"emojis": ["👍", "🎉"], "bad": [1]}));
        assert_eq!(a.str_list("emojis").unwrap(), vec!["👍", "🎉"]);
        assert!(a.str_list("bad").is_err());
        assert!(a.str_list("missing").is_err());
    }
}
