//! Type-directed rendering of seed values as C# literals.
//!
//! Each declared property type maps to one [`SemanticType`] variant; adding a
//! type means adding a variant and its arm in [`format_literal`]. A value that
//! does not fit its declared type falls back to its plain textual form and is
//! flagged so the caller can report it.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_yaml::Value;
use std::sync::OnceLock;

use crate::codegen::utils::escape_csharp_string;

/// Rendering pattern for date/time literals (`yyyy-MM-ddTHH:mm:ss`)
const DATE_TIME_OUTPUT: &str = "%Y-%m-%dT%H:%M:%S";

/// Accepted input layouts for date/time values, tried in order after RFC 3339
const DATE_TIME_INPUTS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Semantic type of a declared property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticType {
    Guid,
    Double,
    Decimal,
    Int,
    Long,
    DateTime,
    String,
    Bool,
    Other(String),
}

impl SemanticType {
    /// Classify a declared type name. A trailing `?` is ignored.
    pub fn parse(type_name: &str) -> Self {
        let base = type_name.trim().trim_end_matches('?');
        match base {
            "Guid" | "System.Guid" => SemanticType::Guid,
            "double" | "Double" => SemanticType::Double,
            "decimal" | "Decimal" => SemanticType::Decimal,
            "int" | "Int32" => SemanticType::Int,
            "long" | "Int64" => SemanticType::Long,
            "DateTime" | "System.DateTime" => SemanticType::DateTime,
            "string" | "String" => SemanticType::String,
            "bool" | "Boolean" => SemanticType::Bool,
            other => SemanticType::Other(other.to_string()),
        }
    }
}

/// Rendered literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedLiteral {
    pub text: String,
    /// True when the value did not fit its recognised type
    pub fell_back: bool,
}

impl FormattedLiteral {
    fn exact(text: String) -> Self {
        FormattedLiteral { text, fell_back: false }
    }
}

/// Render `value` as a literal of type `ty`.
pub fn format_literal(ty: &SemanticType, value: &Value) -> FormattedLiteral {
    let Some(raw) = raw_text(value) else {
        return FormattedLiteral::exact("null".to_string());
    };

    let rendered = match ty {
        SemanticType::Guid => match value {
            Value::String(s) => Some(format!("Guid.Parse(\"{}\")", escape_csharp_string(s))),
            _ => None,
        },
        SemanticType::Double => format_double(&raw),
        SemanticType::Decimal => format_decimal(&raw),
        SemanticType::Int => raw.trim().parse::<i32>().ok().map(|i| i.to_string()),
        SemanticType::Long => raw.trim().parse::<i64>().ok().map(|l| l.to_string()),
        SemanticType::DateTime => parse_date_time(&raw)
            .map(|dt| format!("DateTime.Parse(\"{}\")", dt.format(DATE_TIME_OUTPUT))),
        SemanticType::String => Some(format!("\"{}\"", escape_csharp_string(&raw))),
        SemanticType::Bool => match value {
            Value::Bool(b) => Some(b.to_string()),
            _ => raw.trim().to_lowercase().parse::<bool>().ok().map(|b| b.to_string()),
        },
        SemanticType::Other(_) => return FormattedLiteral::exact(raw),
    };

    match rendered {
        Some(text) => FormattedLiteral::exact(text),
        None => FormattedLiteral { text: raw, fell_back: true },
    }
}

/// Render a value given an optional declared type name.
///
/// Unknown or absent types use the value's plain textual form.
pub fn format_value(type_name: Option<&str>, value: &Value) -> String {
    let ty = type_name
        .map(SemanticType::parse)
        .unwrap_or_else(|| SemanticType::Other(String::new()));
    format_literal(&ty, value).text
}

/// Plain textual form of a raw value; `None` for null
pub fn raw_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Tagged(tagged) => raw_text(&tagged.value),
        other => Some(
            serde_json::to_string(other)
                .or_else(|_| serde_yaml::to_string(other).map(|s| s.trim_end().to_string()))
                .unwrap_or_default(),
        ),
    }
}

/// Shortest round-trip text that always carries a `.` or an exponent, so the
/// literal is never read as an integer (`1e20`, `1000.0`, `1e-7`).
fn format_double(raw: &str) -> Option<String> {
    let d = raw.trim().parse::<f64>().ok().filter(|d| d.is_finite())?;
    Some(format!("{:?}", d))
}

fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([+-]?)(\d*)(?:\.(\d*))?$").expect("decimal pattern is valid")
    })
}

fn format_decimal(raw: &str) -> Option<String> {
    let caps = decimal_pattern().captures(raw.trim())?;
    let sign = if &caps[1] == "-" { "-" } else { "" };
    let int_part = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    let frac_part = caps.get(3).map(|m| m.as_str()).unwrap_or("");

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    if frac_part.is_empty() {
        Some(format!("{}{}m", sign, int_part))
    } else {
        Some(format!("{}{}.{}m", sign, int_part, frac_part))
    }
}

fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    for layout in DATE_TIME_INPUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, layout) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
