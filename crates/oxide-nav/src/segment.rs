//! Named, typed segments of a route template.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::Serialize;
use tracing::debug;

/// The declared type of a named segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Any text (`:name` or `:name:str`).
    #[default]
    Str,
    /// A base-10 integer (`:name:int`).
    Int,
    /// An arbitrary-precision decimal (`:name:num`).
    Decimal,
    /// A boolean flag (`:name:bool`).
    Bool,
}

impl SegmentKind {
    /// Maps a `:type` suffix to a kind. Unrecognized suffixes fall back to
    /// [`SegmentKind::Str`].
    #[must_use]
    pub fn from_suffix(suffix: Option<&str>) -> Self {
        match suffix {
            Some("int") => Self::Int,
            Some("num") => Self::Decimal,
            Some("bool") => Self::Bool,
            _ => Self::Str,
        }
    }

    /// Returns the template suffix for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Decimal => "num",
            Self::Bool => "bool",
        }
    }

    /// Converts a raw path component into a value of this kind.
    ///
    /// Returns `None` when the component does not parse.
    #[must_use]
    pub fn parse(&self, raw: &str) -> Option<SegmentValue> {
        match self {
            Self::Str => Some(SegmentValue::Str(raw.to_string())),
            Self::Int => match raw.parse::<i64>() {
                Ok(v) => Some(SegmentValue::Int(v)),
                Err(e) => {
                    debug!(raw, error = %e, "segment is not an integer");
                    None
                }
            },
            Self::Decimal => match parse_decimal(raw) {
                Ok(v) => Some(SegmentValue::Decimal(v)),
                Err(e) => {
                    debug!(raw, error = %e, "segment is not a decimal");
                    None
                }
            },
            Self::Bool => Some(SegmentValue::Bool(
                !(raw.eq_ignore_ascii_case("false") || raw == "0"),
            )),
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses plain (`19.99`) and scientific (`1e3`) notation without losing
/// digits.
fn parse_decimal(raw: &str) -> Result<BigDecimal, bigdecimal::ParseBigDecimalError> {
    BigDecimal::from_str(raw)
}

/// One `:name` or `:name:type` token of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Zero-based index of the path component the segment occupies.
    pub position: usize,
    /// Binding name.
    pub name: String,
    /// Declared type.
    pub kind: SegmentKind,
}

/// A typed value extracted from a path component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SegmentValue {
    Str(String),
    Int(i64),
    Decimal(BigDecimal),
    Bool(bool),
}

impl SegmentValue {
    /// Returns the kind this value was extracted as.
    #[must_use]
    pub fn kind(&self) -> SegmentKind {
        match self {
            Self::Str(_) => SegmentKind::Str,
            Self::Int(_) => SegmentKind::Int,
            Self::Decimal(_) => SegmentKind::Decimal,
            Self::Bool(_) => SegmentKind::Bool,
        }
    }
}

impl fmt::Display for SegmentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}
