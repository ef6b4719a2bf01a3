//! FILENAME: tabular-engine/src/value.rs
//! PURPOSE: Defines the closed set of values a cached cell can hold.
//! CONTEXT: `Value` is the runtime value, `ValueKind` is its tag and
//! `ValueType` is what a caller asks for when reading a column.
//! `ValueType::accepts` is the single compatibility table used by typed
//! access; there is no open-ended runtime type inspection.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A value the cache cannot interpret (arrays, structs, references...).
/// It is carried through unchanged and only ever matches `ValueType::Opaque`
/// or `ValueType::Any`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpaqueValue {
    pub type_name: String,
    pub payload: Vec<u8>,
}

/// The value held by one row/column intersection.
/// `Null` is a domain value ("SQL NULL"), not a missing cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(BigDecimal),
    Text(String),
    Binary(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Opaque(OpaqueValue),
}

/// Runtime tag of a non-null `Value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueKind {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    Text,
    Binary,
    Date,
    Time,
    Timestamp,
    Opaque,
}

impl ValueKind {
    pub const ALL: [ValueKind; 14] = [
        ValueKind::Boolean,
        ValueKind::Byte,
        ValueKind::Short,
        ValueKind::Int,
        ValueKind::Long,
        ValueKind::Float,
        ValueKind::Double,
        ValueKind::Decimal,
        ValueKind::Text,
        ValueKind::Binary,
        ValueKind::Date,
        ValueKind::Time,
        ValueKind::Timestamp,
        ValueKind::Opaque,
    ];

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            ValueKind::Byte | ValueKind::Short | ValueKind::Int | ValueKind::Long
        )
    }

    pub fn is_numeric(self) -> bool {
        self.is_integral()
            || matches!(self, ValueKind::Float | ValueKind::Double | ValueKind::Decimal)
    }

    pub fn is_temporal(self) -> bool {
        matches!(self, ValueKind::Date | ValueKind::Time | ValueKind::Timestamp)
    }

    pub fn name(self) -> &'static str {
        ValueType::from(self).name()
    }
}

/// A type a caller may request from the cache.
///
/// Every concrete `ValueKind` has a matching variant. `Any`, `Number` and
/// `Temporal` are abstract targets that accept a family of kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Any,
    Number,
    Temporal,
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    Text,
    Binary,
    Date,
    Time,
    Timestamp,
    Opaque,
}

impl ValueType {
    /// The variant-compatibility table: can a value of `kind` be handed out
    /// unchanged to a caller asking for `self`?
    pub fn accepts(self, kind: ValueKind) -> bool {
        match self {
            ValueType::Any => true,
            ValueType::Number => kind.is_numeric(),
            ValueType::Temporal => kind.is_temporal(),
            concrete => concrete.concrete_kind() == Some(kind),
        }
    }

    /// The kind a concrete type corresponds to, `None` for abstract types.
    pub fn concrete_kind(self) -> Option<ValueKind> {
        match self {
            ValueType::Any | ValueType::Number | ValueType::Temporal => None,
            ValueType::Boolean => Some(ValueKind::Boolean),
            ValueType::Byte => Some(ValueKind::Byte),
            ValueType::Short => Some(ValueKind::Short),
            ValueType::Int => Some(ValueKind::Int),
            ValueType::Long => Some(ValueKind::Long),
            ValueType::Float => Some(ValueKind::Float),
            ValueType::Double => Some(ValueKind::Double),
            ValueType::Decimal => Some(ValueKind::Decimal),
            ValueType::Text => Some(ValueKind::Text),
            ValueType::Binary => Some(ValueKind::Binary),
            ValueType::Date => Some(ValueKind::Date),
            ValueType::Time => Some(ValueKind::Time),
            ValueType::Timestamp => Some(ValueKind::Timestamp),
            ValueType::Opaque => Some(ValueKind::Opaque),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueType::Any => "any",
            ValueType::Number => "number",
            ValueType::Temporal => "temporal",
            ValueType::Boolean => "boolean",
            ValueType::Byte => "byte",
            ValueType::Short => "short",
            ValueType::Int => "int",
            ValueType::Long => "long",
            ValueType::Float => "float",
            ValueType::Double => "double",
            ValueType::Decimal => "decimal",
            ValueType::Text => "text",
            ValueType::Binary => "binary",
            ValueType::Date => "date",
            ValueType::Time => "time",
            ValueType::Timestamp => "timestamp",
            ValueType::Opaque => "opaque",
        }
    }
}

impl From<ValueKind> for ValueType {
    fn from(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Boolean => ValueType::Boolean,
            ValueKind::Byte => ValueType::Byte,
            ValueKind::Short => ValueType::Short,
            ValueKind::Int => ValueType::Int,
            ValueKind::Long => ValueType::Long,
            ValueKind::Float => ValueType::Float,
            ValueKind::Double => ValueType::Double,
            ValueKind::Decimal => ValueType::Decimal,
            ValueKind::Text => ValueType::Text,
            ValueKind::Binary => ValueType::Binary,
            ValueKind::Date => ValueType::Date,
            ValueKind::Time => ValueType::Time,
            ValueKind::Timestamp => ValueType::Timestamp,
            ValueKind::Opaque => ValueType::Opaque,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueType {
    type Err = String;

    /// Case-insensitive; accepts the names produced by `ValueType::name`
    /// plus a few common aliases ("string", "integer", "bool", "datetime").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s.trim().to_lowercase().as_str() {
            "any" | "object" => ValueType::Any,
            "number" => ValueType::Number,
            "temporal" => ValueType::Temporal,
            "boolean" | "bool" => ValueType::Boolean,
            "byte" => ValueType::Byte,
            "short" => ValueType::Short,
            "int" | "integer" => ValueType::Int,
            "long" => ValueType::Long,
            "float" => ValueType::Float,
            "double" => ValueType::Double,
            "decimal" => ValueType::Decimal,
            "text" | "string" => ValueType::Text,
            "binary" | "bytes" => ValueType::Binary,
            "date" => ValueType::Date,
            "time" => ValueType::Time,
            "timestamp" | "datetime" => ValueType::Timestamp,
            "opaque" => ValueType::Opaque,
            other => return Err(format!("unknown value type '{}'", other)),
        };
        Ok(ty)
    }
}

impl Value {
    /// Runtime tag, `None` for `Null`.
    pub fn kind(&self) -> Option<ValueKind> {
        let kind = match self {
            Value::Null => return None,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Byte(_) => ValueKind::Byte,
            Value::Short(_) => ValueKind::Short,
            Value::Int(_) => ValueKind::Int,
            Value::Long(_) => ValueKind::Long,
            Value::Float(_) => ValueKind::Float,
            Value::Double(_) => ValueKind::Double,
            Value::Decimal(_) => ValueKind::Decimal,
            Value::Text(_) => ValueKind::Text,
            Value::Binary(_) => ValueKind::Binary,
            Value::Date(_) => ValueKind::Date,
            Value::Time(_) => ValueKind::Time,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::Opaque(_) => ValueKind::Opaque,
        };
        Some(kind)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True when this (non-null) value can be handed out as `ty` unchanged.
    pub fn is_instance_of(&self, ty: ValueType) -> bool {
        self.kind().map_or(false, |kind| ty.accepts(kind))
    }

    /// Integral value widened to i64 (Byte, Short, Int, Long only).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(n) => Some(i64::from(*n)),
            Value::Short(n) => Some(i64::from(*n)),
            Value::Int(n) => Some(i64::from(*n)),
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Any numeric value as f64 (may lose precision for Long and Decimal).
    pub fn as_f64(&self) -> Option<f64> {
        use num_traits::ToPrimitive;
        match self {
            Value::Float(n) => Some(f64::from(*n)),
            Value::Double(n) => Some(*n),
            Value::Decimal(d) => d.to_f64(),
            other => other.as_i64().map(|n| n as f64),
        }
    }

    /// Any numeric value as an exact decimal. Non-finite floats yield `None`.
    pub fn to_decimal(&self) -> Option<BigDecimal> {
        match self {
            Value::Decimal(d) => Some(d.clone()),
            Value::Float(n) => BigDecimal::try_from(f64::from(*n)).ok(),
            Value::Double(n) => BigDecimal::try_from(*n).ok(),
            other => other.as_i64().map(BigDecimal::from),
        }
    }

    /// Natural ordering between two values.
    ///
    /// Numbers compare numerically across widths, text lexicographically,
    /// booleans false < true, binary bytewise and temporal values
    /// chronologically within the same kind. Returns `None` when the pair is
    /// not mutually comparable (different families, opaque values, nulls).
    pub fn natural_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Binary(a), Value::Binary(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            _ => self.numeric_cmp(other),
        }
    }

    fn numeric_cmp(&self, other: &Value) -> Option<Ordering> {
        let (a, b) = (self.kind()?, other.kind()?);
        if !a.is_numeric() || !b.is_numeric() {
            return None;
        }

        if a.is_integral() && b.is_integral() {
            return Some(self.as_i64()?.cmp(&other.as_i64()?));
        }

        if a == ValueKind::Decimal || b == ValueKind::Decimal {
            return self.to_decimal()?.partial_cmp(&other.to_decimal()?);
        }

        Some(self.as_f64()?.total_cmp(&other.as_f64()?))
    }

    /// Returns the display form of the value.
    pub fn display_value(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Boolean(b) => b.to_string(),
            Value::Byte(n) => n.to_string(),
            Value::Short(n) => n.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Long(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::Double(n) => n.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::Text(s) => s.clone(),
            Value::Binary(bytes) => bytes.iter().map(|b| format!("{:02x}", b)).collect(),
            Value::Date(d) => d.to_string(),
            Value::Time(t) => t.to_string(),
            Value::Timestamp(ts) => ts.to_string(),
            Value::Opaque(o) => format!("<{}>", o.type_name),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_value())
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_value! {
    bool => Boolean,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    BigDecimal => Decimal,
    String => Text,
    Vec<u8> => Binary,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => Timestamp,
    OpaqueValue => Opaque,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_kind_of_null_is_none() {
        assert_eq!(Value::Null.kind(), None);
        assert!(!Value::Null.is_instance_of(ValueType::Any));
    }

    #[test]
    fn test_compatibility_table() {
        assert!(ValueType::Any.accepts(ValueKind::Opaque));
        assert!(ValueType::Number.accepts(ValueKind::Decimal));
        assert!(ValueType::Number.accepts(ValueKind::Byte));
        assert!(!ValueType::Number.accepts(ValueKind::Text));
        assert!(ValueType::Temporal.accepts(ValueKind::Time));
        assert!(!ValueType::Temporal.accepts(ValueKind::Long));
        assert!(ValueType::Int.accepts(ValueKind::Int));
        // No implicit widening: an Int is not a Long.
        assert!(!ValueType::Long.accepts(ValueKind::Int));
    }

    #[test]
    fn test_every_kind_round_trips_through_type() {
        for kind in ValueKind::ALL {
            let ty = ValueType::from(kind);
            assert_eq!(ty.concrete_kind(), Some(kind));
            assert!(ty.accepts(kind));
        }
    }

    #[test]
    fn test_numeric_cmp_across_widths() {
        assert_eq!(Value::Byte(3).natural_cmp(&Value::Long(2)), Some(Ordering::Greater));
        assert_eq!(Value::Int(2).natural_cmp(&Value::Double(2.5)), Some(Ordering::Less));
        let half = BigDecimal::from_str("0.5").unwrap();
        assert_eq!(
            Value::Decimal(half).natural_cmp(&Value::Float(0.5)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_incomparable_pairs() {
        assert_eq!(Value::Int(1).natural_cmp(&Value::from("1")), None);
        assert_eq!(Value::Null.natural_cmp(&Value::Null), None);
        let opaque = Value::Opaque(OpaqueValue {
            type_name: "ARRAY".to_string(),
            payload: vec![],
        });
        assert_eq!(opaque.natural_cmp(&opaque), None);
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            Value::Date(date).natural_cmp(&Value::Timestamp(date.and_hms_opt(0, 0, 0).unwrap())),
            None
        );
    }

    #[test]
    fn test_value_type_parsing() {
        assert_eq!(ValueType::from_str("INTEGER"), Ok(ValueType::Int));
        assert_eq!(ValueType::from_str(" string "), Ok(ValueType::Text));
        assert!(ValueType::from_str("map").is_err());
    }

    #[test]
    fn test_display_value() {
        assert_eq!(Value::Null.display_value(), "");
        assert_eq!(Value::Binary(vec![0x0a, 0xff]).display_value(), "0aff");
        assert_eq!(Value::Byte(1).to_string(), "1");
        assert_eq!(Value::from(Some(5i32)), Value::Int(5));
        assert_eq!(Value::from(None::<i32>), Value::Null);
    }
}
