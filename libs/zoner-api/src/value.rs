use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::AccessError;
use crate::object::Object;

/// Canonical value representation.
///
/// Every reflected field is read into and written from a `Value`:
/// - Scalars (Int, UInt, Float, Bool, Char): copied
/// - Decimal, Timestamp: copied, fixed binary layout
/// - String: owned
/// - List, Map: element-wise
/// - Object: shared handle, never deep-copied
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Char(char),
    Int(i64),
    UInt(u64),
    Float(f64),
    /// `(value, scale)`: arbitrary-precision stand-in.
    Decimal(i128, u8),
    /// Microseconds since the Unix epoch.
    Timestamp(i64),
    String(String),
    List(Vec<Value>),
    /// Ordered string-keyed pairs.
    Map(Vec<(String, Value)>),
    Object(Object),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Decimal(..) => "decimal",
            Value::Timestamp(_) => "timestamp",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Render as JSON. Objects are expanded field by field; a back-reference
    /// to an object already on the rendering path becomes `"<cycle Type>"`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut path = Vec::new();
        self.json_guarded(&mut path)
    }

    pub(crate) fn json_guarded(&self, path: &mut Vec<usize>) -> serde_json::Value {
        use serde_json::Value as J;
        match self {
            Value::Null => J::Null,
            Value::Bool(b) => J::Bool(*b),
            Value::Char(c) => J::String(c.to_string()),
            Value::Int(v) => J::from(*v),
            Value::UInt(v) => J::from(*v),
            Value::Float(v) => serde_json::Number::from_f64(*v)
                .map(J::Number)
                .unwrap_or(J::Null),
            Value::Decimal(v, scale) => J::String(Decimal::new(*v, *scale).to_string()),
            Value::Timestamp(micros) => J::from(*micros),
            Value::String(s) => J::String(s.clone()),
            Value::List(items) => J::Array(items.iter().map(|v| v.json_guarded(path)).collect()),
            Value::Map(entries) => J::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.json_guarded(path)))
                    .collect(),
            ),
            Value::Object(obj) => obj.json_guarded(path),
        }
    }
}

/// Objects compare by identity, everything else structurally.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Decimal(a, sa), Value::Decimal(b, sb)) => a == b && sa == sb,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

/// Fixed-point decimal: `value * 10^-scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct Decimal {
    pub value: i128,
    pub scale: u8,
}

impl Decimal {
    pub fn new(value: i128, scale: u8) -> Self {
        Self { value, scale }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.value);
        }
        let sign = if self.value < 0 { "-" } else { "" };
        let abs = self.value.unsigned_abs();
        match 10u128.checked_pow(u32::from(self.scale)) {
            Some(pow) => write!(
                f,
                "{sign}{}.{:0width$}",
                abs / pow,
                abs % pow,
                width = usize::from(self.scale)
            ),
            None => write!(f, "{}e-{}", self.value, self.scale),
        }
    }
}

/// Point in time, microseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, serde::Serialize, serde::Deserialize)]
pub struct Timestamp {
    pub micros: i64,
}

impl Timestamp {
    pub fn from_micros(micros: i64) -> Self {
        Self { micros }
    }

    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    pub fn from_system_time(t: SystemTime) -> Self {
        let micros = match t.duration_since(UNIX_EPOCH) {
            Ok(d) => i64::try_from(d.as_micros()).unwrap_or(i64::MAX),
            Err(e) => -i64::try_from(e.duration().as_micros()).unwrap_or(i64::MAX),
        };
        Self { micros }
    }

    pub fn to_system_time(self) -> SystemTime {
        let offset = Duration::from_micros(self.micros.unsigned_abs());
        if self.micros >= 0 {
            UNIX_EPOCH + offset
        } else {
            UNIX_EPOCH - offset
        }
    }
}

// ---------------------------------------------------------------------------
// Rust field type <-> Value
// ---------------------------------------------------------------------------

/// Read side of a reflected field: borrow the field, produce a `Value`.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Write side of a reflected field: consume a `Value`, produce the field type.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, AccessError>;
}

macro_rules! int_values {
    ($variant:ident, $wide:ty; $($t:ty),*) => {$(
        impl ToValue for $t {
            fn to_value(&self) -> Value {
                Value::$variant(*self as $wide)
            }
        }

        impl FromValue for $t {
            fn from_value(value: Value) -> Result<Self, AccessError> {
                match value {
                    Value::Int(v) => <$t>::try_from(v).map_err(|_| out_of_range(v, stringify!($t))),
                    Value::UInt(v) => <$t>::try_from(v).map_err(|_| out_of_range(v, stringify!($t))),
                    other => Err(AccessError::expected(stringify!($t), &other)),
                }
            }
        }
    )*};
}

fn out_of_range(v: impl fmt::Display, ty: &str) -> AccessError {
    AccessError::type_mismatch(format!("{v} out of range for {ty}"))
}

int_values!(Int, i64; i8, i16, i32, i64, isize);
int_values!(UInt, u64; u8, u16, u32, u64, usize);

impl ToValue for i128 {
    fn to_value(&self) -> Value {
        Value::Decimal(*self, 0)
    }
}

impl FromValue for i128 {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::Decimal(v, 0) => Ok(v),
            Value::Int(v) => Ok(i128::from(v)),
            Value::UInt(v) => Ok(i128::from(v)),
            other => Err(AccessError::expected("i128", &other)),
        }
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as f64),
            Value::UInt(v) => Ok(v as f64),
            other => Err(AccessError::expected("f64", &other)),
        }
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(AccessError::expected("bool", &other)),
        }
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value {
        Value::Char(*self)
    }
}

impl FromValue for char {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::Char(v) => Ok(v),
            other => Err(AccessError::expected("char", &other)),
        }
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::String(s) => Ok(s),
            Value::Char(c) => Ok(c.to_string()),
            other => Err(AccessError::expected("String", &other)),
        }
    }
}

impl ToValue for Decimal {
    fn to_value(&self) -> Value {
        Value::Decimal(self.value, self.scale)
    }
}

impl FromValue for Decimal {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::Decimal(v, scale) => Ok(Decimal::new(v, scale)),
            Value::Int(v) => Ok(Decimal::new(i128::from(v), 0)),
            other => Err(AccessError::expected("Decimal", &other)),
        }
    }
}

impl ToValue for Timestamp {
    fn to_value(&self) -> Value {
        Value::Timestamp(self.micros)
    }
}

impl FromValue for Timestamp {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::Timestamp(micros) | Value::Int(micros) => Ok(Timestamp::from_micros(micros)),
            other => Err(AccessError::expected("Timestamp", &other)),
        }
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        Ok(value)
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, v)| T::from_value(v).map_err(|e| e.with_context(format!("element {i}"))))
                .collect(),
            other => Err(AccessError::expected("list", &other)),
        }
    }
}

impl<T: ToValue> ToValue for BTreeMap<String, T> {
    fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.clone(), v.to_value())).collect())
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        map_entries(value)?
            .into_iter()
            .map(|(k, v)| T::from_value(v).map(|v| (k, v)))
            .collect()
    }
}

/// Entries are emitted in key order so two reads of the same map agree.
impl<T: ToValue> ToValue for HashMap<String, T> {
    fn to_value(&self) -> Value {
        let mut entries: Vec<(String, Value)> =
            self.iter().map(|(k, v)| (k.clone(), v.to_value())).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Value::Map(entries)
    }
}

impl<T: FromValue> FromValue for HashMap<String, T> {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        map_entries(value)?
            .into_iter()
            .map(|(k, v)| T::from_value(v).map(|v| (k, v)))
            .collect()
    }
}

fn map_entries(value: Value) -> Result<Vec<(String, Value)>, AccessError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Map(entries) => Ok(entries),
        other => Err(AccessError::expected("map", &other)),
    }
}
