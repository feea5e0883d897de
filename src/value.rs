//! Data item values carried by decoded messages.
//!
//! Values model the SECS-II item families: lists, binary, booleans, ASCII
//! text, signed and unsigned integers, and floats. The wire widths (I1/I2/I4,
//! U1/U2/U4, F4/F8) are a codec concern; decoded values carry the widest
//! native representation.

use serde::{Deserialize, Serialize};

/// A decoded SECS-II data item.
///
/// # Examples
///
/// ```
/// use gemlink::Value;
///
/// let flag = Value::Bool(true);
/// let count = Value::UInt(12);
/// let name = Value::Ascii("PRESSURE".to_string());
///
/// assert!(flag.is_bool());
/// assert_eq!(count.as_u64(), Some(12));
/// assert_eq!(name.as_ascii(), Some("PRESSURE"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Ordered list of items (L).
    List(Vec<Value>),
    /// Raw bytes (B).
    Binary(Vec<u8>),
    /// Boolean (BOOLEAN).
    Bool(bool),
    /// ASCII text (A).
    Ascii(String),
    /// Signed integer (I1/I2/I4/I8).
    Int(i64),
    /// Unsigned integer (U1/U2/U4/U8).
    UInt(u64),
    /// Floating point (F4/F8).
    Float(f64),
}

impl Value {
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub const fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_))
    }

    pub const fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    pub const fn is_ascii(&self) -> bool {
        matches!(self, Self::Ascii(_))
    }

    pub const fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }

    pub const fn is_uint(&self) -> bool {
        matches!(self, Self::UInt(_))
    }

    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(v) => Some(v),
            _ => None,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_ascii(&self) -> Option<&str> {
        match self {
            Self::Ascii(v) => Some(v),
            _ => None,
        }
    }

    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Reads any non-negative integer representation as `u64`.
    ///
    /// Identifiers arrive as U or I items depending on the equipment vendor,
    /// so both families are accepted here.
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt(v) => Some(*v),
            #[allow(clippy::cast_sign_loss)]
            Self::Int(v) if *v >= 0 => Some(*v as u64),
            _ => None,
        }
    }

    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a human-readable type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Binary(_) => "binary",
            Self::Bool(_) => "bool",
            Self::Ascii(_) => "ascii",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List(v) => {
                write!(f, "<L[{}]", v.len())?;
                for item in v {
                    write!(f, " {item}")?;
                }
                write!(f, ">")
            }
            Self::Binary(v) => write!(f, "binary[{}]", v.len()),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Ascii(v) => write!(f, "{v:?}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

// Convenient From implementations
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::UInt(u64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Ascii(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Ascii(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Binary(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}
