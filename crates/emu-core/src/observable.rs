//! Observability trait for inspecting component state.
//!
//! Queries never affect emulation state.

use std::fmt;

/// A dynamically-typed value for state queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "value"))]
pub enum Value {
    /// A single flag.
    Bool(bool),
    /// 8-bit register or memory byte.
    U8(u8),
    /// 16-bit address.
    U16(u16),
    /// Counter.
    U64(u64),
}

impl Value {
    /// The value as a byte, if it is one.
    #[must_use]
    pub const fn as_u8(self) -> Option<u8> {
        match self {
            Value::U8(v) => Some(v),
            _ => None,
        }
    }

    /// The value as an address, if it is one.
    #[must_use]
    pub const fn as_u16(self) -> Option<u16> {
        match self {
            Value::U16(v) => Some(v),
            _ => None,
        }
    }

    /// The value as a flag, if it is one.
    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "${v:02X}"),
            Value::U16(v) => write!(f, "${v:04X}"),
            Value::U64(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::U16(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

/// A component whose state can be inspected.
pub trait Observable {
    /// Query a specific property by path.
    ///
    /// Paths are flat names or dotted groups:
    /// - `pc` - Program counter
    /// - `a` - Accumulator
    /// - `flags.z` - Zero flag
    ///
    /// Returns `None` if the path is not recognised.
    fn query(&self, path: &str) -> Option<Value>;

    /// List all available query paths.
    fn query_paths(&self) -> &'static [&'static str];

    /// Query every path in `query_paths`, in order.
    fn snapshot(&self) -> Vec<(&'static str, Value)> {
        self.query_paths()
            .iter()
            .filter_map(|&path| self.query(path).map(|v| (path, v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        ticks: u64,
        carry: bool,
    }

    impl Observable for Counter {
        fn query(&self, path: &str) -> Option<Value> {
            match path {
                "ticks" => Some(self.ticks.into()),
                "carry" => Some(self.carry.into()),
                _ => None,
            }
        }

        fn query_paths(&self) -> &'static [&'static str] {
            &["ticks", "carry", "missing"]
        }
    }

    #[test]
    fn display_uses_hex_for_registers() {
        assert_eq!(Value::U8(0x0A).to_string(), "$0A");
        assert_eq!(Value::U16(0x8000).to_string(), "$8000");
        assert_eq!(Value::U64(12).to_string(), "12");
        assert_eq!(Value::Bool(true).to_string(), "true");
    }

    #[test]
    fn snapshot_skips_unknown_paths() {
        let c = Counter {
            ticks: 3,
            carry: true,
        };
        assert_eq!(
            c.snapshot(),
            vec![("ticks", Value::U64(3)), ("carry", Value::Bool(true))]
        );
    }

    #[test]
    fn typed_accessors() {
        assert_eq!(Value::U8(7).as_u8(), Some(7));
        assert_eq!(Value::U8(7).as_u16(), None);
        assert_eq!(Value::U16(0x1234).as_u16(), Some(0x1234));
        assert_eq!(Value::Bool(false).as_bool(), Some(false));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn value_serializes_tagged() {
        let json = serde_json::to_string(&Value::U8(0x42)).unwrap();
        assert_eq!(json, r#"{"type":"U8","value":66}"#);
    }
}
