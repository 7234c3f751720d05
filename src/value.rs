use std::{fmt, str::FromStr};

/// A single column value read from a result set.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Unsigned(u64),
    Real(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Unsigned(v) => write!(f, "{v}"),
            Value::Real(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::Bytes(v) => f.write_str(&String::from_utf8_lossy(v)),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Writes a value as a SQL literal into the statement being built.
///
/// Any `Fn(&Value, &mut String)` closure is a renderer as well, so callers can
/// plug in their own quoting rules.
pub trait RenderValue: Send + Sync {
    fn render(&self, value: &Value, out: &mut String);
}

impl<F> RenderValue for F
where
    F: Fn(&Value, &mut String) + Send + Sync,
{
    fn render(&self, value: &Value, out: &mut String) {
        self(value, out)
    }
}

/// Single-quoted literal with embedded quotes doubled. `NULL` stays bare.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapedLiteral;

impl RenderValue for EscapedLiteral {
    fn render(&self, value: &Value, out: &mut String) {
        if value.is_null() {
            out.push_str("NULL");
            return;
        }
        out.push('\'');
        for c in value.to_string().chars() {
            if c == '\'' {
                out.push('\'');
            }
            out.push(c);
        }
        out.push('\'');
    }
}

/// Every value wrapped in single quotes as-is, null included (as `''`).
///
/// Nothing is escaped, so a value holding a quote produces broken SQL.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimLiteral;

impl RenderValue for VerbatimLiteral {
    fn render(&self, value: &Value, out: &mut String) {
        out.push('\'');
        if !value.is_null() {
            out.push_str(&value.to_string());
        }
        out.push('\'');
    }
}

/// Literal quoting policy selectable from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Quoting {
    #[default]
    Escaped,
    Verbatim,
}

impl Quoting {
    pub fn renderer(self) -> Box<dyn RenderValue> {
        match self {
            Quoting::Escaped => Box::new(EscapedLiteral),
            Quoting::Verbatim => Box::new(VerbatimLiteral),
        }
    }
}

impl FromStr for Quoting {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "escaped" => Ok(Quoting::Escaped),
            "verbatim" => Ok(Quoting::Verbatim),
            other => Err(anyhow::anyhow!("Invalid quoting: {}", other)),
        }
    }
}

impl fmt::Display for Quoting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quoting::Escaped => f.write_str("escaped"),
            Quoting::Verbatim => f.write_str("verbatim"),
        }
    }
}
