use crate::value::Value;

/// Map a driver column value to a [`Value`]
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl ToValue for mysql_async::Value {
    fn to_value(&self) -> Value {
        match self {
            mysql_async::Value::NULL => Value::Null,
            mysql_async::Value::Bytes(bytes) => match String::from_utf8(bytes.clone()) {
                Ok(text) => Value::Text(text),
                Err(_) => Value::Bytes(bytes.clone()),
            },
            mysql_async::Value::Int(v) => Value::Integer(*v),
            mysql_async::Value::UInt(v) => Value::Unsigned(*v),
            mysql_async::Value::Float(v) => Value::Real(f64::from(*v)),
            mysql_async::Value::Double(v) => Value::Real(*v),
            mysql_async::Value::Date(year, month, day, hour, minute, second, micros) => {
                let mut text = format!("{year:04}-{month:02}-{day:02}");
                if (*hour, *minute, *second, *micros) != (0, 0, 0, 0) {
                    text.push_str(&format!(" {hour:02}:{minute:02}:{second:02}"));
                    if *micros > 0 {
                        text.push_str(&format!(".{micros:06}"));
                    }
                }
                Value::Text(text)
            }
            mysql_async::Value::Time(negative, days, hours, minutes, seconds, micros) => {
                let sign = if *negative { "-" } else { "" };
                let hours = u32::from(*hours) + days * 24;
                let mut text = format!("{sign}{hours:02}:{minutes:02}:{seconds:02}");
                if *micros > 0 {
                    text.push_str(&format!(".{micros:06}"));
                }
                Value::Text(text)
            }
        }
    }
}

impl ToValue for rusqlite::types::ValueRef<'_> {
    fn to_value(&self) -> Value {
        match self {
            rusqlite::types::ValueRef::Null => Value::Null,
            rusqlite::types::ValueRef::Integer(v) => Value::Integer(*v),
            rusqlite::types::ValueRef::Real(v) => Value::Real(*v),
            rusqlite::types::ValueRef::Text(text) => {
                Value::Text(String::from_utf8_lossy(text).into_owned())
            }
            rusqlite::types::ValueRef::Blob(blob) => Value::Bytes(blob.to_vec()),
        }
    }
}

/// The simple query protocol hands every value over as text.
impl ToValue for Option<&str> {
    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}
