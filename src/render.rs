//! Text renderings of graph values, used for `NonError` messages.
//!
//! [`json_text`] follows `JSON.stringify`: it fails on cycles and big integers and has no
//! output for `undefined`, symbols and callables. [`plain_text`] follows `String(value)` and
//! only fails when a getter it has to run fails.

use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{Heap, Object, ObjectId, Record};
use crate::value::Value;

/// Largest integer a double represents exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Message for a wrapped non-error: its JSON text, falling back to plain text.
pub(crate) fn non_error_message(heap: &Heap, value: &Value) -> Result<String> {
    match json_text(heap, value) {
        Ok(Some(text)) => Ok(text),
        Ok(None) => Ok(String::new()),
        Err(err) => {
            debug!(%err, "no JSON text, falling back to plain text");
            plain_text(heap, value)
        }
    }
}

/// JSON text of a value. `Ok(None)` when the value has no JSON representation.
///
/// # Errors
/// [`Error::Serialization`] for cycles and big integers, [`Error::Access`] when a getter
/// fails.
pub fn json_text(heap: &Heap, value: &Value) -> Result<Option<String>> {
    let mut stack = Vec::new();
    match to_json(heap, value, &mut stack)? {
        Some(json) => Ok(Some(serde_json::to_string(&json)?)),
        None => Ok(None),
    }
}

fn to_json(
    heap: &Heap,
    value: &Value,
    stack: &mut Vec<ObjectId>,
) -> Result<Option<serde_json::Value>> {
    let json = match value {
        Value::Undefined | Value::Symbol(_) => return Ok(None),
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => number_to_json(*n),
        Value::BigInt(_) => {
            return Err(Error::Serialization(
                "big integers have no JSON representation".into(),
            ));
        }
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Object(id) => {
            let object = heap.get(*id)?;
            if object.is_callable() {
                return Ok(None);
            }
            if stack.contains(id) {
                return Err(Error::Serialization(format!(
                    "converting circular structure to JSON at {id}"
                )));
            }
            stack.push(*id);
            let json = match object {
                Object::Array(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    for item in items {
                        out.push(to_json(heap, item, stack)?.unwrap_or(serde_json::Value::Null));
                    }
                    serde_json::Value::Array(out)
                }
                Object::Record(record) => {
                    let mut map = serde_json::Map::new();
                    for property in record.properties().visible() {
                        let value = property.read()?;
                        if let Some(json) = to_json(heap, &value, stack)? {
                            map.insert(property.key().to_string(), json);
                        }
                    }
                    serde_json::Value::Object(map)
                }
                Object::Function(_) => serde_json::Value::Null,
            };
            stack.pop();
            json
        }
    };
    Ok(Some(json))
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

/// Plain-text rendering of a value.
///
/// # Errors
/// [`Error::Access`] when an error record's `name` or `message` getter fails.
pub fn plain_text(heap: &Heap, value: &Value) -> Result<String> {
    let mut stack = Vec::new();
    text(heap, value, &mut stack)
}

fn text(heap: &Heap, value: &Value, stack: &mut Vec<ObjectId>) -> Result<String> {
    Ok(match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(*n),
        Value::BigInt(i) => i.to_string(),
        Value::String(s) => s.clone(),
        Value::Symbol(desc) => format!("Symbol({})", desc.as_deref().unwrap_or_default()),
        Value::Object(id) => match heap.get(*id)? {
            Object::Function(function) => {
                format!("function {}() {{ [native code] }}", function.name().unwrap_or_default())
            }
            Object::Array(items) => {
                // Joining skips arrays already being joined.
                if stack.contains(id) {
                    return Ok(String::new());
                }
                stack.push(*id);
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    parts.push(if item.is_nullish() {
                        String::new()
                    } else {
                        text(heap, item, stack)?
                    });
                }
                stack.pop();
                parts.join(",")
            }
            Object::Record(record) if record.prototype().is_error() => {
                error_text(heap, record, stack)?
            }
            Object::Record(_) => "[object Object]".to_string(),
        },
    })
}

fn error_text(heap: &Heap, record: &Record, stack: &mut Vec<ObjectId>) -> Result<String> {
    let name = match record.read("name")? {
        None | Some(Value::Undefined) => "Error".to_string(),
        Some(value) => text(heap, &value, stack)?,
    };
    let message = match record.read("message")? {
        None | Some(Value::Undefined) => String::new(),
        Some(value) => text(heap, &value, stack)?,
    };
    Ok(match (name.is_empty(), message.is_empty()) {
        (true, _) => message,
        (false, true) => name,
        (false, false) => format!("{name}: {message}"),
    })
}

/// Number formatting matching `String(number)`.
fn number_text(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{n}");
    }
    // Exponent form carries an explicit sign: 1e+21, 1e-7.
    let formatted = format!("{n:e}");
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => formatted,
    }
}
