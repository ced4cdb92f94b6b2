#![allow(missing_docs)]

use serde_json::json;
use serialize_error::graph::{Accessor, Heap, ObjectId, Prototype, Record, Visibility};
use serialize_error::{Error, ErrorCodec, Result, Value, deserialize_error, serialize_error};

fn from_json(heap: &mut Heap, json: serde_json::Value) -> Result<ObjectId> {
    ErrorCodec::builder().from_json(heap, &json)
}

fn non_error_message(value: Value) -> Result<String> {
    let mut heap = Heap::new();
    let id = deserialize_error(&mut heap, &value)?;
    let record = heap.record_of(id)?;
    assert_eq!(record.prototype(), Prototype::NonError);
    assert_eq!(record.name(), Some("NonError"));
    Ok(record.message().unwrap_or_default().to_string())
}

// --- NON-ERRORS ---

#[test]
fn test_primitives_become_non_errors() -> Result<()> {
    assert_eq!(non_error_message(Value::Null)?, "null");
    assert_eq!(non_error_message(Value::from(1))?, "1");
    assert_eq!(non_error_message(Value::from(true))?, "true");
    assert_eq!(non_error_message(Value::from("123"))?, r#""123""#);
    assert_eq!(non_error_message(Value::Undefined)?, "");
    Ok(())
}

#[test]
fn test_big_integers_fall_back_to_plain_text() -> Result<()> {
    assert_eq!(non_error_message(Value::BigInt(42))?, "42");
    Ok(())
}

#[test]
fn test_arrays_become_non_errors() -> Result<()> {
    let mut heap = Heap::new();
    let list = heap.array(vec![Value::from(1)]);
    let id = deserialize_error(&mut heap, &Value::Object(list))?;

    let record = heap.record_of(id)?;
    assert_eq!(record.message(), Some("[1]"));
    assert_eq!(record.stack(), Some("NonError: [1]"));
    assert!(record.properties().keys().is_empty());
    Ok(())
}

#[test]
fn test_cyclic_arrays_use_plain_text() -> Result<()> {
    let mut heap = Heap::new();
    let list = heap.array(vec![Value::from(1)]);
    heap.push(list, list)?;
    let id = deserialize_error(&mut heap, &Value::Object(list))?;

    assert_eq!(heap.record_of(id)?.message(), Some("1,"));
    Ok(())
}

#[test]
fn test_functions_become_empty_non_errors() -> Result<()> {
    let mut heap = Heap::new();
    let f = heap.function(Some("f"));
    let id = deserialize_error(&mut heap, &Value::Object(f))?;

    let record = heap.record_of(id)?;
    assert_eq!(record.message(), Some(""));
    assert_eq!(record.stack(), Some("NonError"));
    Ok(())
}

#[test]
fn test_non_error_serializes_with_its_name() -> Result<()> {
    let mut heap = Heap::new();
    let id = deserialize_error(&mut heap, &Value::from("oops"))?;

    assert_eq!(
        serialize_error(&heap, &Value::Object(id))?.to_json()?,
        json!({
            "name": "NonError",
            "message": "\"oops\"",
            "stack": "NonError: \"oops\"",
        })
    );
    Ok(())
}

// --- ERRORS ---

#[test]
fn test_errors_pass_through() -> Result<()> {
    let mut heap = Heap::new();
    let err = heap.error("foo");
    heap.set(err, "extra", "kept")?;
    let objects = heap.len();

    let id = deserialize_error(&mut heap, &Value::Object(err))?;
    assert_eq!(id, err);
    assert_eq!(heap.len(), objects);
    Ok(())
}

#[test]
fn test_plain_object_becomes_error() -> Result<()> {
    let mut heap = Heap::new();
    let id = from_json(
        &mut heap,
        json!({
            "name": "TypeError",
            "message": "bad input",
            "stack": "at <anonymous>:1:13",
            "code": "E_BAD",
        }),
    )?;

    let record = heap.record_of(id)?;
    assert_eq!(record.prototype(), Prototype::Error);
    assert_eq!(record.name(), Some("TypeError"));
    assert_eq!(record.message(), Some("bad input"));
    assert_eq!(record.stack(), Some("at <anonymous>:1:13"));
    assert_eq!(record.get_str("code"), Some("E_BAD"));
    assert_eq!(record.properties().keys(), ["code"]);
    Ok(())
}

#[test]
fn test_missing_fields_take_defaults() -> Result<()> {
    let mut heap = Heap::new();
    let id = from_json(&mut heap, json!({}))?;

    let record = heap.record_of(id)?;
    assert_eq!(record.name(), Some("Error"));
    assert_eq!(record.message(), Some(""));
    assert_eq!(record.stack(), Some("Error"));
    assert!(record.properties().keys().is_empty());
    Ok(())
}

#[test]
fn test_custom_properties_are_preserved() -> Result<()> {
    let mut heap = Heap::new();
    let id = from_json(
        &mut heap,
        json!({ "message": "m", "details": { "status": 502, "retry": [1, 2] }, "fatal": false }),
    )?;

    let record = heap.record_of(id)?;
    assert_eq!(record.properties().keys(), ["details", "fatal"]);

    let json = serialize_error(&heap, &Value::Object(id))?.to_json()?;
    assert_eq!(json["details"], json!({ "status": 502, "retry": [1, 2] }));
    assert_eq!(json["fatal"], false);
    Ok(())
}

#[test]
fn test_visibility_follows_key_defaults() -> Result<()> {
    let mut heap = Heap::new();
    let source = heap.object();
    heap.set(source, "message", "visible on input")?;
    heap.define(source, "code", "E_HIDDEN", Visibility::Hidden)?;
    heap.define(source, "secret", "dropped", Visibility::Hidden)?;

    let id = deserialize_error(&mut heap, &Value::Object(source))?;
    let record = heap.record_of(id)?;

    // `message` is hidden again, `code` is surfaced, plain hidden keys are left behind.
    assert_eq!(record.message(), Some("visible on input"));
    assert_eq!(record.properties().keys(), ["code"]);
    assert_eq!(record.get_str("secret"), None);
    Ok(())
}

#[test]
fn test_nested_cycles_are_broken() -> Result<()> {
    let mut heap = Heap::new();
    let source = heap.object();
    heap.set(source, "message", "loop")?;
    heap.set(source, "self", source)?;

    let id = deserialize_error(&mut heap, &Value::Object(source))?;
    let record = heap.record_of(id)?;
    assert_eq!(record.get_str("self"), Some("[Circular]"));
    Ok(())
}

#[test]
fn test_failing_getter_propagates() -> Result<()> {
    let mut heap = Heap::new();
    let source = heap.object();
    heap.define_accessor(
        source,
        "message",
        Accessor::new(|| Err("no message today".into())),
        Visibility::Visible,
    )?;

    let result = deserialize_error(&mut heap, &Value::Object(source));
    assert!(matches!(result, Err(Error::Access { key, .. }) if key == "message"));
    Ok(())
}

#[test]
fn test_round_trip_through_json_text() -> Result<()> {
    let mut heap = Heap::new();
    let err = heap.error("shipped");
    heap.set(err, "code", "E_WIRE")?;
    heap.set(err, "self", err)?;

    let text = serialize_error(&heap, &Value::Object(err))?.to_json_string()?;
    let json: serde_json::Value = serde_json::from_str(&text)?;

    let mut remote = Heap::new();
    let id = from_json(&mut remote, json)?;
    let record = remote.record_of(id)?;
    assert_eq!(record.name(), Some("Error"));
    assert_eq!(record.message(), Some("shipped"));
    assert_eq!(record.stack(), Some("Error: shipped"));
    assert_eq!(record.get_str("code"), Some("E_WIRE"));
    assert_eq!(record.get_str("self"), Some("[Circular]"));
    Ok(())
}

#[test]
fn test_prepared_records_keep_prototype() -> Result<()> {
    let mut heap = Heap::new();
    let mut record = Record::new(Prototype::NonError);
    record.define("message", Value::from("already wrapped"), Visibility::Hidden);
    let id = heap.record(record);

    assert_eq!(deserialize_error(&mut heap, &Value::Object(id))?, id);
    Ok(())
}
