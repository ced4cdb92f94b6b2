#![allow(missing_docs)]

use serde_json::json;
use serialize_error::graph::{Accessor, Heap, Visibility};
use serialize_error::{Error, ErrorCodec, Plain, Result, Value, serialize_error};

fn to_json(heap: &Heap, value: impl Into<Value>) -> Result<serde_json::Value> {
    serialize_error(heap, &value.into())?.to_json()
}

// --- MAIN KEYS ---

#[test]
fn test_main_keys_are_copied() -> Result<()> {
    let mut heap = Heap::new();
    let err = heap.error("foo");

    let plain = serialize_error(&heap, &Value::Object(err))?;
    assert_eq!(plain["name"], "Error");
    assert_eq!(plain["message"], "foo");
    assert_eq!(plain["stack"], "Error: foo");

    // Visible on the output even though they are hidden on the input.
    let keys = plain.as_object().map(|o| o.keys()).unwrap_or_default();
    assert_eq!(keys, ["name", "message", "stack"]);
    Ok(())
}

#[test]
fn test_custom_properties_and_code() -> Result<()> {
    let mut heap = Heap::new();
    let err = heap.error("boom");
    heap.set(err, "code", "E_BOOM")?;
    heap.set(err, "retries", 3)?;
    heap.set(err, "fatal", true)?;

    assert_eq!(
        to_json(&heap, err)?,
        json!({
            "code": "E_BOOM",
            "retries": 3,
            "fatal": true,
            "name": "Error",
            "message": "boom",
            "stack": "Error: boom",
        })
    );
    Ok(())
}

#[test]
fn test_non_string_reserved_keys_are_not_forced() -> Result<()> {
    let mut heap = Heap::new();
    let err = heap.error("x");
    heap.set(err, "code", 404)?;
    heap.define(err, "name", 7, Visibility::Hidden)?;

    let plain = serialize_error(&heap, &Value::Object(err))?;
    // A visible numeric code is copied by the entry loop.
    assert_eq!(plain["code"], Plain::Number(404.0));
    // A hidden numeric name is neither enumerated nor forced visible.
    assert!(!plain.as_object().is_some_and(|o| o.contains_key("name")));
    Ok(())
}

// --- CYCLES ---

#[test]
fn test_self_reference_collapses() -> Result<()> {
    let mut heap = Heap::new();
    let err = heap.error("🦄");
    heap.set(err, "self", err)?;

    assert_eq!(to_json(&heap, err)?["self"], json!("[Circular]"));
    Ok(())
}

#[test]
fn test_deep_cycle_collapses() -> Result<()> {
    let mut heap = Heap::new();
    let root = heap.object();
    let a = heap.object();
    let b = heap.object();
    heap.set(root, "a", a)?;
    heap.set(a, "b", b)?;
    heap.set(b, "root", root)?;
    heap.set(b, "a", a)?;

    assert_eq!(
        to_json(&heap, root)?,
        json!({ "a": { "b": { "root": "[Circular]", "a": "[Circular]" } } })
    );
    Ok(())
}

#[test]
fn test_shared_references_are_not_cycles() -> Result<()> {
    let mut heap = Heap::new();
    let shared = heap.object();
    heap.set(shared, "x", 1)?;
    let root = heap.object();
    heap.set(root, "left", shared)?;
    heap.set(root, "right", shared)?;
    let list = heap.array(vec![Value::Object(shared), Value::Object(shared)]);
    heap.set(root, "list", list)?;

    assert_eq!(
        to_json(&heap, root)?,
        json!({
            "left": { "x": 1 },
            "right": { "x": 1 },
            "list": [{ "x": 1 }, { "x": 1 }],
        })
    );
    Ok(())
}

#[test]
fn test_only_ancestors_become_sentinels() -> Result<()> {
    // a.b.c = a, a.d = b: `d` is a sibling reference to `b`, not a cycle.
    let mut heap = Heap::new();
    let a = heap.object();
    let b = heap.object();
    heap.set(a, "b", b)?;
    heap.set(b, "c", a)?;
    heap.set(a, "d", b)?;

    assert_eq!(
        to_json(&heap, a)?,
        json!({ "b": { "c": "[Circular]" }, "d": { "c": "[Circular]" } })
    );
    Ok(())
}

#[test]
fn test_array_cycles() -> Result<()> {
    let mut heap = Heap::new();

    // x = [1]; x[1] = x
    let x = heap.array(vec![Value::from(1)]);
    heap.set_index(x, 1, x)?;
    assert_eq!(to_json(&heap, x)?, json!([1, "[Circular]"]));

    // y = [[1]]; y[0][1] = y
    let inner = heap.array(vec![Value::from(1)]);
    let y = heap.array(vec![Value::Object(inner)]);
    heap.set_index(inner, 1, y)?;
    assert_eq!(to_json(&heap, y)?, json!([[1, "[Circular]"]]));

    // z = [[1]]; z[0][1] = z[0]
    let inner = heap.array(vec![Value::from(1)]);
    let z = heap.array(vec![Value::Object(inner)]);
    heap.set_index(inner, 1, inner)?;
    assert_eq!(to_json(&heap, z)?, json!([[1, "[Circular]"]]));
    Ok(())
}

#[test]
fn test_does_not_mutate_input() -> Result<()> {
    let mut heap = Heap::new();
    let err = heap.error("foo");
    heap.set(err, "self", err)?;
    let list = heap.array(vec![Value::Object(err)]);
    heap.set(err, "list", list)?;

    let before = format!("{heap:?}");
    serialize_error(&heap, &Value::Object(err))?;
    assert_eq!(format!("{heap:?}"), before);
    Ok(())
}

// --- CALLABLES ---

#[test]
fn test_top_level_function() -> Result<()> {
    let mut heap = Heap::new();
    let named = heap.function(Some("a"));
    let anonymous = heap.function(None);

    assert_eq!(serialize_error(&heap, &named.into())?, "[Function: a]");
    assert_eq!(serialize_error(&heap, &anonymous.into())?, "[Function: anonymous]");
    Ok(())
}

#[test]
fn test_nested_functions_are_dropped() -> Result<()> {
    let mut heap = Heap::new();
    let f = heap.function(Some("a"));
    let root = heap.object();
    heap.set(root, "a", f)?;
    let inner = heap.object();
    heap.set(inner, "b", f)?;
    heap.set(root, "inner", inner)?;

    let plain = serialize_error(&heap, &Value::Object(root))?;
    assert!(!plain.as_object().is_some_and(|o| o.contains_key("a")));
    assert_eq!(plain.to_json()?, json!({ "inner": {} }));
    Ok(())
}

#[test]
fn test_functions_in_arrays_leave_undefined() -> Result<()> {
    let mut heap = Heap::new();
    let f = heap.function(None);
    let list = heap.array(vec![Value::from("a"), Value::Object(f), Value::from("b")]);

    let plain = serialize_error(&heap, &Value::Object(list))?;
    assert_eq!(plain[1], Plain::Undefined);
    assert_eq!(plain.to_json()?, json!(["a", null, "b"]));
    Ok(())
}

#[test]
fn test_trailing_functions_in_arrays_are_dropped() -> Result<()> {
    let mut heap = Heap::new();
    let f = heap.function(None);
    let tail = heap.array(vec![Value::from(1), Value::Object(f)]);
    let only = heap.array(vec![Value::Object(f)]);

    assert_eq!(to_json(&heap, tail)?, json!([1]));
    assert_eq!(to_json(&heap, only)?, json!([]));
    Ok(())
}

// --- ACCESSORS ---

#[test]
fn test_hidden_accessors_are_not_invoked() -> Result<()> {
    let mut heap = Heap::new();
    let err = heap.error("outer");
    let nested = heap.object();
    heap.define_accessor(
        nested,
        "secret",
        Accessor::new(|| Err("should not run".into())),
        Visibility::Hidden,
    )?;
    heap.set(nested, "ok", true)?;
    heap.set(err, "nested", nested)?;

    assert_eq!(to_json(&heap, err)?["nested"], json!({ "ok": true }));
    Ok(())
}

#[test]
fn test_visible_accessors_are_read() -> Result<()> {
    let mut heap = Heap::new();
    let root = heap.object();
    heap.define_accessor(
        root,
        "computed",
        Accessor::new(|| Ok(Value::from("value"))),
        Visibility::Visible,
    )?;

    assert_eq!(to_json(&heap, root)?, json!({ "computed": "value" }));
    Ok(())
}

#[test]
fn test_failing_accessor_propagates() -> Result<()> {
    let mut heap = Heap::new();
    let root = heap.object();
    heap.define_accessor(
        root,
        "bad",
        Accessor::new(|| Err("getter exploded".into())),
        Visibility::Visible,
    )?;

    let result = serialize_error(&heap, &Value::Object(root));
    assert_eq!(
        result,
        Err(Error::Access {
            key: "bad".into(),
            message: "getter exploded".into()
        })
    );
    Ok(())
}

// --- NESTING ---

#[test]
fn test_nested_errors_keep_their_fields() -> Result<()> {
    let mut heap = Heap::new();
    let outer = heap.error("outer");
    let inner = heap.error("inner");
    heap.set(inner, "code", "E_INNER")?;
    heap.set(outer, "cause", inner)?;

    assert_eq!(
        to_json(&heap, outer)?["cause"],
        json!({
            "code": "E_INNER",
            "name": "Error",
            "message": "inner",
            "stack": "Error: inner",
        })
    );
    Ok(())
}

#[derive(Debug)]
struct RequestFailed(std::io::Error);

impl std::fmt::Display for RequestFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("request failed")
    }
}

impl std::error::Error for RequestFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

#[test]
fn test_captured_rust_error_chain() -> Result<()> {
    let err = RequestFailed(std::io::Error::other("connection reset"));

    let mut heap = Heap::new();
    let id = heap.capture_error(&err);
    let json = to_json(&heap, id)?;
    assert_eq!(json["name"], "Error");
    assert_eq!(json["message"], "request failed");
    assert_eq!(json["stack"], "Error: request failed\n    caused by: connection reset");
    assert_eq!(json["cause"]["message"], "connection reset");
    assert_eq!(json["cause"]["stack"], "Error: connection reset");
    Ok(())
}

// --- PRIMITIVES ---

#[test]
fn test_primitives_pass_through() -> Result<()> {
    let heap = Heap::new();
    assert_eq!(serialize_error(&heap, &Value::Null)?, Plain::Null);
    assert_eq!(serialize_error(&heap, &Value::from(42))?, Plain::Number(42.0));
    assert_eq!(serialize_error(&heap, &Value::from("x"))?, "x");
    assert_eq!(serialize_error(&heap, &Value::Undefined)?, Plain::Undefined);
    assert_eq!(serialize_error(&heap, &Value::BigInt(1 << 70))?, Plain::BigInt(1 << 70));
    Ok(())
}

#[test]
fn test_foreign_handle_is_rejected() {
    let mut other = Heap::new();
    other.object();
    let foreign = other.object();

    let heap = Heap::new();
    assert_eq!(
        serialize_error(&heap, &Value::Object(foreign)),
        Err(Error::InvalidHandle(foreign))
    );
}

// --- ROUND TRIPS ---

#[test]
fn test_serializing_twice_is_stable() -> Result<()> {
    let mut heap = Heap::new();
    let err = heap.error("again");
    heap.set(err, "self", err)?;
    heap.set(err, "code", "E_AGAIN")?;

    let first = serialize_error(&heap, &Value::Object(err))?;
    let imported = heap.import(&first);
    let second = serialize_error(&heap, &imported)?;
    assert_eq!(first.to_json()?, second.to_json()?);
    Ok(())
}

#[test]
fn test_depth_guard() -> Result<()> {
    let mut heap = Heap::new();
    let root = heap.object();
    let mut current = root;
    for _ in 0..10 {
        let next = heap.object();
        heap.set(current, "next", next)?;
        current = next;
    }

    let codec = ErrorCodec::builder().max_depth(10);
    assert!(codec.serialize(&heap, &Value::Object(root)).is_ok());

    let codec = ErrorCodec::builder().max_depth(9);
    assert_eq!(
        codec.serialize(&heap, &Value::Object(root)),
        Err(Error::DepthExceeded { limit: 9 })
    );
    Ok(())
}
