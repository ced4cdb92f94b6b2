use serde::Deserialize;
use tracing::{debug, trace};

use crate::constants::NON_ERROR_NAME;
use crate::engine::{Walker, primitive};
use crate::error::Result;
use crate::graph::{Heap, Object, ObjectId, Prototype, Record, Visibility};
use crate::plain::{Plain, PlainObject};
use crate::render;
use crate::value::Value;

/// Default width at which the parallel mode fans out.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// The main entry point for converting errors to and from plain data.
#[derive(Debug)]
pub struct ErrorCodec;

impl ErrorCodec {
    /// Creates a builder to configure the conversion.
    pub fn builder() -> CodecOptions {
        CodecOptions::default()
    }

    /// Serializes with the default options. See [`CodecOptions::serialize`].
    pub fn serialize(heap: &Heap, value: &Value) -> Result<Plain> {
        CodecOptions::default().serialize(heap, value)
    }

    /// Deserializes with the default options. See [`CodecOptions::deserialize`].
    pub fn deserialize(heap: &mut Heap, value: &Value) -> Result<ObjectId> {
        CodecOptions::default().deserialize(heap, value)
    }
}

/// Conversion settings, used as a builder.
///
/// The struct deserializes from configuration files; missing fields take their defaults.
///
/// ```rust
/// use serialize_error::ErrorCodec;
/// use serialize_error::graph::Heap;
///
/// let mut heap = Heap::new();
/// let err = heap.error("🦄");
///
/// let plain = ErrorCodec::builder()
///     .max_depth(32)
///     .serialize(&heap, &err.into())?;
/// assert_eq!(plain["message"], "🦄");
/// # Ok::<(), serialize_error::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// How many composite levels below the root may be copied. `None` means unbounded.
    pub max_depth: Option<usize>,
    /// Copy the entries of wide composites on the rayon thread pool.
    /// Has no effect without the `parallel` feature.
    pub parallel: bool,
    /// Minimum number of entries before the parallel mode kicks in.
    pub parallel_threshold: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            parallel: false,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl CodecOptions {
    /// Limits nesting below the root. Deeper graphs fail with
    /// [`Error::DepthExceeded`](crate::Error::DepthExceeded).
    pub fn max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }

    /// Enables or disables parallel copying of wide composites.
    pub fn parallel(mut self, enable: bool) -> Self {
        self.parallel = enable;
        self
    }

    /// Sets the width at which parallel copying starts.
    pub fn parallel_threshold(mut self, width: usize) -> Self {
        self.parallel_threshold = width.max(1);
        self
    }

    /// Converts a value into plain data.
    ///
    /// - Composites are deep-copied. References back to an ancestor become `"[Circular]"`,
    ///   callables are dropped, and `name`, `message`, `stack` and `code` are written as
    ///   visible fields whenever they hold strings.
    /// - A top-level callable becomes `"[Function: <name>]"`.
    /// - Primitives are returned unchanged.
    ///
    /// The heap is not modified.
    ///
    /// # Errors
    /// Fails when an accessor fails, when `value` is a foreign handle, or when the depth
    /// guard trips.
    pub fn serialize(&self, heap: &Heap, value: &Value) -> Result<Plain> {
        let Value::Object(id) = value else {
            return Ok(primitive(value).unwrap_or_default());
        };

        if let Object::Function(function) = heap.get(*id)? {
            return Ok(Plain::String(format!(
                "[Function: {}]",
                function.display_name()
            )));
        }

        Walker::new(heap, self, true).copy(*id, &[])
    }

    /// Reconstructs an error from a value and returns its handle.
    ///
    /// - Error-like records are returned as-is (same handle).
    /// - Other records are copied onto a fresh `Error`. `name`, `message` and `stack` end
    ///   up hidden, everything else visible.
    /// - Anything else is wrapped in a `NonError` whose message is the JSON text of the
    ///   value, or its plain-text rendering when it has no JSON text.
    ///
    /// # Errors
    /// Fails when an accessor fails, when `value` is a foreign handle, or when the depth
    /// guard trips.
    pub fn deserialize(&self, heap: &mut Heap, value: &Value) -> Result<ObjectId> {
        if let Value::Object(id) = value {
            let object = heap.get(*id)?;
            if object.is_error() {
                trace!(object = %id, "already an error, passing through");
                return Ok(*id);
            }
            if let Object::Record(_) = object {
                let copied = Walker::new(heap, self, false).copy_into(*id, fresh_error())?;
                return Ok(heap.import_record(Prototype::Error, &copied));
            }
        }

        let message = render::non_error_message(heap, value)?;
        debug!(%message, "wrapping non-error value");
        Ok(heap.record(non_error(message)))
    }

    /// Serializes and converts the result to JSON in one step.
    ///
    /// # Errors
    /// See [`CodecOptions::serialize`] and [`Plain::to_json`].
    pub fn to_json(&self, heap: &Heap, value: &Value) -> Result<serde_json::Value> {
        self.serialize(heap, value)?.to_json()
    }

    /// Imports JSON received from a transport and deserializes it.
    ///
    /// # Errors
    /// See [`CodecOptions::deserialize`].
    pub fn from_json(&self, heap: &mut Heap, json: &serde_json::Value) -> Result<ObjectId> {
        let value = heap.import_json(json);
        self.deserialize(heap, &value)
    }
}

/// Own properties of a freshly constructed `Error`. `name` and `message` are inherited.
fn fresh_error() -> PlainObject {
    let mut target = PlainObject::new();
    target.define("stack", Plain::String("Error".to_string()), Visibility::Hidden);
    target
}

fn non_error(message: String) -> Record {
    let stack = if message.is_empty() {
        NON_ERROR_NAME.to_string()
    } else {
        format!("{NON_ERROR_NAME}: {message}")
    };
    let mut record = Record::new(Prototype::NonError);
    record.define("name", Value::from(NON_ERROR_NAME), Visibility::Hidden);
    record.define("message", Value::String(message), Visibility::Hidden);
    record.define("stack", Value::String(stack), Visibility::Hidden);
    record
}

/// Serializes `value` with the default options.
///
/// # Errors
/// See [`CodecOptions::serialize`].
pub fn serialize_error(heap: &Heap, value: &Value) -> Result<Plain> {
    ErrorCodec::serialize(heap, value)
}

/// Deserializes `value` with the default options.
///
/// # Errors
/// See [`CodecOptions::deserialize`].
pub fn deserialize_error(heap: &mut Heap, value: &Value) -> Result<ObjectId> {
    ErrorCodec::deserialize(heap, value)
}
