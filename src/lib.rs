//! # serialize-error
//!
//! Convert error values into plain, JSON-compatible data and back, without losing custom
//! diagnostic fields and without tripping over cyclic object graphs.
//!
//! ## Overview
//!
//! Errors regularly have to cross boundaries that only understand plain data: log lines,
//! IPC messages, persisted records, HTTP responses. The interesting errors are rarely flat.
//! They carry custom fields, nested causes, and sometimes references back to the object
//! that produced them. This crate walks such graphs safely:
//!
//! *   **Cycle Breaking:** a reference back to an ancestor on the current path is replaced
//!     with the string `"[Circular]"`. Objects merely shared between branches are copied
//!     in full on each branch.
//! *   **Diagnostic Fields:** `name`, `message` and `stack` are usually hidden on error
//!     objects. Serialization makes them visible so generic JSON consumers see them;
//!     deserialization hides them again.
//! *   **Non-Data Values:** callables are dropped from copies. A callable passed at the
//!     top level becomes `"[Function: <name>]"`.
//! *   **Thrown Non-Errors:** deserializing something that is not an object yields a
//!     `NonError` whose message is the JSON text of the value.
//! *   **No Mutation:** the input graph is only ever borrowed immutably.
//!
//! ## Architecture
//!
//! ### The Graph Model
//!
//! Composites (records, arrays, functions) live in a [`graph::Heap`] arena and are
//! referenced by [`graph::ObjectId`] handles. A [`Value`] is either a primitive or such a
//! handle, so cycles are simply handles pointing back up the graph and object identity is
//! handle equality. Each record property carries a [`graph::Visibility`] flag and may be an
//! accessor whose getter runs on read.
//!
//! ### The Engine
//!
//! The engine copies a composite depth-first into a [`Plain`] tree, threading the list of
//! ancestors along the current path. The copy is driven by [`ErrorCodec`] (or the free
//! functions [`serialize_error`] / [`deserialize_error`]), configured through
//! [`CodecOptions`].
//!
//! ### The Plain Side
//!
//! [`Plain`] owns its children and converts to `serde_json::Value` following the rules of
//! `JSON.stringify`. [`graph::Heap::import_json`] goes the other way.
//!
//! ## Usage Patterns
//!
//! ### Serializing
//!
//! ```rust
//! use serialize_error::graph::Heap;
//! use serialize_error::{Value, serialize_error};
//! use serde_json::json;
//!
//! let mut heap = Heap::new();
//! let err = heap.error("🦄");
//! heap.set(err, "code", "E_UNICORN")?;
//! heap.set(err, "self", err)?;
//!
//! let plain = serialize_error(&heap, &Value::Object(err))?;
//! assert_eq!(
//!     plain.to_json()?,
//!     json!({
//!         "code": "E_UNICORN",
//!         "self": "[Circular]",
//!         "name": "Error",
//!         "message": "🦄",
//!         "stack": "Error: 🦄",
//!     })
//! );
//! # Ok::<(), serialize_error::Error>(())
//! ```
//!
//! ### Deserializing
//!
//! ```rust
//! use serialize_error::graph::Heap;
//! use serialize_error::ErrorCodec;
//! use serde_json::json;
//!
//! let mut heap = Heap::new();
//! let id = ErrorCodec::builder().from_json(
//!     &mut heap,
//!     &json!({ "message": "aaa", "stack": "at <anonymous>:1:13", "code": "E1" }),
//! )?;
//!
//! let err = heap.record_of(id)?;
//! assert_eq!(err.name(), Some("Error"));
//! assert_eq!(err.message(), Some("aaa"));
//! assert_eq!(err.properties().keys(), ["code"]);
//! # Ok::<(), serialize_error::Error>(())
//! ```
//!
//! ### Typed Payloads
//!
//! ```rust
//! use serialize_error::graph::Heap;
//! use serialize_error::{ToGraph, serialize_error};
//!
//! #[derive(ToGraph)]
//! #[graph(error)]
//! struct QuotaExceeded {
//!     #[graph(hidden)]
//!     message: String,
//!     code: &'static str,
//!     limit: u64,
//! }
//!
//! let mut heap = Heap::new();
//! let value = QuotaExceeded { message: "too many calls".into(), code: "E_QUOTA", limit: 100 }
//!     .to_graph(&mut heap);
//!
//! let plain = serialize_error(&heap, &value)?;
//! assert_eq!(plain["limit"].to_json()?, 100);
//! assert_eq!(plain["name"], "Error");
//! # Ok::<(), serialize_error::Error>(())
//! ```
//!
//! ## Safety and Error Handling
//!
//! * **No Unsafe:** `unsafe` code is denied crate-wide.
//! * **No Panics:** no `unwrap()` or `panic!()` calls in the library (enforced by clippy lints).
//! * **Fails Outward:** a failing getter stops the walk with [`Error::Access`]; nothing is
//!   swallowed.
//! * **Thread Safety:** [`graph::Heap`] is `Send + Sync`; concurrent serializations of the
//!   same heap need no locking.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

// Lets the derive macro's `::serialize_error` paths resolve inside this crate too.
extern crate self as serialize_error;

// --- PUBLIC API MODULES ---
pub mod api;
pub mod error;
pub mod graph;
pub mod plain;
pub mod render;
pub mod value;
pub mod visitor;

// --- INTERNAL IMPLEMENTATION MODULES ---
mod engine;
mod visitor_impls;

// --- RE-EXPORTS ---

pub use api::{CodecOptions, ErrorCodec, deserialize_error, serialize_error};
pub use error::{Error, Result};
pub use plain::{CIRCULAR_SENTINEL, Plain, PlainField, PlainObject};
pub use value::Value;
pub use visitor::ToGraph;

// Re-export the derive macro so it is accessible as `serialize_error::ToGraph`
pub use serialize_error_derive::ToGraph;

/// Constants used throughout the library.
pub mod constants {
    pub use crate::plain::CIRCULAR_SENTINEL;

    /// Category name of the synthetic carrier for thrown non-error values.
    pub const NON_ERROR_NAME: &str = "NonError";
}
