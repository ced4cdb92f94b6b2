//! Centralized error handling for serialize-error.
//!
//! Converting errors into plain data is not supposed to fail, so the surface here is small.
//! A call either returns a complete result or reports why the walk had to stop:
//!
//! - **Access Errors** ([`Error::Access`]): an accessor property failed while being read.
//!   The failure is propagated as-is; there is no recovery for hostile getters.
//! - **Invalid Handles** ([`Error::InvalidHandle`], [`Error::NotARecord`],
//!   [`Error::NotAnArray`]): an [`ObjectId`] that does not belong to the
//!   [`Heap`](crate::graph::Heap) it was used with, or that names the wrong kind of object.
//! - **Depth Errors** ([`Error::DepthExceeded`]): the optional recursion guard configured in
//!   [`CodecOptions`](crate::CodecOptions) tripped.
//! - **Serialization Errors** ([`Error::Serialization`]): the plain-data boundary
//!   (`serde_json`) rejected a value.
//!
//! ## Usage
//!
//! ```rust
//! use serialize_error::graph::{Accessor, Heap, Visibility};
//! use serialize_error::{Error, Value, serialize_error};
//!
//! let mut heap = Heap::new();
//! let hostile = heap.object();
//! heap.define_accessor(
//!     hostile,
//!     "boom",
//!     Accessor::new(|| Err("getter exploded".to_string())),
//!     Visibility::Visible,
//! )?;
//!
//! match serialize_error(&heap, &Value::Object(hostile)) {
//!     Err(Error::Access { key, .. }) => assert_eq!(key, "boom"),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! # Ok::<(), serialize_error::Error>(())
//! ```

use std::fmt;

use crate::graph::ObjectId;

/// A specialized `Result` type for serialize-error operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The error enum covering every way a conversion can stop early.
///
/// The type is `Clone` so a failed conversion can be stored next to the record that
/// triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An accessor property failed while it was being read.
    Access {
        /// Key of the property whose getter failed.
        key: String,
        /// The failure reported by the getter.
        message: String,
    },

    /// A handle was used with a heap that does not own it.
    InvalidHandle(ObjectId),

    /// A keyed operation was applied to an array.
    NotARecord(ObjectId),

    /// An indexed operation was applied to something other than an array.
    NotAnArray(ObjectId),

    /// The walk went deeper than the configured `max_depth`.
    DepthExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// Conversion at the plain-data boundary failed.
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Access { key, message } => {
                write!(f, "Access Error: reading `{key}` failed: {message}")
            }
            Self::InvalidHandle(id) => write!(f, "Invalid Handle: {id} is not in this heap"),
            Self::NotARecord(id) => write!(f, "Invalid Handle: {id} is not a record or function"),
            Self::NotAnArray(id) => write!(f, "Invalid Handle: {id} is not an array"),
            Self::DepthExceeded { limit } => {
                write!(f, "Depth Error: graph is nested deeper than {limit} levels")
            }
            Self::Serialization(s) => write!(f, "Serialization Error: {s}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
