//! The object graph the codec walks.
//!
//! Composites (records, arrays, functions) live in a [`Heap`] arena and are referenced by
//! [`ObjectId`] handles, so self-referential and shared structures need no reference
//! counting and identity is plain handle equality.

/// Defines the `Heap` arena.
pub mod core;
/// Defines the `ObjectId` handle.
pub mod id;
/// Defines records, arrays, functions and their properties.
pub mod object;

pub use self::core::Heap;
pub use id::ObjectId;
pub use object::{
    Accessor, Function, Object, Properties, Property, Prototype, Record, Slot, Visibility,
};
