//! Defines the `ToGraph` trait for building object graphs from Rust values.
//!
//! This lets typed error payloads be placed into a [`Heap`] and then go through the same
//! serializer as hand-built graphs. `#[derive(ToGraph)]` implements it for structs with
//! named fields.

use crate::graph::Heap;
use crate::value::Value;

/// A trait for types that can place themselves into a [`Heap`].
///
/// Primitives return a primitive [`Value`]; composites allocate in the heap and return a
/// handle. Every call allocates fresh objects, so the resulting graph is a tree unless an
/// implementation links handles on purpose.
pub trait ToGraph {
    /// Converts `self` into a value, allocating composites in `heap`.
    fn to_graph(&self, heap: &mut Heap) -> Value;
}
