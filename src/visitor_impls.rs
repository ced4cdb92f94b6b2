//! `ToGraph` implementations for standard Rust types.
//!
//! Numbers that a double holds exactly become `Value::Number`; wider integers fall back to
//! `Value::BigInt`. Maps need string keys and become plain records in iteration order.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::sync::Arc;

use crate::graph::{Heap, Prototype, Record, Visibility};
use crate::plain::Plain;
use crate::value::Value;
use crate::visitor::ToGraph;

/// Largest integer magnitude a double represents exactly (2^53 - 1).
const MAX_SAFE_INTEGER: i128 = 9_007_199_254_740_991;

macro_rules! impl_exact_number {
    ($($t:ty),*) => {
        $(
            impl ToGraph for $t {
                fn to_graph(&self, _heap: &mut Heap) -> Value {
                    Value::Number(f64::from(*self))
                }
            }
        )*
    }
}

impl_exact_number!(u8, u16, u32, i8, i16, i32, f32, f64);

macro_rules! impl_wide_integer {
    ($($t:ty),*) => {
        $(
            impl ToGraph for $t {
                fn to_graph(&self, _heap: &mut Heap) -> Value {
                    integer(i128::try_from(*self).ok(), *self as f64)
                }
            }
        )*
    }
}

fn integer(exact: Option<i128>, approx: f64) -> Value {
    match exact {
        Some(n) if n.unsigned_abs() <= MAX_SAFE_INTEGER.unsigned_abs() => Value::Number(n as f64),
        Some(n) => Value::BigInt(n),
        // u128 above i128::MAX
        None => Value::Number(approx),
    }
}

impl_wide_integer!(u64, i64, u128, i128, usize, isize);

impl ToGraph for bool {
    fn to_graph(&self, _heap: &mut Heap) -> Value {
        Value::Bool(*self)
    }
}

impl ToGraph for char {
    fn to_graph(&self, _heap: &mut Heap) -> Value {
        Value::String(self.to_string())
    }
}

impl ToGraph for str {
    fn to_graph(&self, _heap: &mut Heap) -> Value {
        Value::String(self.to_string())
    }
}

impl ToGraph for String {
    fn to_graph(&self, _heap: &mut Heap) -> Value {
        Value::String(self.clone())
    }
}

impl ToGraph for Cow<'_, str> {
    fn to_graph(&self, _heap: &mut Heap) -> Value {
        Value::String(self.to_string())
    }
}

impl ToGraph for () {
    fn to_graph(&self, _heap: &mut Heap) -> Value {
        Value::Null
    }
}

impl<T: ToGraph> ToGraph for Option<T> {
    fn to_graph(&self, heap: &mut Heap) -> Value {
        match self {
            Some(inner) => inner.to_graph(heap),
            None => Value::Null,
        }
    }
}

impl<T: ToGraph> ToGraph for [T] {
    fn to_graph(&self, heap: &mut Heap) -> Value {
        let items = self.iter().map(|item| item.to_graph(heap)).collect();
        Value::Object(heap.array(items))
    }
}

impl<T: ToGraph> ToGraph for Vec<T> {
    fn to_graph(&self, heap: &mut Heap) -> Value {
        self.as_slice().to_graph(heap)
    }
}

impl<T: ToGraph, const N: usize> ToGraph for [T; N] {
    fn to_graph(&self, heap: &mut Heap) -> Value {
        self.as_slice().to_graph(heap)
    }
}

impl<V: ToGraph> ToGraph for HashMap<String, V> {
    fn to_graph(&self, heap: &mut Heap) -> Value {
        record_from(heap, self.iter())
    }
}

impl<V: ToGraph> ToGraph for BTreeMap<String, V> {
    fn to_graph(&self, heap: &mut Heap) -> Value {
        record_from(heap, self.iter())
    }
}

fn record_from<'a, V, I>(heap: &mut Heap, entries: I) -> Value
where
    V: ToGraph + 'a,
    I: Iterator<Item = (&'a String, &'a V)>,
{
    let mut record = Record::new(Prototype::Object);
    for (key, value) in entries {
        let value = value.to_graph(heap);
        record.define(key.clone(), value, Visibility::Visible);
    }
    Value::Object(heap.record(record))
}

impl<T: ToGraph + ?Sized> ToGraph for &T {
    fn to_graph(&self, heap: &mut Heap) -> Value {
        (**self).to_graph(heap)
    }
}

impl<T: ToGraph + ?Sized> ToGraph for Box<T> {
    fn to_graph(&self, heap: &mut Heap) -> Value {
        (**self).to_graph(heap)
    }
}

impl<T: ToGraph + ?Sized> ToGraph for Rc<T> {
    fn to_graph(&self, heap: &mut Heap) -> Value {
        (**self).to_graph(heap)
    }
}

impl<T: ToGraph + ?Sized> ToGraph for Arc<T> {
    fn to_graph(&self, heap: &mut Heap) -> Value {
        (**self).to_graph(heap)
    }
}

impl ToGraph for Value {
    fn to_graph(&self, _heap: &mut Heap) -> Value {
        self.clone()
    }
}

impl ToGraph for Plain {
    fn to_graph(&self, heap: &mut Heap) -> Value {
        heap.import(self)
    }
}

impl ToGraph for serde_json::Value {
    fn to_graph(&self, heap: &mut Heap) -> Value {
        heap.import_json(self)
    }
}
