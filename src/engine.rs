//! The cycle-breaking copier.
//!
//! [`Walker`] copies a composite out of a [`Heap`] into a [`Plain`] tree. It threads the
//! chain of ancestors on the *current* path through the recursion: a value that is one of
//! its own ancestors is replaced with [`CIRCULAR_SENTINEL`], while an object shared by two
//! unrelated branches is copied in full on both of them.
//!
//! The input heap is only ever borrowed immutably.

use tracing::{debug, trace};

use crate::api::CodecOptions;
use crate::error::{Error, Result};
use crate::graph::{Heap, Object, ObjectId, Properties, Prototype, Visibility};
use crate::plain::{CIRCULAR_SENTINEL, Plain, PlainObject};
use crate::value::Value;

/// Diagnostic fields handled after the entry loop, with their default visibility.
///
/// They are captured even when hidden on the input, and even when only inherited.
pub(crate) const RESERVED_KEYS: [(&str, Visibility); 4] = [
    ("name", Visibility::Hidden),
    ("message", Visibility::Hidden),
    ("stack", Visibility::Hidden),
    ("code", Visibility::Visible),
];

/// Per-call traversal context.
pub(crate) struct Walker<'h> {
    heap: &'h Heap,
    options: &'h CodecOptions,
    /// Write the reserved keys as visible regardless of their defaults.
    force_visible: bool,
}

impl<'h> Walker<'h> {
    pub(crate) fn new(heap: &'h Heap, options: &'h CodecOptions, force_visible: bool) -> Self {
        Self {
            heap,
            options,
            force_visible,
        }
    }

    /// Copies the composite `from` into a fresh composite of the same kind.
    ///
    /// `ancestors` is the path from the root down to, but excluding, `from`.
    pub(crate) fn copy(&self, from: ObjectId, ancestors: &[ObjectId]) -> Result<Plain> {
        match self.heap.get(from)? {
            Object::Array(items) => self.copy_array(from, items, ancestors),
            Object::Record(record) => self
                .copy_record(
                    from,
                    record.properties(),
                    record.prototype(),
                    ancestors,
                    PlainObject::new(),
                )
                .map(Plain::Object),
            Object::Function(_) => Err(Error::NotARecord(from)),
        }
    }

    /// Copies the root record `from` onto an existing accumulator instead of a fresh one.
    pub(crate) fn copy_into(&self, from: ObjectId, target: PlainObject) -> Result<PlainObject> {
        match self.heap.get(from)? {
            Object::Record(record) => {
                self.copy_record(from, record.properties(), record.prototype(), &[], target)
            }
            _ => Err(Error::NotARecord(from)),
        }
    }

    fn copy_record(
        &self,
        from: ObjectId,
        properties: &Properties,
        prototype: Prototype,
        ancestors: &[ObjectId],
        mut target: PlainObject,
    ) -> Result<PlainObject> {
        let path = self.descend(from, ancestors)?;

        // Getters run here, in definition order, before any copying.
        let mut keys = Vec::new();
        let mut values = Vec::new();
        for property in properties.visible() {
            values.push(property.read()?);
            keys.push(property.key());
        }

        let copied = self.copy_values(&values, &path)?;
        for (key, value) in keys.into_iter().zip(copied) {
            if let Some(value) = value {
                target.assign(key, value);
            }
        }

        for (key, default_visibility) in RESERVED_KEYS {
            let current = match properties.get(key) {
                Some(property) => Some(property.read()?),
                None => prototype
                    .inherited(key)
                    .map(|s| Value::String(s.to_string())),
            };
            if let Some(Value::String(s)) = current {
                let visibility = if self.force_visible {
                    Visibility::Visible
                } else {
                    default_visibility
                };
                target.define(key, Plain::String(s), visibility);
            }
        }

        Ok(target)
    }

    fn copy_array(&self, from: ObjectId, items: &[Value], ancestors: &[ObjectId]) -> Result<Plain> {
        let path = self.descend(from, ancestors)?;
        let mut copied = self.copy_values(items, &path)?;
        // Dropped entries past the last copied one are never written.
        let len = copied.iter().rposition(Option::is_some).map_or(0, |last| last + 1);
        copied.truncate(len);
        // Interior holes stay `undefined` so indices stay aligned.
        Ok(Plain::Array(
            copied
                .into_iter()
                .map(|v| v.unwrap_or(Plain::Undefined))
                .collect(),
        ))
    }

    /// Extends the ancestor path with `from`, enforcing the depth guard.
    fn descend(&self, from: ObjectId, ancestors: &[ObjectId]) -> Result<Vec<ObjectId>> {
        if let Some(limit) = self.options.max_depth
            && ancestors.len() > limit
        {
            debug!(limit, object = %from, "depth guard tripped");
            return Err(Error::DepthExceeded { limit });
        }
        let mut path = Vec::with_capacity(ancestors.len() + 1);
        path.extend_from_slice(ancestors);
        path.push(from);
        Ok(path)
    }

    /// Copies sibling values. Each sibling sees the same ancestor path; recursion clones it.
    fn copy_values(&self, values: &[Value], path: &[ObjectId]) -> Result<Vec<Option<Plain>>> {
        #[cfg(feature = "parallel")]
        if self.options.parallel && values.len() >= self.options.parallel_threshold {
            use rayon::prelude::*;

            debug!(width = values.len(), "copying siblings in parallel");
            return values
                .par_iter()
                .map(|value| self.copy_value(value, path))
                .collect();
        }

        values
            .iter()
            .map(|value| self.copy_value(value, path))
            .collect()
    }

    /// Copies one entry. `None` means the entry is dropped.
    fn copy_value(&self, value: &Value, path: &[ObjectId]) -> Result<Option<Plain>> {
        let Value::Object(id) = value else {
            return Ok(primitive(value));
        };

        if self.heap.get(*id)?.is_callable() {
            trace!(object = %id, "dropping callable");
            return Ok(None);
        }

        if path.contains(id) {
            trace!(object = %id, depth = path.len(), "ancestor reference replaced");
            return Ok(Some(Plain::String(CIRCULAR_SENTINEL.to_string())));
        }

        self.copy(*id, path).map(Some)
    }
}

/// Copies a primitive by value. Returns `None` for composites.
pub(crate) fn primitive(value: &Value) -> Option<Plain> {
    Some(match value {
        Value::Undefined => Plain::Undefined,
        Value::Null => Plain::Null,
        Value::Bool(b) => Plain::Bool(*b),
        Value::Number(n) => Plain::Number(*n),
        Value::BigInt(i) => Plain::BigInt(*i),
        Value::String(s) => Plain::String(s.clone()),
        Value::Symbol(desc) => Plain::Symbol(desc.clone()),
        Value::Object(_) => return None,
    })
}
