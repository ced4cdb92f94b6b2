use super::id::ObjectId;
use super::object::{Accessor, Function, Object, Prototype, Record, Slot, Visibility};
use crate::error::{Error, Result};
use crate::plain::{Plain, PlainObject};
use crate::value::Value;

/// Arena that owns every composite of an object graph.
///
/// Objects are never removed, so a handle stays valid for the lifetime of the heap.
/// Cycles are just handles pointing back at an ancestor.
#[derive(Debug, Clone, Default)]
pub struct Heap {
    objects: Vec<Object>,
}

impl Heap {
    /// Creates a new, empty heap.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Moves an object into the heap and returns its handle.
    pub fn alloc(&mut self, object: Object) -> ObjectId {
        let id = ObjectId::new(self.objects.len());
        self.objects.push(object);
        id
    }

    /// Allocates an empty plain record.
    pub fn object(&mut self) -> ObjectId {
        self.alloc(Object::Record(Record::new(Prototype::Object)))
    }

    /// Allocates a prepared record.
    pub fn record(&mut self, record: Record) -> ObjectId {
        self.alloc(Object::Record(record))
    }

    /// Allocates an array.
    pub fn array(&mut self, items: Vec<Value>) -> ObjectId {
        self.alloc(Object::Array(items))
    }

    /// Allocates a function with an optional declared name.
    pub fn function(&mut self, name: Option<&str>) -> ObjectId {
        self.alloc(Object::Function(Function::new(name.map(str::to_string))))
    }

    /// Allocates a generic error with a hidden `message` and `stack`.
    /// `name` is inherited from the error prototype.
    pub fn error(&mut self, message: &str) -> ObjectId {
        let stack = if message.is_empty() {
            "Error".to_string()
        } else {
            format!("Error: {message}")
        };
        let mut record = Record::new(Prototype::Error);
        record.define("message", Value::from(message), Visibility::Hidden);
        record.define("stack", Value::String(stack), Visibility::Hidden);
        self.record(record)
    }

    /// Captures a Rust error and its `source()` chain.
    ///
    /// The Display text becomes the hidden `message`, the chain is listed in the hidden
    /// `stack`, and the direct source is linked through a visible `cause` property.
    pub fn capture_error(&mut self, err: &(dyn std::error::Error + 'static)) -> ObjectId {
        let message = err.to_string();
        let mut stack = if message.is_empty() {
            "Error".to_string()
        } else {
            format!("Error: {message}")
        };
        let mut source = err.source();
        while let Some(cause) = source {
            stack.push_str("\n    caused by: ");
            stack.push_str(&cause.to_string());
            source = cause.source();
        }

        let cause = err.source().map(|c| Value::Object(self.capture_error(c)));

        let mut record = Record::new(Prototype::Error);
        record.define("message", Value::String(message), Visibility::Hidden);
        record.define("stack", Value::String(stack), Visibility::Hidden);
        if let Some(cause) = cause {
            record.assign("cause", cause);
        }
        self.record(record)
    }

    /// Retrieves an object by handle.
    ///
    /// # Errors
    /// Returns [`Error::InvalidHandle`] if the handle is not from this heap.
    pub fn get(&self, id: ObjectId) -> Result<&Object> {
        self.objects.get(id.index()).ok_or(Error::InvalidHandle(id))
    }

    /// Retrieves an object mutably.
    ///
    /// # Errors
    /// Returns [`Error::InvalidHandle`] if the handle is not from this heap.
    pub fn get_mut(&mut self, id: ObjectId) -> Result<&mut Object> {
        self.objects.get_mut(id.index()).ok_or(Error::InvalidHandle(id))
    }

    /// Retrieves a record.
    ///
    /// # Errors
    /// [`Error::InvalidHandle`] for foreign handles, [`Error::NotARecord`] for arrays
    /// and functions.
    pub fn record_of(&self, id: ObjectId) -> Result<&Record> {
        self.get(id)?.as_record().ok_or(Error::NotARecord(id))
    }

    /// Assigns `key` on a record or function (see [`Properties::assign`]).
    ///
    /// [`Properties::assign`]: super::Properties::assign
    ///
    /// # Errors
    /// [`Error::InvalidHandle`], or [`Error::NotARecord`] when `id` is an array.
    pub fn set(&mut self, id: ObjectId, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.properties_mut(id)?.assign(key, value);
        Ok(())
    }

    /// Defines a data property with an explicit visibility.
    ///
    /// # Errors
    /// [`Error::InvalidHandle`], or [`Error::NotARecord`] when `id` is an array.
    pub fn define(
        &mut self,
        id: ObjectId,
        key: &str,
        value: impl Into<Value>,
        visibility: Visibility,
    ) -> Result<()> {
        let value = value.into();
        self.properties_mut(id)?
            .define(key, Slot::Data(value), visibility);
        Ok(())
    }

    /// Defines an accessor property.
    ///
    /// # Errors
    /// [`Error::InvalidHandle`], or [`Error::NotARecord`] when `id` is an array.
    pub fn define_accessor(
        &mut self,
        id: ObjectId,
        key: &str,
        accessor: Accessor,
        visibility: Visibility,
    ) -> Result<()> {
        self.properties_mut(id)?
            .define(key, Slot::Accessor(accessor), visibility);
        Ok(())
    }

    /// Appends to an array.
    ///
    /// # Errors
    /// [`Error::InvalidHandle`], or [`Error::NotAnArray`] when `id` is not an array.
    pub fn push(&mut self, id: ObjectId, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.items_mut(id)?.push(value);
        Ok(())
    }

    /// Writes an array slot, padding with `undefined` when `index` is past the end.
    ///
    /// # Errors
    /// [`Error::InvalidHandle`], or [`Error::NotAnArray`] when `id` is not an array.
    pub fn set_index(&mut self, id: ObjectId, index: usize, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let items = self.items_mut(id)?;
        if index >= items.len() {
            items.resize(index + 1, Value::Undefined);
        }
        if let Some(slot) = items.get_mut(index) {
            *slot = value;
        }
        Ok(())
    }

    /// Rebuilds a plain value inside the heap. Visibility flags are preserved and every
    /// nested object becomes a plain record.
    pub fn import(&mut self, plain: &Plain) -> Value {
        match plain {
            Plain::Undefined => Value::Undefined,
            Plain::Null => Value::Null,
            Plain::Bool(b) => Value::Bool(*b),
            Plain::Number(n) => Value::Number(*n),
            Plain::BigInt(i) => Value::BigInt(*i),
            Plain::String(s) => Value::String(s.clone()),
            Plain::Symbol(desc) => Value::Symbol(desc.clone()),
            Plain::Array(items) => {
                let values = items.iter().map(|item| self.import(item)).collect();
                Value::Object(self.array(values))
            }
            Plain::Object(object) => Value::Object(self.import_record(Prototype::Object, object)),
        }
    }

    /// Builds graph values from JSON received over a transport.
    pub fn import_json(&mut self, json: &serde_json::Value) -> Value {
        self.import(&Plain::from(json))
    }

    pub(crate) fn import_record(&mut self, prototype: Prototype, object: &PlainObject) -> ObjectId {
        let mut record = Record::new(prototype);
        for field in object.iter() {
            let value = self.import(&field.value);
            record.define(field.key.clone(), value, field.visibility);
        }
        self.record(record)
    }

    /// Number of objects in the heap.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the heap holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn properties_mut(&mut self, id: ObjectId) -> Result<&mut super::Properties> {
        self.get_mut(id)?
            .properties_mut()
            .ok_or(Error::NotARecord(id))
    }

    fn items_mut(&mut self, id: ObjectId) -> Result<&mut Vec<Value>> {
        match self.get_mut(id)? {
            Object::Array(items) => Ok(items),
            _ => Err(Error::NotAnArray(id)),
        }
    }
}
