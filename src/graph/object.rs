use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::value::Value;

/// Whether a property shows up when a composite's fields are enumerated.
///
/// Hidden properties are still present and readable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Reported by enumeration (the default for ordinary fields).
    #[default]
    Visible,
    /// Skipped by enumeration, readable by name.
    Hidden,
}

impl Visibility {
    /// Returns `Visible` when `visible` is true, `Hidden` otherwise.
    pub fn from_flag(visible: bool) -> Self {
        if visible { Self::Visible } else { Self::Hidden }
    }

    /// Returns true for `Visible`.
    pub fn is_visible(self) -> bool {
        self == Self::Visible
    }
}

type Getter = dyn Fn() -> std::result::Result<Value, String> + Send + Sync;

/// A computed property. The getter runs every time the property is read and may fail.
#[derive(Clone)]
pub struct Accessor(Arc<Getter>);

impl Accessor {
    /// Wraps a getter.
    pub fn new<F>(getter: F) -> Self
    where
        F: Fn() -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        Self(Arc::new(getter))
    }

    /// Runs the getter.
    pub fn get(&self) -> std::result::Result<Value, String> {
        (self.0)()
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Accessor(<getter>)")
    }
}

/// What a property holds.
#[derive(Debug, Clone)]
pub enum Slot {
    /// A stored value.
    Data(Value),
    /// A getter evaluated on read.
    Accessor(Accessor),
}

/// A named slot inside a record or function.
#[derive(Debug, Clone)]
pub struct Property {
    key: String,
    slot: Slot,
    visibility: Visibility,
}

impl Property {
    /// The property name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The raw slot, without running accessors.
    pub fn slot(&self) -> &Slot {
        &self.slot
    }

    /// Whether the property is enumerable.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Reads the property, running the getter for accessor slots.
    ///
    /// # Errors
    /// Returns [`Error::Access`] when the getter fails.
    pub fn read(&self) -> Result<Value> {
        match &self.slot {
            Slot::Data(value) => Ok(value.clone()),
            Slot::Accessor(accessor) => accessor.get().map_err(|message| Error::Access {
                key: self.key.clone(),
                message,
            }),
        }
    }

    /// Returns the stored string for data slots holding one.
    pub fn as_str(&self) -> Option<&str> {
        match &self.slot {
            Slot::Data(Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

/// Ordered own properties of a record or function.
///
/// Keys are unique. Redefining a key keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct Properties(Vec<Property>);

impl Properties {
    /// Creates an empty property list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Looks up an own property of any visibility.
    pub fn get(&self, key: &str) -> Option<&Property> {
        self.0.iter().find(|p| p.key == key)
    }

    /// Plain assignment: overwrites the value of an existing key and keeps its
    /// visibility, or appends a new visible property.
    pub fn assign(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.0.iter_mut().find(|p| p.key == key) {
            Some(existing) => existing.slot = Slot::Data(value),
            None => self.0.push(Property {
                key,
                slot: Slot::Data(value),
                visibility: Visibility::Visible,
            }),
        }
    }

    /// Defines a property with an explicit slot and visibility.
    pub fn define(&mut self, key: impl Into<String>, slot: Slot, visibility: Visibility) {
        let key = key.into();
        match self.0.iter_mut().find(|p| p.key == key) {
            Some(existing) => {
                existing.slot = slot;
                existing.visibility = visibility;
            }
            None => self.0.push(Property {
                key,
                slot,
                visibility,
            }),
        }
    }

    /// Iterates over every own property, hidden ones included.
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.0.iter()
    }

    /// Iterates over the enumerable properties in definition order.
    pub fn visible(&self) -> impl Iterator<Item = &Property> {
        self.0.iter().filter(|p| p.visibility.is_visible())
    }

    /// Names of the enumerable properties.
    pub fn keys(&self) -> Vec<&str> {
        self.visible().map(|p| p.key.as_str()).collect()
    }

    /// Number of own properties, hidden ones included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when there are no own properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The prototype a record inherits from.
///
/// Error prototypes make a record error-like and supply inherited `name` and `message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Prototype {
    /// An ordinary object.
    #[default]
    Object,
    /// A generic error.
    Error,
    /// The synthetic carrier for thrown values that were not errors.
    NonError,
}

impl Prototype {
    /// Returns true for the error prototypes.
    pub fn is_error(self) -> bool {
        matches!(self, Self::Error | Self::NonError)
    }

    /// The category name reported by records with this prototype.
    pub fn error_name(self) -> Option<&'static str> {
        match self {
            Self::Object => None,
            Self::Error => Some("Error"),
            Self::NonError => Some(crate::constants::NON_ERROR_NAME),
        }
    }

    /// Value inherited for `key` when the record has no own property by that name.
    pub fn inherited(self, key: &str) -> Option<&'static str> {
        match key {
            "name" => self.error_name(),
            "message" if self.is_error() => Some(""),
            _ => None,
        }
    }
}

/// A mapping composite.
#[derive(Debug, Clone, Default)]
pub struct Record {
    prototype: Prototype,
    properties: Properties,
}

impl Record {
    /// Creates an empty record.
    pub fn new(prototype: Prototype) -> Self {
        Self {
            prototype,
            properties: Properties::new(),
        }
    }

    /// Creates a record from an existing property list.
    pub fn with_properties(prototype: Prototype, properties: Properties) -> Self {
        Self {
            prototype,
            properties,
        }
    }

    /// The prototype tag.
    pub fn prototype(&self) -> Prototype {
        self.prototype
    }

    /// Own properties.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Mutable own properties.
    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    /// See [`Properties::assign`].
    pub fn assign(&mut self, key: impl Into<String>, value: Value) {
        self.properties.assign(key, value);
    }

    /// Defines a data property with an explicit visibility.
    pub fn define(&mut self, key: impl Into<String>, value: Value, visibility: Visibility) {
        self.properties.define(key, Slot::Data(value), visibility);
    }

    /// Reads `key` like a property lookup: own property first (running getters), then
    /// the prototype default. Returns `None` when neither exists.
    ///
    /// # Errors
    /// Returns [`Error::Access`] when a getter fails.
    pub fn read(&self, key: &str) -> Result<Option<Value>> {
        match self.properties.get(key) {
            Some(property) => property.read().map(Some),
            None => Ok(self
                .prototype
                .inherited(key)
                .map(|s| Value::String(s.to_string()))),
        }
    }

    /// String stored under `key` (own data slot or prototype default). Getters are not run.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.properties.get(key) {
            Some(property) => property.as_str(),
            None => self.prototype.inherited(key),
        }
    }

    /// Own or inherited `name`.
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    /// Own or inherited `message`.
    pub fn message(&self) -> Option<&str> {
        self.get_str("message")
    }

    /// Own `stack`.
    pub fn stack(&self) -> Option<&str> {
        self.get_str("stack")
    }
}

/// A callable. Never copied into plain data.
#[derive(Debug, Clone, Default)]
pub struct Function {
    name: Option<String>,
    properties: Properties,
}

impl Function {
    /// Creates a function with an optional declared name.
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            properties: Properties::new(),
        }
    }

    /// The declared name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The declared name, or `anonymous` when missing or empty.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "anonymous",
        }
    }

    /// Own properties.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Mutable own properties.
    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }
}

/// A composite stored in the heap.
#[derive(Debug, Clone)]
pub enum Object {
    /// Mapping of string keys to values.
    Record(Record),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// A callable.
    Function(Function),
}

impl Object {
    /// Capability test: does this object behave like an error instance?
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Record(r) if r.prototype().is_error())
    }

    /// Returns true for functions.
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_))
    }

    /// Returns the record, if this is one.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the array items, if this is an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the function, if this is one.
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Own properties of records and functions. Arrays have none.
    pub fn properties(&self) -> Option<&Properties> {
        match self {
            Self::Record(r) => Some(r.properties()),
            Self::Function(f) => Some(f.properties()),
            Self::Array(_) => None,
        }
    }

    pub(crate) fn properties_mut(&mut self) -> Option<&mut Properties> {
        match self {
            Self::Record(r) => Some(r.properties_mut()),
            Self::Function(f) => Some(f.properties_mut()),
            Self::Array(_) => None,
        }
    }
}
