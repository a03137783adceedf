use crate::ds::class::ClassId;
use crate::ds::error::ClassError;
use crate::ds::function::{FunctionObject, FunctionRef};
use crate::ds::object::{ObjectRef, PlainObject};
use crate::ds::property::PropertyTable;
use crate::ds::value::Value;
use crate::runner::descriptor::Descriptor;
use crate::runner::dispatch::CallContext;

/// Name → value mapping handed to `provides`, `has_static` and `borrows`.
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    properties: PropertyTable,
}

impl MethodTable {
    pub fn new() -> Self {
        MethodTable {
            properties: PropertyTable::new(),
        }
    }

    /// Add an already built function.
    pub fn method(mut self, name: impl Into<String>, function: FunctionRef) -> Self {
        self.properties.insert(name, Value::Function(function));
        self
    }

    /// Add a method that never calls super.
    pub fn leaf<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut CallContext<'_>, Vec<Value>) -> Result<Value, ClassError> + 'static,
    {
        let name = name.into();
        let function = FunctionObject::leaf(name.clone(), body);
        self.method(name, function)
    }

    /// Add a method that may call super.
    pub fn overriding<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut CallContext<'_>, Vec<Value>) -> Result<Value, ClassError> + 'static,
    {
        let name = name.into();
        let function = FunctionObject::overriding(name.clone(), body);
        self.method(name, function)
    }

    /// Add a plain (non-function) value.
    pub fn value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name, value.into());
        self
    }

    pub fn properties(&self) -> &PropertyTable {
        &self.properties
    }

    pub fn into_object(self) -> ObjectRef {
        PlainObject::from_table(self.properties)
    }
}

/// Source of a mixin.
#[derive(Debug, Clone)]
pub enum Provider {
    Table(MethodTable),
    Object(ObjectRef),
    /// The instance side of a declared class.
    Class(ClassId),
}

impl From<MethodTable> for Provider {
    fn from(table: MethodTable) -> Self {
        Provider::Table(table)
    }
}

impl From<ObjectRef> for Provider {
    fn from(object: ObjectRef) -> Self {
        Provider::Object(object)
    }
}

impl From<ClassId> for Provider {
    fn from(class: ClassId) -> Self {
        Provider::Class(class)
    }
}

impl From<&Descriptor<'_>> for Provider {
    fn from(descriptor: &Descriptor<'_>) -> Self {
        Provider::Class(descriptor.class())
    }
}
