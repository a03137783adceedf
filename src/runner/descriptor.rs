//! Fluent class composition.
//!
//! ```
//! use lineage::{MethodTable, Realm, Value};
//!
//! let realm = Realm::new();
//! let base = realm.declare(None);
//! base.provides(MethodTable::new().leaf("greet", |_ctx, _args| Ok(Value::from("hello"))));
//!
//! let derived = realm.declare(None);
//! derived
//!     .inherits(&base)
//!     .it()
//!     .provides(MethodTable::new().overriding("greet", |ctx, args| {
//!         let base = ctx.call_super(args)?;
//!         Ok(Value::from(format!("{}, world", base)))
//!     }))
//!     .register_as("app.Greeter", None);
//!
//! let greeter = realm.construct(derived.class(), vec![]).unwrap();
//! let said = realm.call_method(&Value::Instance(greeter), "greet", vec![]).unwrap();
//! assert_eq!(said, Value::from("hello, world"));
//! assert_eq!(realm.resolve_path("app.Greeter", None), Some(Value::Class(derived.class())));
//! ```

use crate::ds::class::ClassId;
use crate::ds::error::ClassError;
use crate::ds::instance::InstanceRef;
use crate::ds::method_table::{MethodTable, Provider};
use crate::ds::object::ObjectRef;
use crate::ds::value::Value;
use crate::runner::realm::Realm;

/// Transient handle for composing one class.
pub struct Descriptor<'r> {
    realm: &'r Realm,
    class: ClassId,
}

impl<'r> Descriptor<'r> {
    pub(crate) fn new(realm: &'r Realm, class: ClassId) -> Self {
        Descriptor { realm, class }
    }

    /// Self-reference, so chains read as a sequence of steps.
    pub fn it(&self) -> &Self {
        self
    }

    pub fn class(&self) -> ClassId {
        self.class
    }

    pub fn realm(&self) -> &'r Realm {
        self.realm
    }

    /// Link the class to a single parent. Values that are not classes of this
    /// realm are ignored, as is a link that would form a cycle.
    pub fn inherits(&self, parent: impl Into<Value>) -> &Self {
        self.realm.inherit(self.class, &parent.into());
        self
    }

    pub fn provides(&self, methods: MethodTable) -> &Self {
        self.realm.provide(self.class, methods.properties(), None);
        self
    }

    /// Copy methods from each provider without touching the ancestor chain.
    pub fn borrows<I>(&self, providers: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Into<Provider>,
    {
        for provider in providers {
            self.realm.borrow_from(self.class, &provider.into());
        }
        self
    }

    pub fn has_static(&self, properties: MethodTable) -> &Self {
        self.realm.make_static(self.class, &properties);
        self
    }

    /// Bind the class under a dotted path, in `scope` or the realm's global
    /// scope.
    pub fn register_as(&self, path: &str, scope: Option<&ObjectRef>) -> &Self {
        self.realm.register(path, Value::Class(self.class), scope);
        self
    }

    pub fn construct(&self, args: Vec<Value>) -> Result<InstanceRef, ClassError> {
        self.realm.construct(self.class, args)
    }
}

impl From<&Descriptor<'_>> for Value {
    fn from(descriptor: &Descriptor<'_>) -> Self {
        Value::Class(descriptor.class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_it_refers_to_itself() {
        let realm = Realm::new();
        let descriptor = realm.declare(None);
        assert!(std::ptr::eq(descriptor.it(), &descriptor));
    }

    #[test]
    fn test_every_step_returns_the_descriptor() {
        let realm = Realm::new();
        let parent = realm.declare(None);
        let descriptor = realm.declare(None);
        assert!(std::ptr::eq(descriptor.inherits(&parent), &descriptor));
        assert!(std::ptr::eq(descriptor.inherits(Value::Undefined), &descriptor));
        assert!(std::ptr::eq(descriptor.provides(MethodTable::new()), &descriptor));
        assert!(std::ptr::eq(
            descriptor.borrows(Vec::<Provider>::new()),
            &descriptor
        ));
        assert!(std::ptr::eq(descriptor.has_static(MethodTable::new()), &descriptor));
        assert!(std::ptr::eq(descriptor.register_as("Local", None), &descriptor));
    }
}
