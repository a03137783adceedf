//! # lineage - class composition with super-dispatch
//!
//! A small dynamic object model in which classes are declared, linked to a
//! single parent, given instance methods, mixed with methods from unrelated
//! providers, given class-level (static) members and registered under dotted
//! namespace paths.
//!
//! ## Quick Start
//!
//! ```
//! use lineage::{FunctionObject, MethodTable, Realm, Value};
//!
//! let realm = Realm::new();
//!
//! let parent = realm.declare(Some(FunctionObject::leaf("Parent", |ctx, args| {
//!     ctx.set("name", args.get(0).cloned().unwrap_or_default())?;
//!     Ok(Value::Undefined)
//! })));
//! parent.provides(MethodTable::new().leaf("decorate", |_ctx, _args| Ok(Value::from("parent"))));
//!
//! let child = realm.declare(Some(FunctionObject::overriding("Child", |ctx, args| {
//!     ctx.call_super(args)?;
//!     Ok(Value::Undefined)
//! })));
//! child.inherits(&parent).provides(MethodTable::new().overriding("decorate", |ctx, args| {
//!     Ok(Value::from(format!("{} child", ctx.call_super(args)?)))
//! }));
//!
//! let instance = realm.construct(child.class(), vec![Value::from("Hiroshi")]).unwrap();
//! let this = Value::Instance(instance);
//! assert_eq!(realm.get_property(&this, "name").unwrap(), Value::from("Hiroshi"));
//! assert_eq!(realm.call_method(&this, "decorate", vec![]).unwrap(), Value::from("parent child"));
//! assert!(realm.instance_of(&this, parent.class()));
//! ```
//!
//! ## Super-Dispatch
//!
//! Methods opt into super-dispatch explicitly ([`FunctionObject::overriding`],
//! [`MethodTable::overriding`]). Installing such a method on a class binds it
//! to that class (its *home*). When a bound method runs:
//!
//! 1. the receiver's super pointer is saved,
//! 2. the pointer is set to the implementation of the same name found by
//!    walking from the home class's parent upward,
//! 3. the method body runs; [`CallContext::call_super`] calls the pointer,
//! 4. the saved pointer is put back, also when the body fails or panics.
//!
//! Because resolution starts above the home class and not above the
//! receiver's class, a chain `A -> B -> C` where only `A` and `C` implement a
//! method sends `C`'s super call straight to `A`.
//!
//! Leaf methods are installed as-is and pay nothing at call time.
//!
//! ## Architecture
//!
//! - **[`ds`]** - Data structures (values, property tables, functions, classes, instances)
//! - **[`runner`]** - Realm arena, composition, dispatch and namespaces
//! - **[`std_lib`]** - Built-ins of the implicit root class

#[macro_use]
extern crate lazy_static;

pub mod ds;
pub mod runner;
pub mod std_lib;

pub use ds::call_stack::CallStackConfig;
pub use ds::class::{ClassId, CONSTRUCTOR_KEY, STATIC_KEY, SUPER_KEY};
pub use ds::error::ClassError;
pub use ds::function::{FunctionObject, FunctionRef};
pub use ds::instance::{Instance, InstanceRef};
pub use ds::method_table::{MethodTable, Provider};
pub use ds::object::{ObjectRef, PlainObject};
pub use ds::value::Value;
pub use runner::descriptor::Descriptor;
pub use runner::dispatch::CallContext;
pub use runner::realm::{Realm, RealmConfig};
