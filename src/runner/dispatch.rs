//! Method dispatch and super pointer management.
//!
//! A super-bound function (see [`FunctionKind::SuperBound`]) is a trampoline:
//! it installs the ancestor implementation as the receiver's super pointer,
//! runs the wrapped body and puts the previous pointer back. Leaf functions run
//! directly.

use crate::ds::class::{ClassId, STATIC_KEY, SUPER_KEY};
use crate::ds::error::ClassError;
use crate::ds::function::{FunctionKind, FunctionRef};
use crate::ds::instance::{Instance, InstanceRef, SuperGuard};
use crate::ds::object::ObjectRef;
use crate::ds::value::Value;
use crate::runner::realm::Realm;

/// Execution context handed to every native body.
pub struct CallContext<'r> {
    realm: &'r Realm,
    this: Value,
}

impl<'r> CallContext<'r> {
    pub(crate) fn new(realm: &'r Realm, this: Value) -> Self {
        CallContext { realm, this }
    }

    pub fn realm(&self) -> &'r Realm {
        self.realm
    }

    /// The receiver of the call.
    pub fn this(&self) -> &Value {
        &self.this
    }

    pub fn this_instance(&self) -> Result<&InstanceRef, ClassError> {
        match &self.this {
            Value::Instance(instance) => Ok(instance),
            other => Err(ClassError::TypeError(format!(
                "receiver is {}, not an instance",
                other.type_name()
            ))),
        }
    }

    pub fn get(&self, name: &str) -> Result<Value, ClassError> {
        self.realm.get_property(&self.this, name)
    }

    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), ClassError> {
        self.realm.set_property(&self.this, name, value.into())
    }

    pub fn call_method(&self, name: &str, args: Vec<Value>) -> Result<Value, ClassError> {
        self.realm.call_method(&self.this, name, args)
    }

    /// Invoke the nearest ancestor implementation of the running method, or the
    /// inherited constructor when called from a constructor body.
    pub fn call_super(&self, args: Vec<Value>) -> Result<Value, ClassError> {
        self.this_instance()?;
        let target = self.realm.get_property(&self.this, SUPER_KEY)?;
        if !target.is_callable() {
            return Err(ClassError::TypeError(
                "super is not a function: no ancestor implements this method".to_string(),
            ));
        }
        self.realm.call_value(&target, self.this.clone(), args)
    }

    /// The static table visible from the receiver.
    pub fn statics(&self) -> Result<ObjectRef, ClassError> {
        let class = match &self.this {
            Value::Instance(instance) => instance.class(),
            Value::Class(class) => *class,
            other => {
                return Err(ClassError::TypeError(format!(
                    "{} has no static table",
                    other.type_name()
                )))
            }
        };
        match self.realm.lookup(class, STATIC_KEY) {
            Some(Value::Object(statics)) => Ok(statics),
            _ => Err(ClassError::TypeError(format!(
                "class #{} has no static table",
                class.index()
            ))),
        }
    }
}

impl Realm {
    /// Run `function` against `this`.
    pub fn invoke(
        &self,
        function: &FunctionRef,
        this: Value,
        args: Vec<Value>,
    ) -> Result<Value, ClassError> {
        let _frame = self.call_stack.enter()?;
        match function.kind() {
            FunctionKind::Native { body, .. } => {
                let mut ctx = CallContext::new(self, this);
                (**body)(&mut ctx, args)
            }
            FunctionKind::SuperBound {
                target,
                home,
                method,
            } => {
                let ancestor = self.resolve_super(*home, method);
                let _guard = match &this {
                    Value::Instance(instance) => Some(SuperGuard::install(instance, ancestor)),
                    _ => None,
                };
                self.invoke(target, this, args)
            }
        }
    }

    /// Call a function, or run a class's constructor body against `this`.
    pub fn call_value(
        &self,
        callee: &Value,
        this: Value,
        args: Vec<Value>,
    ) -> Result<Value, ClassError> {
        match callee {
            Value::Function(function) => self.invoke(function, this, args),
            Value::Class(class) => {
                let constructor = self.constructor_of(*class)?;
                self.invoke(&constructor, this, args)
            }
            other => Err(ClassError::TypeError(format!(
                "{} is not a function",
                other.type_name()
            ))),
        }
    }

    /// Create an instance of `class` and run its constructor.
    pub fn construct(
        &self,
        class: impl Into<Value>,
        args: Vec<Value>,
    ) -> Result<InstanceRef, ClassError> {
        let class = match class.into() {
            Value::Class(class) if self.contains(class) => class,
            other => {
                return Err(ClassError::TypeError(format!(
                    "{} is not a constructor",
                    other.type_name()
                )))
            }
        };
        let constructor = self.constructor_of(class)?;
        let instance = Instance::new(class);
        self.invoke(&constructor, Value::Instance(instance.clone()), args)?;
        Ok(instance)
    }

    pub fn call_method(
        &self,
        receiver: &Value,
        name: &str,
        args: Vec<Value>,
    ) -> Result<Value, ClassError> {
        let callee = self.get_property(receiver, name)?;
        if !callee.is_callable() {
            return Err(ClassError::TypeError(format!(
                "{}.{} is not a function",
                receiver.type_name(),
                name
            )));
        }
        self.call_value(&callee, receiver.clone(), args)
    }

    pub fn get_property(&self, receiver: &Value, name: &str) -> Result<Value, ClassError> {
        match receiver {
            Value::Instance(instance) => {
                if name == SUPER_KEY {
                    if let Some(pointer) = instance.super_pointer() {
                        return Ok(pointer);
                    }
                }
                if let Some(value) = instance.get_own(name) {
                    return Ok(value);
                }
                Ok(self.prototype_property(instance.class(), name))
            }
            Value::Class(class) => {
                let members = self.members_of(*class)?;
                let value = members.borrow().get(name).cloned();
                Ok(value.unwrap_or(Value::Undefined))
            }
            Value::Object(object) => Ok(object.borrow().get(name).cloned().unwrap_or_default()),
            other => Err(ClassError::TypeError(format!(
                "cannot read property '{}' of {}",
                name,
                other.type_name()
            ))),
        }
    }

    pub fn set_property(&self, receiver: &Value, name: &str, value: Value) -> Result<(), ClassError> {
        match receiver {
            Value::Instance(instance) => {
                instance.set_own(name, value);
                Ok(())
            }
            Value::Class(class) => {
                self.members_of(*class)?.borrow_mut().insert(name, value);
                Ok(())
            }
            Value::Object(object) => {
                object.borrow_mut().insert(name, value);
                Ok(())
            }
            other => Err(ClassError::TypeError(format!(
                "cannot set property '{}' of {}",
                name,
                other.type_name()
            ))),
        }
    }

    /// Does `value` delegate to the instance side of `class`?
    pub fn instance_of(&self, value: &Value, class: ClassId) -> bool {
        match value {
            Value::Instance(instance) => {
                instance.class() == class || self.is_subclass_of(instance.class(), class)
            }
            _ => false,
        }
    }
}
