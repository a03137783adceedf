use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ds::class::ClassId;
use crate::ds::value::Value;

pub type InstanceRef = Rc<Instance>;

pub struct Instance {
    class: ClassId,
    fields: RefCell<HashMap<String, Value>>,
    super_pointer: RefCell<Option<Value>>,
}

impl Instance {
    pub(crate) fn new(class: ClassId) -> InstanceRef {
        Rc::new(Instance {
            class,
            fields: RefCell::new(HashMap::new()),
            super_pointer: RefCell::new(None),
        })
    }

    /// The class this instance was constructed from.
    pub fn class(&self) -> ClassId {
        self.class
    }

    pub fn get_own(&self, name: &str) -> Option<Value> {
        self.fields.borrow().get(name).cloned()
    }

    pub fn set_own(&self, name: impl Into<String>, value: Value) {
        self.fields.borrow_mut().insert(name.into(), value);
    }

    pub fn has_own(&self, name: &str) -> bool {
        self.fields.borrow().contains_key(name)
    }

    pub fn own_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.fields.borrow().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// The ancestor implementation installed by the innermost active
    /// super-bound call, if any.
    pub fn super_pointer(&self) -> Option<Value> {
        self.super_pointer.borrow().clone()
    }

    fn replace_super_pointer(&self, pointer: Option<Value>) -> Option<Value> {
        self.super_pointer.replace(pointer)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class)
            .field("fields", &self.own_keys())
            .finish()
    }
}

/// Holds an instance's super pointer for the duration of one call and puts the
/// previous pointer back when dropped, whether the call returned, failed or
/// unwound.
pub(crate) struct SuperGuard {
    instance: InstanceRef,
    saved: Option<Value>,
}

impl SuperGuard {
    pub(crate) fn install(instance: &InstanceRef, pointer: Value) -> Self {
        let saved = instance.replace_super_pointer(Some(pointer));
        SuperGuard {
            instance: instance.clone(),
            saved,
        }
    }
}

impl Drop for SuperGuard {
    fn drop(&mut self) {
        self.instance.replace_super_pointer(self.saved.take());
    }
}
