use std::cell::RefCell;
use std::rc::Rc;

use crate::ds::property::PropertyTable;
use crate::ds::value::Value;

pub type ObjectRef = Rc<RefCell<PlainObject>>;

/// A bag of named values. Used for namespace containers, static tables,
/// class-level members and mixin sources.
#[derive(Debug, Default)]
pub struct PlainObject {
    properties: PropertyTable,
}

impl PlainObject {
    pub fn new() -> Self {
        PlainObject {
            properties: PropertyTable::new(),
        }
    }

    pub fn new_ref() -> ObjectRef {
        Rc::new(RefCell::new(PlainObject::new()))
    }

    pub fn from_table(properties: PropertyTable) -> ObjectRef {
        Rc::new(RefCell::new(PlainObject { properties }))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.properties.contains(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.properties.insert(name, value);
    }

    pub fn define(&mut self, name: impl Into<String>, value: Value, enumerable: bool) {
        self.properties.define(name, value, enumerable);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.properties.remove(name)
    }

    pub fn properties(&self) -> &PropertyTable {
        &self.properties
    }

    pub fn keys(&self) -> Vec<String> {
        self.properties.keys()
    }
}
