use std::collections::hash_map::Iter;
use std::collections::HashMap;

use crate::ds::value::Value;

/// A stored property. Non-enumerable slots are skipped when a table is used
/// as a copy source, unless the name is on the reserved allow-list.
#[derive(Debug, Clone)]
pub struct Slot {
    pub value: Value,
    pub enumerable: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    slots: HashMap<String, Slot>,
}

impl PropertyTable {
    pub fn new() -> Self {
        PropertyTable {
            slots: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots.get(name).map(|slot| &slot.value)
    }

    pub fn get_slot(&self, name: &str) -> Option<&Slot> {
        self.slots.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Inserts an enumerable property, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.define(name, value, true);
    }

    pub fn define(&mut self, name: impl Into<String>, value: Value, enumerable: bool) {
        self.slots.insert(name.into(), Slot { value, enumerable });
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.slots.remove(name).map(|slot| slot.value)
    }

    pub fn is_enumerable(&self, name: &str) -> bool {
        self.slots.get(name).map(|s| s.enumerable).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, Slot> {
        self.slots.iter()
    }

    /// Own keys in a stable (sorted) order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.slots.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn enumerable_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.enumerable)
            .map(|(name, _)| name.clone())
            .collect();
        keys.sort();
        keys
    }
}
