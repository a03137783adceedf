//! The class arena.
//!
//! A realm owns every class record it declares, addressed by [`ClassId`]
//! handles. Delegation between classes is a parent link in the arena, so
//! relinking a class never invalidates a handle captured elsewhere (super-bound
//! methods keep the handle of the class they were installed on).

use std::cell::{Ref, RefCell};
use std::collections::HashSet;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::ds::call_stack::{CallStack, CallStackConfig};
use crate::ds::class::{
    ClassId, ClassRecord, BORROW_EXCLUSIONS, CONSTRUCTOR_KEY, RESERVED_NAMES, STATIC_KEY,
    SUPER_KEY,
};
use crate::ds::error::ClassError;
use crate::ds::function::{FunctionObject, FunctionRef};
use crate::ds::method_table::{MethodTable, Provider};
use crate::ds::object::{ObjectRef, PlainObject};
use crate::ds::property::PropertyTable;
use crate::ds::value::Value;
use crate::runner::descriptor::Descriptor;
use crate::std_lib::object as root_object;

/// Configuration for a realm.
#[derive(Debug, Clone, Default)]
pub struct RealmConfig {
    pub call_stack: CallStackConfig,
}

impl RealmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_call_depth(mut self, max_depth: usize) -> Self {
        self.call_stack = CallStackConfig::with_limit(max_depth);
        self
    }
}

pub struct Realm {
    id: Uuid,
    classes: RefCell<Vec<ClassRecord>>,
    root: ClassId,
    root_constructor: FunctionRef,
    global: ObjectRef,
    pub(crate) call_stack: CallStack,
}

impl Realm {
    pub fn new() -> Self {
        Self::with_config(RealmConfig::default())
    }

    pub fn with_config(config: RealmConfig) -> Self {
        Self::with_global_scope(config, PlainObject::new_ref())
    }

    /// Create a realm whose namespace registrations default to `global`.
    pub fn with_global_scope(config: RealmConfig, global: ObjectRef) -> Self {
        let id = Uuid::new_v4();
        let root = ClassId::new(id, 0);
        let root_constructor = root_object::root_constructor();

        let mut record = ClassRecord::new(
            root_object::ROOT_CLASS_NAME,
            root_constructor.clone(),
            None,
        );
        record
            .prototype
            .define(CONSTRUCTOR_KEY, Value::Class(root), false);
        root_object::install(&mut record.prototype);

        debug!(realm = %id, "realm created");
        Realm {
            id,
            classes: RefCell::new(vec![record]),
            root,
            root_constructor,
            global,
            call_stack: CallStack::new(config.call_stack),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The implicit ancestor of every declared class.
    pub fn root(&self) -> ClassId {
        self.root
    }

    pub fn global_scope(&self) -> &ObjectRef {
        &self.global
    }

    pub fn class_count(&self) -> usize {
        self.classes.borrow().len()
    }

    /// Is `class` a handle into this realm?
    pub fn contains(&self, class: ClassId) -> bool {
        class.realm_id() == self.id && class.index() < self.classes.borrow().len()
    }

    pub(crate) fn record(&self, class: ClassId) -> Result<Ref<'_, ClassRecord>, ClassError> {
        if !self.contains(class) {
            return Err(ClassError::ReferenceError(format!(
                "class #{} is not defined in this realm",
                class.index()
            )));
        }
        Ok(Ref::map(self.classes.borrow(), |classes| &classes[class.index()]))
    }

    pub fn class_name(&self, class: ClassId) -> Result<String, ClassError> {
        Ok(self.record(class)?.name.clone())
    }

    pub fn parent_of(&self, class: ClassId) -> Option<ClassId> {
        self.record(class).ok().and_then(|record| record.parent)
    }

    pub fn constructor_of(&self, class: ClassId) -> Result<FunctionRef, ClassError> {
        Ok(self.record(class)?.constructor.clone())
    }

    /// Class-level members (`Class.NAME`).
    pub fn members_of(&self, class: ClassId) -> Result<ObjectRef, ClassError> {
        Ok(self.record(class)?.members.clone())
    }

    /// Ancestors of `class`, nearest first. The root class is last.
    pub fn ancestors(&self, class: ClassId) -> Vec<ClassId> {
        let mut result = vec![];
        let mut current = self.parent_of(class);
        while let Some(id) = current {
            result.push(id);
            current = self.parent_of(id);
        }
        result
    }

    pub fn is_subclass_of(&self, class: ClassId, ancestor: ClassId) -> bool {
        self.ancestors(class).contains(&ancestor)
    }

    /// Walk the instance side of `class` and its ancestors for `name`.
    pub(crate) fn lookup(&self, class: ClassId, name: &str) -> Option<Value> {
        if !self.contains(class) {
            return None;
        }
        let classes = self.classes.borrow();
        let mut current = Some(class);
        while let Some(id) = current {
            let record = &classes[id.index()];
            if let Some(value) = record.prototype.get(name) {
                return Some(value.clone());
            }
            current = record.parent;
        }
        None
    }

    /// The implementation of `method` visible one level above `home`.
    pub(crate) fn resolve_super(&self, home: ClassId, method: &str) -> Value {
        self.parent_of(home)
            .and_then(|parent| self.lookup(parent, method))
            .unwrap_or(Value::Undefined)
    }

    /// The instance-side view of a class (`Class.prototype.name`).
    pub fn prototype_property(&self, class: ClassId, name: &str) -> Value {
        self.lookup(class, name).unwrap_or(Value::Undefined)
    }

    pub fn own_prototype_property(&self, class: ClassId, name: &str) -> Option<Value> {
        self.record(class)
            .ok()
            .and_then(|record| record.prototype.get(name).cloned())
    }

    pub fn own_prototype_keys(&self, class: ClassId) -> Vec<String> {
        self.record(class)
            .map(|record| record.prototype.keys())
            .unwrap_or_default()
    }

    /// Class-level member (`Class.NAME`), Undefined when absent.
    pub fn static_property(&self, class: ClassId, name: &str) -> Value {
        self.members_of(class)
            .ok()
            .and_then(|members| members.borrow().get(name).cloned())
            .unwrap_or(Value::Undefined)
    }

    fn class_of_constructor(&self, constructor: &FunctionRef) -> Option<ClassId> {
        self.classes
            .borrow()
            .iter()
            .position(|record| std::rc::Rc::ptr_eq(&record.constructor, constructor))
            .map(|index| ClassId::new(self.id, index))
    }

    // ── Declaration ──────────────────────────────────────────────────────

    /// Declare a class around `constructor`, synthesizing a no-op one when
    /// absent. Declaring a constructor that already backs a class describes
    /// that class and keeps its ancestor.
    pub fn declare(&self, constructor: Option<FunctionRef>) -> Descriptor<'_> {
        if let Some(existing) = constructor
            .as_ref()
            .and_then(|c| self.class_of_constructor(c))
        {
            return Descriptor::new(self, existing);
        }
        let constructor = constructor
            .unwrap_or_else(|| FunctionObject::leaf("", |_ctx, _args| Ok(Value::Undefined)));

        let mut classes = self.classes.borrow_mut();
        let class = ClassId::new(self.id, classes.len());
        let name = constructor.name().to_string();
        let mut record = ClassRecord::new(name, constructor, Some(self.root));
        record
            .prototype
            .define(CONSTRUCTOR_KEY, Value::Class(class), false);
        record
            .prototype
            .insert(SUPER_KEY, Value::Function(self.root_constructor.clone()));
        debug!(class = class.index(), name = %record.name, "declared class");
        classes.push(record);

        Descriptor::new(self, class)
    }

    /// Describe an existing class.
    pub fn describe(&self, class: ClassId) -> Result<Descriptor<'_>, ClassError> {
        self.record(class)?;
        Ok(Descriptor::new(self, class))
    }

    // ── Composition ──────────────────────────────────────────────────────

    pub(crate) fn inherit(&self, subject: ClassId, parent: &Value) {
        let parent = match parent {
            Value::Class(id) if self.contains(*id) => *id,
            other => {
                debug!(
                    class = subject.index(),
                    parent = other.type_name(),
                    "ignored inheritance from a non-class value"
                );
                return;
            }
        };
        if parent == subject || self.is_subclass_of(parent, subject) {
            warn!(
                class = subject.index(),
                parent = parent.index(),
                "rejected cyclic inheritance"
            );
            return;
        }
        let parent_constructor = match self.constructor_of(parent) {
            Ok(constructor) => constructor,
            Err(_) => return,
        };

        {
            let mut classes = self.classes.borrow_mut();
            let record = &mut classes[subject.index()];
            record.parent = Some(parent);
            record
                .prototype
                .define(CONSTRUCTOR_KEY, Value::Class(subject), false);
            record.prototype.remove(SUPER_KEY);
        }
        debug!(
            class = subject.index(),
            parent = parent.index(),
            "linked class to parent"
        );

        let mut link = PropertyTable::new();
        link.insert(SUPER_KEY, Value::Function(parent_constructor));
        self.provide(subject, &link, None);
    }

    /// Copy `properties` onto the instance side of `subject`, binding every
    /// super-using function to `subject`.
    pub(crate) fn provide(
        &self,
        subject: ClassId,
        properties: &PropertyTable,
        exclusions: Option<&HashSet<&'static str>>,
    ) {
        self.install(subject, properties, exclusions, false);
    }

    /// With `keep_bound`, functions already bound to another class keep their
    /// home, so they still reach that class's ancestors.
    fn install(
        &self,
        subject: ClassId,
        properties: &PropertyTable,
        exclusions: Option<&HashSet<&'static str>>,
        keep_bound: bool,
    ) {
        if !self.contains(subject) {
            return;
        }
        let mut classes = self.classes.borrow_mut();
        let prototype = &mut classes[subject.index()].prototype;
        for (name, slot) in properties.iter() {
            if exclusions.map_or(false, |excluded| excluded.contains(name.as_str())) {
                continue;
            }
            if !slot.enumerable && !RESERVED_NAMES.contains(name.as_str()) {
                continue;
            }
            let value = match &slot.value {
                Value::Function(function) if keep_bound && function.is_super_bound() => {
                    slot.value.clone()
                }
                other => attach(subject, name, other),
            };
            prototype.insert(name.clone(), value);
        }
        debug!(
            class = subject.index(),
            count = properties.len(),
            "provided properties"
        );
    }

    pub(crate) fn borrow_from(&self, subject: ClassId, provider: &Provider) {
        let source = match provider {
            Provider::Table(table) => table.properties().clone(),
            Provider::Object(object) => object.borrow().properties().clone(),
            Provider::Class(class) => match self.record(*class) {
                Ok(record) => record.prototype.clone(),
                Err(_) => {
                    debug!(
                        class = subject.index(),
                        source = class.index(),
                        "ignored mixin from an unknown class"
                    );
                    return;
                }
            },
        };
        let keep_bound = matches!(provider, Provider::Class(_));
        self.install(subject, &source, Some(&BORROW_EXCLUSIONS), keep_bound);
    }

    pub(crate) fn make_static(&self, subject: ClassId, properties: &MethodTable) {
        if !self.contains(subject) {
            return;
        }
        let (members, statics) = {
            let mut classes = self.classes.borrow_mut();
            let record = &mut classes[subject.index()];
            let existing = match record.prototype.get(STATIC_KEY) {
                Some(Value::Object(existing)) => Some(existing.clone()),
                _ => None,
            };
            let statics = match existing {
                Some(existing) => existing,
                None => {
                    let created = PlainObject::new_ref();
                    record
                        .prototype
                        .define(STATIC_KEY, Value::Object(created.clone()), false);
                    created
                }
            };
            (record.members.clone(), statics)
        };
        for (name, slot) in properties.properties().iter() {
            members.borrow_mut().insert(name.clone(), slot.value.clone());
            statics.borrow_mut().insert(name.clone(), slot.value.clone());
        }
    }
}

impl Default for Realm {
    fn default() -> Self {
        Self::new()
    }
}

fn attach(home: ClassId, name: &str, value: &Value) -> Value {
    match value {
        Value::Function(function) if function.uses_super() => {
            Value::Function(FunctionObject::bind_super(function, home, name))
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_realm_holds_only_root() {
        let realm = Realm::new();
        assert_eq!(realm.class_count(), 1);
        assert_eq!(realm.parent_of(realm.root()), None);
        assert_eq!(realm.class_name(realm.root()).unwrap(), "Object");
    }

    #[test]
    fn test_declared_class_starts_under_root() {
        let realm = Realm::new();
        let class = realm.declare(None).class();
        assert_eq!(realm.parent_of(class), Some(realm.root()));
        assert_eq!(
            realm.own_prototype_property(class, CONSTRUCTOR_KEY),
            Some(Value::Class(class))
        );
    }

    #[test]
    fn test_foreign_handles_are_rejected() {
        let a = Realm::new();
        let b = Realm::new();
        let class = a.declare(None).class();
        assert!(!b.contains(class));
        assert!(b.describe(class).is_err());
        assert_eq!(b.prototype_property(class, CONSTRUCTOR_KEY), Value::Undefined);
    }

    #[test]
    fn test_only_super_users_are_bound() {
        let realm = Realm::new();
        let class = realm.declare(None).class();
        let table = MethodTable::new()
            .leaf("plain", |_ctx, _args| Ok(Value::Undefined))
            .overriding("bound", |ctx, args| ctx.call_super(args));
        realm.provide(class, table.properties(), None);

        let plain = realm.prototype_property(class, "plain");
        let bound = realm.prototype_property(class, "bound");
        assert!(!plain.as_function().unwrap().is_super_bound());
        assert_eq!(bound.as_function().unwrap().home(), Some(class));
    }

    #[test]
    fn test_ancestors_are_nearest_first() {
        let realm = Realm::new();
        let a = realm.declare(None).class();
        let b = realm.declare(None);
        b.inherits(a);
        assert_eq!(realm.ancestors(b.class()), vec![a, realm.root()]);
        assert!(realm.is_subclass_of(b.class(), a));
        assert!(!realm.is_subclass_of(a, b.class()));
    }
}
