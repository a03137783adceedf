use std::collections::HashSet;
use std::fmt;

use uuid::Uuid;

use crate::ds::function::FunctionRef;
use crate::ds::object::{ObjectRef, PlainObject};
use crate::ds::property::PropertyTable;

/// Instance-side back-reference to the class.
pub const CONSTRUCTOR_KEY: &str = "constructor";
/// Instance-side ancestor link; also the name the super pointer is read under.
pub const SUPER_KEY: &str = "_super";
/// Instance-side back-reference to the static table.
pub const STATIC_KEY: &str = "_static";

lazy_static! {
    /// Built-in names that stay attachable even when the source slot is not
    /// enumerable.
    pub static ref RESERVED_NAMES: HashSet<&'static str> =
        ["toString", "toLocaleString", "valueOf", "isPrototypeOf"]
            .iter()
            .copied()
            .collect();
    /// Structural fields never copied by a mixin.
    pub static ref BORROW_EXCLUSIONS: HashSet<&'static str> =
        [SUPER_KEY, CONSTRUCTOR_KEY].iter().copied().collect();
}

/// Stable handle to a class record inside a realm's arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId {
    realm: Uuid,
    index: usize,
}

impl ClassId {
    pub(crate) fn new(realm: Uuid, index: usize) -> Self {
        ClassId { realm, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn realm_id(&self) -> Uuid {
        self.realm
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId(#{}@{})", self.index, self.realm)
    }
}

pub struct ClassRecord {
    pub(crate) name: String,
    pub(crate) constructor: FunctionRef,
    pub(crate) parent: Option<ClassId>,
    pub(crate) prototype: PropertyTable,
    pub(crate) members: ObjectRef,
}

impl ClassRecord {
    pub(crate) fn new(
        name: impl Into<String>,
        constructor: FunctionRef,
        parent: Option<ClassId>,
    ) -> Self {
        ClassRecord {
            name: name.into(),
            constructor,
            parent,
            prototype: PropertyTable::new(),
            members: PlainObject::new_ref(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<ClassId> {
        self.parent
    }

    pub fn constructor(&self) -> &FunctionRef {
        &self.constructor
    }

    pub fn prototype(&self) -> &PropertyTable {
        &self.prototype
    }

    pub fn members(&self) -> &ObjectRef {
        &self.members
    }
}
