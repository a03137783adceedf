use std::fmt;
use std::rc::Rc;

use crate::ds::class::ClassId;
use crate::ds::error::ClassError;
use crate::ds::value::Value;
use crate::runner::dispatch::CallContext;

/// Signature of every method, constructor and static function body.
/// The receiver is reachable through the context.
pub type NativeFn = dyn Fn(&mut CallContext<'_>, Vec<Value>) -> Result<Value, ClassError>;

pub type FunctionRef = Rc<FunctionObject>;

pub enum FunctionKind {
    /// A Rust closure. `uses_super` is the explicit opt-in to super-dispatch.
    Native {
        body: Rc<NativeFn>,
        uses_super: bool,
    },
    /// Trampoline created when a super-using function is installed on a class.
    /// The ancestor implementation of `method` is resolved starting one level
    /// above `home`.
    SuperBound {
        target: FunctionRef,
        home: ClassId,
        method: String,
    },
}

pub struct FunctionObject {
    name: String,
    kind: FunctionKind,
}

impl FunctionObject {
    /// A function that never calls super. Installed as-is, with no call-time
    /// bookkeeping.
    pub fn leaf<F>(name: impl Into<String>, body: F) -> FunctionRef
    where
        F: Fn(&mut CallContext<'_>, Vec<Value>) -> Result<Value, ClassError> + 'static,
    {
        Self::native(name, body, false)
    }

    /// A function that may call [`CallContext::call_super`]. Installing it on a
    /// class binds it to that class.
    pub fn overriding<F>(name: impl Into<String>, body: F) -> FunctionRef
    where
        F: Fn(&mut CallContext<'_>, Vec<Value>) -> Result<Value, ClassError> + 'static,
    {
        Self::native(name, body, true)
    }

    pub fn native<F>(name: impl Into<String>, body: F, uses_super: bool) -> FunctionRef
    where
        F: Fn(&mut CallContext<'_>, Vec<Value>) -> Result<Value, ClassError> + 'static,
    {
        Rc::new(FunctionObject {
            name: name.into(),
            kind: FunctionKind::Native {
                body: Rc::new(body),
                uses_super,
            },
        })
    }

    /// Binds `target` to `home`. An already bound function is unwrapped first so
    /// a re-installed method never stacks trampolines.
    pub(crate) fn bind_super(target: &FunctionRef, home: ClassId, method: &str) -> FunctionRef {
        let target = unbound(target);
        Rc::new(FunctionObject {
            name: target.name.clone(),
            kind: FunctionKind::SuperBound {
                target,
                home,
                method: method.to_string(),
            },
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FunctionKind {
        &self.kind
    }

    pub fn uses_super(&self) -> bool {
        match &self.kind {
            FunctionKind::Native { uses_super, .. } => *uses_super,
            FunctionKind::SuperBound { .. } => true,
        }
    }

    pub fn is_super_bound(&self) -> bool {
        matches!(self.kind, FunctionKind::SuperBound { .. })
    }

    /// The class a super-bound function was installed on.
    pub fn home(&self) -> Option<ClassId> {
        match &self.kind {
            FunctionKind::SuperBound { home, .. } => Some(*home),
            FunctionKind::Native { .. } => None,
        }
    }
}

/// Strips any super binding, returning the function that was installed.
pub fn unbound(function: &FunctionRef) -> FunctionRef {
    match &function.kind {
        FunctionKind::SuperBound { target, .. } => unbound(target),
        FunctionKind::Native { .. } => function.clone(),
    }
}

impl fmt::Debug for FunctionObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FunctionKind::Native { uses_super, .. } => f
                .debug_struct("FunctionObject")
                .field("name", &self.name)
                .field("uses_super", uses_super)
                .finish(),
            FunctionKind::SuperBound { home, method, .. } => f
                .debug_struct("FunctionObject")
                .field("name", &self.name)
                .field("home", &home.index())
                .field("method", method)
                .finish(),
        }
    }
}
