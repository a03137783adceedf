//! Root class built-in.
//!
//! Every declared class descends from the root class, whose instance side
//! carries the generic object methods. They are non-enumerable, like their
//! counterparts on `Object.prototype`, and can be overridden and reached
//! through super like any other method.

use crate::ds::error::ClassError;
use crate::ds::function::{FunctionObject, FunctionRef};
use crate::ds::property::PropertyTable;
use crate::ds::value::Value;
use crate::runner::dispatch::CallContext;

pub const ROOT_CLASS_NAME: &str = "Object";

/// The root constructor. Does nothing; derived constructors may still call it
/// through super.
pub fn root_constructor() -> FunctionRef {
    FunctionObject::leaf(ROOT_CLASS_NAME, object_constructor)
}

/// Install the built-in methods on the root class's instance side.
pub fn install(prototype: &mut PropertyTable) {
    let methods: [(&str, FunctionRef); 5] = [
        ("toString", FunctionObject::leaf("toString", object_to_string)),
        (
            "toLocaleString",
            FunctionObject::leaf("toLocaleString", object_to_locale_string),
        ),
        ("valueOf", FunctionObject::leaf("valueOf", object_value_of)),
        (
            "isPrototypeOf",
            FunctionObject::leaf("isPrototypeOf", object_is_prototype_of),
        ),
        (
            "hasOwnProperty",
            FunctionObject::leaf("hasOwnProperty", object_has_own_property),
        ),
    ];
    for (name, function) in methods.iter() {
        prototype.define(*name, Value::Function(function.clone()), false);
    }
}

fn object_constructor(_ctx: &mut CallContext<'_>, _args: Vec<Value>) -> Result<Value, ClassError> {
    Ok(Value::Undefined)
}

/// Object.prototype.toString
fn object_to_string(ctx: &mut CallContext<'_>, _args: Vec<Value>) -> Result<Value, ClassError> {
    let tag = match ctx.this() {
        Value::Undefined => "Undefined",
        Value::Null => "Null",
        Value::Boolean(_) => "Boolean",
        Value::Number(_) => "Number",
        Value::String(_) => "String",
        Value::Function(_) | Value::Class(_) => "Function",
        Value::Object(_) | Value::Instance(_) => "Object",
    };
    Ok(Value::String(format!("[object {}]", tag)))
}

/// Object.prototype.toLocaleString
fn object_to_locale_string(
    ctx: &mut CallContext<'_>,
    _args: Vec<Value>,
) -> Result<Value, ClassError> {
    ctx.call_method("toString", vec![])
}

/// Object.prototype.valueOf
fn object_value_of(ctx: &mut CallContext<'_>, _args: Vec<Value>) -> Result<Value, ClassError> {
    Ok(ctx.this().clone())
}

/// Object.prototype.isPrototypeOf
///
/// A class receiver stands for its instance side; an instance is never the
/// instance side of another object.
fn object_is_prototype_of(
    ctx: &mut CallContext<'_>,
    args: Vec<Value>,
) -> Result<Value, ClassError> {
    let candidate = match args.first() {
        Some(value) => value,
        None => return Ok(Value::Boolean(false)),
    };
    let result = match ctx.this() {
        Value::Class(class) => ctx.realm().instance_of(candidate, *class),
        _ => false,
    };
    Ok(Value::Boolean(result))
}

/// Object.prototype.hasOwnProperty
fn object_has_own_property(
    ctx: &mut CallContext<'_>,
    args: Vec<Value>,
) -> Result<Value, ClassError> {
    let name = match args.first() {
        Some(Value::String(name)) => name,
        _ => return Ok(Value::Boolean(false)),
    };
    let result = match ctx.this() {
        Value::Instance(instance) => instance.has_own(name),
        Value::Object(object) => object.borrow().has(name),
        _ => false,
    };
    Ok(Value::Boolean(result))
}
