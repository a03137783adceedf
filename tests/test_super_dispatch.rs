extern crate lineage;

use lineage::{ClassError, Descriptor, MethodTable, Realm, RealmConfig, Value};
use std::panic::{catch_unwind, AssertUnwindSafe};

fn number(args: &[Value]) -> f64 {
    args.first().and_then(Value::as_number).unwrap_or(0.0)
}

fn base_with_label<'r>(realm: &'r Realm) -> Descriptor<'r> {
    let base = realm.declare(None);
    base.provides(MethodTable::new().leaf("label", |_ctx, _args| Ok(Value::from("base"))));
    base
}

// ── Pointer discipline ───────────────────────────────────────────────

#[test]
fn test_reentrant_calls_see_their_own_super() {
    let realm = Realm::new();
    let base = realm.declare(None);
    base.provides(MethodTable::new().leaf("count", |_ctx, args| {
        Ok(Value::from(format!("base{}", number(&args))))
    }));
    let derived = realm.declare(None);
    derived.inherits(&base).provides(MethodTable::new().overriding("count", |ctx, args| {
        let n = number(&args);
        let inner = if n > 0.0 {
            format!("{} ", ctx.call_method("count", vec![Value::from(n - 1.0)])?)
        } else {
            String::new()
        };
        let upper = ctx.call_super(args)?;
        Ok(Value::from(format!("{}{}", inner, upper)))
    }));

    let instance = Value::Instance(derived.construct(vec![]).unwrap());
    assert_eq!(
        realm
            .call_method(&instance, "count", vec![Value::from(2)])
            .unwrap(),
        Value::from("base0 base1 base2")
    );
    assert_eq!(instance.as_instance().unwrap().super_pointer(), None);
}

#[test]
fn test_different_methods_nest_independently() {
    let realm = Realm::new();
    let base = realm.declare(None);
    base.provides(
        MethodTable::new()
            .leaf("outer", |_ctx, _args| Ok(Value::from("base outer")))
            .leaf("inner", |_ctx, _args| Ok(Value::from("base inner"))),
    );
    let derived = realm.declare(None);
    derived.inherits(&base).provides(
        MethodTable::new()
            .overriding("outer", |ctx, args| {
                let inner = ctx.call_method("inner", vec![])?;
                let upper = ctx.call_super(args)?;
                Ok(Value::from(format!("{} / {}", inner, upper)))
            })
            .overriding("inner", |ctx, args| ctx.call_super(args)),
    );

    let instance = Value::Instance(derived.construct(vec![]).unwrap());
    assert_eq!(
        realm.call_method(&instance, "outer", vec![]).unwrap(),
        Value::from("base inner / base outer")
    );
}

#[test]
fn test_pointer_restored_when_body_fails() {
    let realm = Realm::new();
    let base = base_with_label(&realm);
    let derived = realm.declare(None);
    derived.inherits(&base).provides(MethodTable::new().overriding("label", |ctx, args| {
        ctx.call_super(args)?;
        Err(ClassError::TypeError("label failed".to_string()))
    }));

    let instance = derived.construct(vec![]).unwrap();
    let receiver = Value::Instance(instance.clone());
    let err = realm.call_method(&receiver, "label", vec![]).unwrap_err();
    assert_eq!(err, ClassError::TypeError("label failed".to_string()));
    assert_eq!(instance.super_pointer(), None);
}

#[test]
fn test_pointer_restored_when_outer_super_follows_a_failed_inner_call() {
    let realm = Realm::new();
    let base = base_with_label(&realm);
    base.provides(MethodTable::new().leaf("broken", |_ctx, _args| {
        Err(ClassError::ReferenceError("broken".to_string()))
    }));
    let derived = realm.declare(None);
    derived.inherits(&base).provides(
        MethodTable::new()
            .overriding("broken", |ctx, args| ctx.call_super(args))
            .overriding("label", |ctx, args| {
                assert!(ctx.call_method("broken", vec![]).is_err());
                ctx.call_super(args)
            }),
    );

    let instance = Value::Instance(derived.construct(vec![]).unwrap());
    assert_eq!(realm.call_method(&instance, "label", vec![]).unwrap(), Value::from("base"));
}

#[test]
fn test_pointer_restored_when_body_panics() {
    let realm = Realm::new();
    let base = base_with_label(&realm);
    let derived = realm.declare(None);
    derived.inherits(&base).provides(MethodTable::new().overriding("label", |ctx, args| {
        ctx.call_super(args)?;
        panic!("label panicked");
    }));

    let instance = derived.construct(vec![]).unwrap();
    let receiver = Value::Instance(instance.clone());
    let outcome = catch_unwind(AssertUnwindSafe(|| realm.call_method(&receiver, "label", vec![])));
    assert!(outcome.is_err());
    assert_eq!(instance.super_pointer(), None);

    derived.provides(MethodTable::new().overriding("label", |ctx, args| ctx.call_super(args)));
    assert_eq!(realm.call_method(&receiver, "label", vec![]).unwrap(), Value::from("base"));
}

#[test]
fn test_super_from_a_leaf_method_is_the_constructor_link() {
    let realm = Realm::new();
    let base = realm.declare(None);
    let derived = realm.declare(None);
    derived.inherits(&base).provides(MethodTable::new().leaf("plain", |ctx, args| {
        ctx.call_super(args)
    }));

    let instance = Value::Instance(derived.construct(vec![]).unwrap());
    assert_eq!(realm.call_method(&instance, "plain", vec![]).unwrap(), Value::Undefined);
}

#[test]
fn test_super_on_a_non_instance_receiver_fails() {
    let realm = Realm::new();
    let class = realm.declare(None);
    class.has_static(MethodTable::new().overriding("create", |ctx, args| ctx.call_super(args)));
    let err = realm
        .call_method(&Value::Class(class.class()), "create", vec![])
        .unwrap_err();
    assert!(matches!(err, ClassError::TypeError(_)));
}

// ── Call depth ───────────────────────────────────────────────────────

#[test]
fn test_runaway_recursion_is_a_range_error() {
    let realm = Realm::with_config(RealmConfig::new().with_max_call_depth(32));
    let base = base_with_label(&realm);
    let derived = realm.declare(None);
    derived.inherits(&base).provides(
        MethodTable::new()
            .overriding("label", |ctx, args| ctx.call_method("label", args))
            .leaf("ok", |_ctx, _args| Ok(Value::from(true))),
    );

    let instance = derived.construct(vec![]).unwrap();
    let receiver = Value::Instance(instance.clone());
    let err = realm.call_method(&receiver, "label", vec![]).unwrap_err();
    assert!(matches!(err, ClassError::RangeError(_)));
    assert_eq!(instance.super_pointer(), None);

    assert_eq!(realm.call_method(&receiver, "ok", vec![]).unwrap(), Value::from(true));
}

#[test]
fn test_deep_chains_dispatch_within_the_limit() {
    let realm = Realm::with_config(RealmConfig::new().with_max_call_depth(256));
    let mut current = base_with_label(&realm).class();
    for _ in 0..20 {
        let next = realm.declare(None);
        next.inherits(current).provides(MethodTable::new().overriding("label", |ctx, args| {
            Ok(Value::from(format!("{}+", ctx.call_super(args)?)))
        }));
        current = next.class();
    }

    let instance = Value::Instance(realm.construct(current, vec![]).unwrap());
    let expected = format!("base{}", "+".repeat(20));
    assert_eq!(realm.call_method(&instance, "label", vec![]).unwrap(), Value::from(expected));
}
