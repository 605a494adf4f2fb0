//! Call-time checks: argument validation, result validation, adapters on
//! inherited methods, and the memo that avoids re-wrapping.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use covenant::{
    args, check, BindError, CallError, CheckPhase, CheckState, InterfaceBuilder, ModelBuilder,
    Value, ValueKind, Violation,
};

use super::common::{
    counting, options, returns, sig, unchecked, xyz_check, xyz_int_result_check,
};

fn assert_violation(result: Result<Value, CallError>, phase: CheckPhase) {
    match result {
        Err(CallError::ContractViolation { phase: got, .. }) => assert_eq!(got, phase),
        other => panic!("expected {} violation, got {:?}", phase, other),
    }
}

#[test]
fn test_check_parameters() {
    let iface = InterfaceBuilder::new("MyInterface")
        .checked_method("func", sig("x, y, z"), xyz_check())
        .build();
    let model = ModelBuilder::new("Impl")
        .implements(&iface)
        .method_fn("func", sig("self, x, y, z"), returns(Value::None))
        .bind(&options())
        .unwrap();

    assert_eq!(model.call("func", &args![1, "ff", 2]), Ok(Value::None));
    assert_violation(model.call("func", &args!["f", "ff", 1]), CheckPhase::Input);
    assert_violation(model.call("func", &args![1, 1, 1]), CheckPhase::Input);
    // z must exceed x
    assert_violation(model.call("func", &args![2, "ff", 1]), CheckPhase::Input);
}

#[test]
fn test_check_parameters_with_receiver_in_contract() {
    let iface = InterfaceBuilder::new("MyInterface")
        .checked_method("func", sig("self, x, y, z"), xyz_check())
        .build();
    let model = ModelBuilder::new("Impl")
        .implements(&iface)
        .method_fn("func", sig("self, x, y, z"), returns(Value::None))
        .bind(&options())
        .unwrap();

    assert!(model.call("func", &args![1, "ff", 2]).is_ok());
    assert_violation(model.call("func", &args!["f", "ff", 1]), CheckPhase::Input);
}

#[test]
fn test_check_parameters_and_result() {
    let iface = InterfaceBuilder::new("MyInterface")
        .checked_method("func", sig("self, x, y, z"), xyz_int_result_check())
        .build();
    let good = ModelBuilder::new("Good")
        .implements(&iface)
        .method_fn("func", sig("self, x, y, z"), returns(12))
        .bind(&options())
        .unwrap();
    assert_eq!(good.call("func", &args![1, "ff", 2]), Ok(Value::Int(12)));

    let (body, calls) = counting("twelve");
    let bad = ModelBuilder::new("Bad")
        .implements(&iface)
        .method_fn("func", sig("self, x, y, z"), body)
        .bind(&options())
        .unwrap();
    assert_violation(bad.call("func", &args![1, "ff", 2]), CheckPhase::Output);
    // The output check runs after the body, so its side effects happened.
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // An input failure never reaches the body.
    assert_violation(bad.call("func", &args!["1", "ff", 2]), CheckPhase::Input);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_keyword_arguments_are_checked_by_name() {
    let iface = InterfaceBuilder::new("MyInterface")
        .checked_method("func", sig("x, y, z"), xyz_check())
        .build();
    let model = ModelBuilder::new("Impl")
        .implements(&iface)
        .method_fn("func", sig("self, x, y, z=13"), returns(Value::None))
        .bind(&options())
        .unwrap();

    let call = covenant::CallArgs::new().arg(1).kwarg("z", 5).kwarg("y", "ff");
    assert!(model.call("func", &call).is_ok());
    let call = covenant::CallArgs::new().arg(1).kwarg("z", 5).kwarg("y", 0);
    assert_violation(model.call("func", &call), CheckPhase::Input);
}

#[test]
fn test_inherited_methods_guarded() {
    let iface = InterfaceBuilder::new("MyInterface")
        .checked_method("func", sig("self, x, y, z"), xyz_int_result_check())
        .build();
    let base = ModelBuilder::new("MeBase")
        .method_fn("func", sig("self, x, y, z"), returns(12))
        .bind(&options())
        .unwrap();
    let model = ModelBuilder::new("Impl")
        .extends(&base)
        .implements(&iface)
        .bind(&options())
        .unwrap();

    assert_eq!(model.call("func", &args![1, "ff", 2]), Ok(Value::Int(12)));
    assert_violation(model.call("func", &args!["f", "ff", 1]), CheckPhase::Input);
    assert_violation(model.call("func", &args![1, 1, 1]), CheckPhase::Input);
    // The plain base is still unguarded.
    assert!(base.call("func", &args!["f", "ff", 1]).is_ok());
}

#[test]
fn test_unchecked_parent_is_wrapped_by_checked_child() {
    let iface = InterfaceBuilder::new("MyInterface")
        .checked_method(
            "func",
            sig("self, x"),
            check::input(|args| {
                args.expect_kind("x", ValueKind::Int)?;
                Ok(())
            }),
        )
        .build();
    let base = ModelBuilder::new("Base")
        .implements(&iface)
        .method_fn("func", sig("self, x"), returns(Value::None))
        .bind(&unchecked())
        .unwrap();
    assert!(!base.method("func").unwrap().is_checked());

    let child = ModelBuilder::new("Child")
        .extends(&base)
        .bind(&options())
        .unwrap();
    assert!(child.runtime_check());
    assert!(child.method("func").unwrap().is_checked());
    assert_eq!(child.revalidated(), ["func".to_string()]);
    assert_violation(child.call("func", &args!["s"]), CheckPhase::Input);
    assert!(child.call("func", &args![3]).is_ok());

    // A checked parent keeps its adapter and is not revalidated.
    let grandchild = ModelBuilder::new("Grandchild")
        .extends(&child)
        .bind(&options())
        .unwrap();
    assert!(grandchild.revalidated().is_empty());
    assert_violation(grandchild.call("func", &args!["s"]), CheckPhase::Input);
}

#[test]
fn test_inherited_from_implementations_guarded() {
    let first = InterfaceBuilder::new("MyInterface")
        .checked_method("func", sig("self, x, y, z"), xyz_int_result_check())
        .build();
    let second = InterfaceBuilder::new("MyInterface2")
        .checked_method(
            "func2",
            sig("x"),
            check::input(|args| {
                args.expect_kind("x", ValueKind::Float)?;
                Ok(())
            }),
        )
        .build();

    let base = ModelBuilder::new("MeBase")
        .implements(&first)
        .method_fn("func", sig("self, x, y, z"), returns(12))
        .bind(&options())
        .unwrap();
    let model = ModelBuilder::new("Impl")
        .extends(&base)
        .implements(&second)
        .method_fn("func2", sig("self, x"), returns(Value::None))
        .bind(&options())
        .unwrap();

    // func was already validated against MyInterface by the base.
    assert_eq!(model.revalidated(), ["func2".to_string()]);
    assert!(Arc::ptr_eq(
        model.method("func").unwrap(),
        base.method("func").unwrap()
    ));

    assert!(model.call("func", &args![1, "ff", 2]).is_ok());
    assert!(model.call("func2", &args![1.2]).is_ok());
    assert_violation(model.call("func", &args!["f", "ff", 1]), CheckPhase::Input);
    assert_violation(model.call("func", &args![1, 1, 1]), CheckPhase::Input);
    assert_violation(model.call("func2", &args![Value::None]), CheckPhase::Input);
}

#[test]
fn test_memo_invalidated_by_new_owner() {
    let first = InterfaceBuilder::new("First")
        .checked_method("func", sig("x"), check::input(|_| Ok(())))
        .build();
    let stricter = InterfaceBuilder::new("Stricter")
        .extends(&first)
        .checked_method(
            "func",
            sig("x"),
            check::input(|args| {
                args.expect_kind("x", ValueKind::Int)?;
                Ok(())
            }),
        )
        .build();

    let base = ModelBuilder::new("Base")
        .implements(&first)
        .method_fn("func", sig("self, x"), returns(Value::None))
        .bind(&options())
        .unwrap();
    let child = ModelBuilder::new("Child")
        .extends(&base)
        .implements(&stricter)
        .bind(&options())
        .unwrap();

    assert_eq!(child.revalidated(), ["func".to_string()]);
    assert_eq!(child.checked_against()["func"].name(), "Stricter");
    // Re-wrapped from the raw body: only the stricter check applies.
    assert!(base.call("func", &args!["s"]).is_ok());
    assert_violation(child.call("func", &args!["s"]), CheckPhase::Input);
    assert_eq!(child.method("func").unwrap().defined_in(), "Base");
}

#[test]
fn test_runtime_check_disabled_skips_wrapping() {
    let iface = InterfaceBuilder::new("MyInterface")
        .checked_method("func", sig("x, y, z"), xyz_check())
        .build();
    let model = ModelBuilder::new("Impl")
        .implements(&iface)
        .method_fn("func", sig("self, x, y, z"), returns(Value::None))
        .bind(&unchecked())
        .unwrap();
    assert!(!model.runtime_check());
    assert!(model.call("func", &args!["f", "ff", 1]).is_ok());

    // Signature validation still happens.
    let err = ModelBuilder::new("Bad")
        .implements(&iface)
        .method_fn("func", sig("self, x"), returns(Value::None))
        .bind(&unchecked())
        .unwrap_err();
    assert!(matches!(err, BindError::SignatureIncompatible { .. }));
}

#[test]
fn test_bug_in_check_function() {
    let iface = InterfaceBuilder::new("MyInterface")
        .checked_method(
            "func",
            sig("self, x, y, z"),
            check::staged(|_| {
                Ok(CheckState::suspend(
                    |_: &Value| -> Result<CheckState, Violation> {
                        Ok(CheckState::suspend(
                            |_: &Value| -> Result<CheckState, Violation> {
                                Ok(CheckState::Complete)
                            },
                        ))
                    },
                ))
            }),
        )
        .build();
    let model = ModelBuilder::new("Impl")
        .implements(&iface)
        .method_fn("func", sig("self, x, y, z"), returns(12))
        .bind(&options())
        .unwrap();

    assert_eq!(
        model.call("func", &args![1, "ff", 2]),
        Err(CallError::MalformedCheckFunction {
            method: "func".into()
        })
    );
}

#[test]
fn test_interfaces_cannot_be_called() {
    let iface = InterfaceBuilder::new("MyInterface")
        .method("func", sig("x"))
        .build();
    let err = iface.invoke("func", &args![1]).unwrap_err();
    assert_eq!(err.to_string(), "interface function call - MyInterface.func");
}
