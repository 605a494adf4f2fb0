//! Dunder names, forced checks and exclusions.

use covenant::{
    args, check, ensure, BindError, CallError, InterfaceBuilder, InterfaceHandle, ModelBuilder,
    Value,
};

use super::common::{options, returns, sig};

fn special_interface() -> InterfaceHandle {
    InterfaceBuilder::new("MyInterface")
        .method("__str__", sig("self"))
        .method("__my_special_method__", sig("self"))
        .force_check(
            "__len__",
            sig("self"),
            check::output(|_, result| {
                ensure(
                    result.as_int().is_some_and(|n| n > 0),
                    "length must be positive",
                )
            }),
        )
        .exclude("some_func", sig("self"))
        .build()
}

#[test]
fn test_only_forced_dunder_is_required() {
    let err = ModelBuilder::new("Impl")
        .implements(&special_interface())
        .method_fn("some_func", sig("self"), returns(Value::None))
        .bind(&options())
        .unwrap_err();
    assert!(matches!(
        err,
        BindError::MissingImplementation { ref method, .. } if method == "__len__"
    ));
}

#[test]
fn test_forced_dunder_is_checked_at_runtime() {
    let model = ModelBuilder::new("Impl")
        .implements(&special_interface())
        .method_fn("__len__", sig("self"), returns(10))
        .bind(&options())
        .unwrap();
    assert_eq!(model.call("__len__", &args![]), Ok(Value::Int(10)));

    let model = ModelBuilder::new("Negative")
        .implements(&special_interface())
        .method_fn("__len__", sig("self"), returns(-10))
        .bind(&options())
        .unwrap();
    assert!(matches!(
        model.call("__len__", &args![]),
        Err(CallError::ContractViolation { .. })
    ));
}

#[test]
fn test_excluded_names_are_not_validated() {
    let model = ModelBuilder::new("Impl")
        .implements(&special_interface())
        .method_fn("__len__", sig("self"), returns(1))
        .method_fn("some_func", sig("self, a, b, c"), returns(Value::None))
        .method_fn("__str__", sig("self, extra"), returns("x"))
        .bind(&options())
        .unwrap();
    assert_eq!(model.revalidated(), ["__len__".to_string()]);
    assert!(!model.method("some_func").unwrap().is_checked());
}
