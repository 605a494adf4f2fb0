//! Construction-time checks: signatures, completeness, interface sets.

use covenant::{BindError, Incompatibility, InterfaceBuilder, ModelBuilder, Value};

use super::common::{options, plain_xyz_interface, returns, sig, two_method_interface};

// ============================================================================
// SINGLE INTERFACE
// ============================================================================

#[test]
fn test_simple_implementation() {
    let iface = plain_xyz_interface("MyInterface");
    let model = ModelBuilder::new("Impl")
        .implements(&iface)
        .method_fn("func", sig("self, x, y, z=13"), returns(Value::None))
        .bind(&options())
        .unwrap();
    assert_eq!(model.revalidated(), ["func".to_string()]);
    assert!(model.method("func").unwrap().is_checked());
}

#[test]
fn test_wrong_implementation() {
    let iface = plain_xyz_interface("MyInterface");
    let err = ModelBuilder::new("Impl")
        .implements(&iface)
        .method_fn("func", sig("self, x, y"), returns(Value::None))
        .bind(&options())
        .unwrap_err();
    assert_eq!(
        err,
        BindError::SignatureIncompatible {
            model: "Impl".into(),
            interface: "MyInterface".into(),
            method: "func".into(),
            reason: Incompatibility::TooFewParameters {
                contract: 4,
                implementation: 3,
            },
        }
    );
}

#[test]
fn test_not_all_methods_implemented() {
    let err = ModelBuilder::new("Impl")
        .implements(&two_method_interface())
        .method_fn("func", sig("self, x, y, z"), returns(Value::None))
        .bind(&options())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "method `func2` required by MyInterface is not implemented by Impl"
    );
}

// ============================================================================
// INHERITED IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_wrong_base_implementation() {
    let base = ModelBuilder::new("ImplFirstFunc")
        .method_fn("func2", sig("self, x, y"), returns(Value::None))
        .bind(&options())
        .unwrap();
    let err = ModelBuilder::new("Impl")
        .extends(&base)
        .implements(&two_method_interface())
        .method_fn("func", sig("self, x, y, z"), returns(Value::None))
        .bind(&options())
        .unwrap_err();
    assert!(matches!(
        err,
        BindError::SignatureIncompatible { ref method, .. } if method == "func2"
    ));
}

#[test]
fn test_all_methods_implemented_through_base() {
    let base = ModelBuilder::new("ImplFirstFunc")
        .method_fn("func2", sig("self, x"), returns(Value::None))
        .bind(&options())
        .unwrap();
    let model = ModelBuilder::new("Impl")
        .extends(&base)
        .implements(&two_method_interface())
        .method_fn("func", sig("self, x, y, z"), returns(Value::None))
        .bind(&options())
        .unwrap();
    let func2 = model.method("func2").unwrap();
    assert_eq!(func2.defined_in(), "ImplFirstFunc");
    assert!(func2.is_checked());
    // The base itself is untouched.
    assert!(!base.method("func2").unwrap().is_checked());
}

#[test]
fn test_first_parent_wins_method_lookup() {
    let left = ModelBuilder::new("Left")
        .method_fn("func", sig("self, x"), returns("left"))
        .bind(&options())
        .unwrap();
    let right = ModelBuilder::new("Right")
        .method_fn("func", sig("self, x"), returns("right"))
        .bind(&options())
        .unwrap();
    let model = ModelBuilder::new("Both")
        .extends(&left)
        .extends(&right)
        .bind(&options())
        .unwrap();
    assert_eq!(
        model.call("func", &covenant::args![1]),
        Ok(Value::from("left"))
    );
}

// ============================================================================
// INTERFACE SETS
// ============================================================================

#[test]
fn test_disjoint_interfaces_need_every_method() {
    let first = plain_xyz_interface("MyInterface1");
    let second = InterfaceBuilder::new("MyInterface2")
        .method("func2", sig("x"))
        .build();

    let err = ModelBuilder::new("Impl")
        .implements(&first)
        .implements(&second)
        .method_fn("func", sig("self, x, y, z"), returns(Value::None))
        .bind(&options())
        .unwrap_err();
    assert!(matches!(err, BindError::MissingImplementation { .. }));

    let model = ModelBuilder::new("Impl")
        .implements(&first)
        .implements(&second)
        .method_fn("func", sig("self, x, y, z"), returns(Value::None))
        .method_fn("func2", sig("self, x"), returns(Value::None))
        .bind(&options())
        .unwrap();
    assert_eq!(model.interfaces().len(), 2);
}

#[test]
fn test_conflicting_interfaces() {
    let first = plain_xyz_interface("MyInterface1");
    let second = InterfaceBuilder::new("MyInterface2")
        .method("func", sig("x"))
        .build();

    let err = ModelBuilder::new("Impl")
        .implements(&first)
        .implements(&second)
        .method_fn("func", sig("self, x, y, z"), returns(Value::None))
        .bind(&options())
        .unwrap_err();
    assert!(matches!(
        err,
        BindError::InterfaceConflict { ref first, ref second, .. }
            if first == "MyInterface1" && second == "MyInterface2"
    ));
}

#[test]
fn test_allow_overlap_uses_later_contract() {
    let first = plain_xyz_interface("MyInterface1");
    let second = InterfaceBuilder::new("MyInterface2")
        .method("func", sig("x"))
        .build();

    let model = ModelBuilder::new("Impl")
        .implements(&first)
        .implements(&second)
        .allow_overlap(true)
        .method_fn("func", sig("self, x"), returns(Value::None))
        .bind(&options())
        .unwrap();
    assert_eq!(model.checked_against()["func"].name(), "MyInterface2");
}

#[test]
fn test_related_interfaces_override_instead_of_conflicting() {
    let base = plain_xyz_interface("Base");
    let extended = InterfaceBuilder::new("Extended")
        .extends(&base)
        .method("func", sig("x, y, z, w=0"))
        .build();

    let err = ModelBuilder::new("Old")
        .implements(&base)
        .implements(&extended)
        .method_fn("func", sig("self, x, y, z"), returns(Value::None))
        .bind(&options())
        .unwrap_err();
    assert!(matches!(
        err,
        BindError::SignatureIncompatible { ref interface, .. } if interface == "Extended"
    ));

    let model = ModelBuilder::new("New")
        .implements(&base)
        .implements(&extended)
        .method_fn("func", sig("self, x, y, z, w=0"), returns(Value::None))
        .bind(&options())
        .unwrap();
    assert_eq!(model.checked_against()["func"].name(), "Extended");
}

#[test]
fn test_interfaces_are_inherited_by_submodels() {
    let iface = two_method_interface();
    let base = ModelBuilder::new("Base")
        .implements(&iface)
        .method_fn("func", sig("self, x, y, z"), returns(Value::None))
        .method_fn("func2", sig("self, x"), returns(Value::None))
        .bind(&options())
        .unwrap();

    // Overriding with a bad signature is caught even though the child
    // lists no interfaces itself.
    let err = ModelBuilder::new("Child")
        .extends(&base)
        .method_fn("func2", sig("self"), returns(Value::None))
        .bind(&options())
        .unwrap_err();
    assert!(matches!(err, BindError::SignatureIncompatible { .. }));
}
