//! Shared test utilities and fixtures.

#![allow(dead_code)]

use covenant::{
    check, ensure, BindOptions, CheckBody, InterfaceBuilder, InterfaceHandle, ValueKind, Violation,
};

// Re-export canonical test utilities from covenant::testing
pub use covenant::testing::{counting, echo, ints_in_int_out, returns, sig};

/// Options used by most tests: runtime checks on.
pub fn options() -> BindOptions {
    BindOptions::default()
}

/// Options with runtime checks off.
pub fn unchecked() -> BindOptions {
    BindOptions {
        runtime_check: false,
    }
}

/// `x` int, `y` str, `z` int and greater than `x`.
pub fn validate_xyz(args: &covenant::BoundArgs) -> Result<(), Violation> {
    let x = args.expect_kind("x", ValueKind::Int)?.as_int();
    args.expect_kind("y", ValueKind::Str)?;
    let z = args.expect_kind("z", ValueKind::Int)?.as_int();
    ensure(z > x, "z must be greater than x")
}

/// Input-only xyz check.
pub fn xyz_check() -> CheckBody {
    check::input(validate_xyz)
}

/// xyz input check plus an int result.
pub fn xyz_int_result_check() -> CheckBody {
    check::two_phase(validate_xyz, |_, result| {
        ensure(result.is_a(ValueKind::Int), "result must be int")
    })
}

/// `func(x, y, z)` without a check body.
pub fn plain_xyz_interface(name: &str) -> InterfaceHandle {
    InterfaceBuilder::new(name)
        .method("func", sig("x, y, z"))
        .build()
}

/// `func(x, y, z)` plus `func2(x)`, both without check bodies.
pub fn two_method_interface() -> InterfaceHandle {
    InterfaceBuilder::new("MyInterface")
        .method("func", sig("x, y, z"))
        .method("func2", sig("x"))
        .build()
}
