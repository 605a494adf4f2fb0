//! The two-phase check protocol, driven by hand-written routines.

use covenant::{
    check, method_fn, CallError, CheckAdapter, CheckPhase, CheckState, ContractMethod,
    Implementation, ResultCheck, Value, Violation,
};

use super::common::{returns, sig};

/// Accepts non-negative int results only.
struct NonNegative;

impl ResultCheck for NonNegative {
    fn resume(self: Box<Self>, result: &Value) -> Result<CheckState, Violation> {
        match result.as_int() {
            Some(n) if n >= 0 => Ok(CheckState::Complete),
            _ => Err(Violation::new(format!("expected a non-negative int, got {}", result))),
        }
    }
}

fn adapter(body: covenant::CheckBody, implementation: Implementation) -> CheckAdapter {
    let contract = ContractMethod::new("Counter", "count", sig("self, step"), Some(body));
    CheckAdapter::new("count", &contract, implementation)
}

#[test]
fn test_custom_result_check() {
    let body = check::staged(|_| Ok(CheckState::suspend(NonNegative)));

    let ok = adapter(body.clone(), Implementation::new(sig("self, step"), returns(4)));
    assert_eq!(ok.call(&covenant::args![1]), Ok(Value::Int(4)));

    let bad = adapter(body, Implementation::new(sig("self, step"), returns(-4)));
    let err = bad.call(&covenant::args![1]).unwrap_err();
    assert_eq!(
        err,
        CallError::ContractViolation {
            method: "count".into(),
            phase: CheckPhase::Output,
            violation: Violation::new("expected a non-negative int, got -4"),
        }
    );
}

#[test]
fn test_check_sees_contract_names_not_implementation_names() {
    let body = check::input(|args| {
        covenant::ensure(args.get("step").is_some(), "step must be bound")
    });
    // The implementation calls the same slot `step` plus an optional extra.
    let implementation = Implementation::new(
        sig("self, step, scale=1"),
        method_fn(|args| Ok(args.get("scale").cloned().unwrap_or_default())),
    );
    let adapted = adapter(body, implementation);
    assert_eq!(adapted.call(&covenant::args![5]), Ok(Value::Int(1)));
}

#[test]
fn test_implementation_errors_pass_through_untouched() {
    let body = check::output(|_, _| Err(Violation::new("never reached")));
    let implementation = Implementation::new(
        sig("self, step"),
        method_fn(|_| Err(CallError::failed("count", "backend unavailable"))),
    );
    let adapted = adapter(body, implementation);
    assert_eq!(
        adapted.call(&covenant::args![1]),
        Err(CallError::failed("count", "backend unavailable"))
    );
}

#[test]
fn test_raw_implementation_is_recoverable() {
    let adapted = adapter(
        check::input(|_| Ok(())),
        Implementation::new(sig("self, step"), returns(0)),
    );
    assert_eq!(adapted.raw().signature(), &sig("self, step"));
}
