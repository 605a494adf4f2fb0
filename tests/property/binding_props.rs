//! Properties of argument binding and adapted calls.

use covenant::{
    check, BindOptions, CallArgs, CheckPhase, CallError, InterfaceBuilder, ModelBuilder, Value,
    ValueKind,
};
use proptest::prelude::*;

use super::common::{echo, sig};

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::None),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        "[a-z]{0,6}".prop_map(Value::Str),
    ]
}

proptest! {
    /// Binding n positional values against n names never fails and keeps order.
    #[test]
    fn prop_positional_binding_preserves_order(values in prop::collection::vec(value_strategy(), 0..6)) {
        let names: Vec<String> = (0..values.len()).map(|i| format!("p{}", i)).collect();
        let descriptor = covenant::SignatureDescriptor::builder().params(names.clone()).build().unwrap();
        let bound = descriptor.bind(&CallArgs::from(values.clone())).unwrap();
        for (name, value) in names.iter().zip(&values) {
            prop_assert_eq!(bound.get(name), Some(value));
        }
    }

    /// Surplus positionals are rejected unless a catch-all absorbs them.
    #[test]
    fn prop_surplus_positionals(extra in 1usize..4) {
        let args = CallArgs::from(vec![Value::Int(0); 1 + extra]);
        prop_assert!(sig("a").bind(&args).is_err());
        let bound = sig("a, *rest").bind(&args).unwrap();
        prop_assert_eq!(bound.extra_positional().len(), extra);
    }

    /// An int-only contract passes ints through and rejects everything else
    /// before the implementation runs.
    #[test]
    fn prop_adapter_enforces_argument_kind(value in value_strategy()) {
        let iface = InterfaceBuilder::new("Ints")
            .checked_method(
                "id",
                sig("x"),
                check::input(|args| {
                    args.expect_kind("x", ValueKind::Int)?;
                    Ok(())
                }),
            )
            .build();
        let model = ModelBuilder::new("Echo")
            .implements(&iface)
            .method_fn("id", sig("self, x"), echo("x"))
            .bind(&BindOptions::default())
            .unwrap();

        let result = model.call("id", &CallArgs::from(vec![value.clone()]));
        if value.is_a(ValueKind::Int) {
            prop_assert_eq!(result, Ok(value));
        } else {
            let is_input_violation = matches!(
                result,
                Err(CallError::ContractViolation { phase: CheckPhase::Input, .. })
            );
            prop_assert!(is_input_violation);
        }
    }
}
