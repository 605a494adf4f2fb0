//! Descriptor construction and argument binding through the public API.

use super::common::sig;
use covenant::{args, ArgumentError, CallArgs, SignatureDescriptor, SignatureError, Value};

#[test]
fn test_builder_matches_parsed_form() {
    let built = SignatureDescriptor::builder()
        .receiver()
        .params(["x", "y"])
        .default_param("z", 13)
        .var_keyword("options")
        .build()
        .unwrap();
    assert_eq!(built, sig("self, x, y, z=13, **options"));
    assert_eq!(built.to_string(), "(self, x, y, z=13, **options)");
    assert_eq!(built.required_count(), 3);
}

#[test]
fn test_literal_defaults_round_trip_through_display() {
    let parsed = sig("a='text', b=1.5, c=None, d=True, e=[1, 'two']");
    assert_eq!(parsed.default_for("a"), Some(&Value::from("text")));
    assert_eq!(parsed.default_for("c"), Some(&Value::None));
    assert_eq!(sig(&parsed.to_string()), parsed);
}

#[test]
fn test_structural_errors() {
    assert_eq!(
        "x, 1y".parse::<SignatureDescriptor>(),
        Err(SignatureError::InvalidName("1y".into()))
    );
    assert!(matches!(
        "*rest, x".parse::<SignatureDescriptor>(),
        Err(SignatureError::MisplacedVariadic(_))
    ));
    assert!(matches!(
        "x=".parse::<SignatureDescriptor>(),
        Err(SignatureError::InvalidLiteral(_))
    ));
}

#[test]
fn test_receiver_is_never_supplied_by_callers() {
    let call_sig = sig("self, x, y=2").without_receiver();
    let bound = call_sig.bind(&args![1]).unwrap();
    assert_eq!(bound.get("x"), Some(&Value::Int(1)));
    assert_eq!(bound.get("y"), Some(&Value::Int(2)));
    assert_eq!(bound.get("self"), None);
}

#[test]
fn test_keywords_and_catch_alls() {
    let call_sig = sig("a, b=0, *rest, **kw");
    let args = CallArgs::new()
        .arg(1)
        .arg(2)
        .arg(3)
        .kwarg("flag", true);
    let bound = call_sig.bind(&args).unwrap();
    assert_eq!(bound.extra_positional(), [Value::Int(3)]);
    assert_eq!(bound.get("flag"), Some(&Value::Bool(true)));

    let err = sig("a").bind(&CallArgs::new().arg(1).kwarg("a", 2)).unwrap_err();
    assert_eq!(err, ArgumentError::MultipleValues("a".into()));
}
