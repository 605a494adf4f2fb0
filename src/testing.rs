//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical implementations of test helpers to avoid duplication.

#![doc(hidden)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::adapter::{method_fn, MethodFn};
use crate::check::{self, CheckBody};
use crate::error::{ensure, CallError};
use crate::signature::{BoundArgs, SignatureDescriptor};
use crate::value::{Value, ValueKind};

/// Parse a signature string, panicking on malformed input.
pub fn sig(src: &str) -> SignatureDescriptor {
    match src.parse() {
        Ok(sig) => sig,
        Err(e) => panic!("bad test signature {:?}: {}", src, e),
    }
}

/// A body that ignores its arguments and returns `value`.
pub fn returns(value: impl Into<Value>) -> MethodFn {
    let value = value.into();
    method_fn(move |_| Ok(value.clone()))
}

/// A body that returns the named argument unchanged.
pub fn echo(name: &'static str) -> MethodFn {
    method_fn(move |args: &BoundArgs| {
        args.get(name)
            .cloned()
            .ok_or_else(|| CallError::failed(name, "argument not bound"))
    })
}

/// A body returning `value` that counts its invocations.
pub fn counting(value: impl Into<Value>) -> (MethodFn, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let value = value.into();
    let body = method_fn(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(value.clone())
    });
    (body, calls)
}

/// Every named argument must be int, and so must the result.
pub fn ints_in_int_out(names: &'static [&'static str]) -> CheckBody {
    check::two_phase(
        move |args| {
            for name in names {
                args.expect_kind(name, ValueKind::Int)?;
            }
            Ok(())
        },
        |_, result| ensure(result.is_a(ValueKind::Int), "result must be int"),
    )
}
