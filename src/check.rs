// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Check bodies: the validation routines attached to contract methods.
//!
//! A check runs in at most two phases around the real call. [`ContractCheck::begin`]
//! sees the arguments before the implementation runs; it either completes
//! (input-only check) or suspends, handing back a [`ResultCheck`] that is
//! resumed exactly once with the implementation's result.
//!
//! Most checks are built with the constructors in this module:
//!
//! ```
//! use covenant::{check, ensure, ValueKind};
//!
//! let body = check::two_phase(
//!     |args| {
//!         args.expect_kind("x", ValueKind::Int)?;
//!         Ok(())
//!     },
//!     |_args, result| ensure(result.is_a(ValueKind::Int), "result must be int"),
//! );
//! # let _ = body;
//! ```
//!
//! Hand-written routines implement the traits directly (closures work via
//! blanket impls). A routine whose resumption suspends again breaks the
//! protocol; the adapter reports that as a malformed check function.

use std::sync::Arc;

use crate::error::Violation;
use crate::signature::BoundArgs;
use crate::value::Value;

/// Outcome of one step of a check routine.
pub enum CheckState {
    /// Validation finished.
    Complete,
    /// Waiting for the implementation's result.
    Suspended(Box<dyn ResultCheck>),
}

impl CheckState {
    pub fn suspend(next: impl ResultCheck + 'static) -> Self {
        CheckState::Suspended(Box::new(next))
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, CheckState::Complete)
    }
}

impl std::fmt::Debug for CheckState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckState::Complete => f.write_str("Complete"),
            CheckState::Suspended(_) => f.write_str("Suspended"),
        }
    }
}

/// First phase: inspects the call arguments.
pub trait ContractCheck: Send + Sync {
    fn begin(&self, args: &BoundArgs) -> Result<CheckState, Violation>;
}

/// Second phase: inspects the result of the real call.
pub trait ResultCheck: Send {
    fn resume(self: Box<Self>, result: &Value) -> Result<CheckState, Violation>;
}

impl<F> ContractCheck for F
where
    F: Fn(&BoundArgs) -> Result<CheckState, Violation> + Send + Sync,
{
    fn begin(&self, args: &BoundArgs) -> Result<CheckState, Violation> {
        self(args)
    }
}

impl<F> ResultCheck for F
where
    F: FnOnce(&Value) -> Result<CheckState, Violation> + Send,
{
    fn resume(self: Box<Self>, result: &Value) -> Result<CheckState, Violation> {
        (*self)(result)
    }
}

/// Shared handle to a check body.
pub type CheckBody = Arc<dyn ContractCheck>;

type InputFn = dyn Fn(&BoundArgs) -> Result<(), Violation> + Send + Sync;
type OutputFn = dyn Fn(&BoundArgs, &Value) -> Result<(), Violation> + Send + Sync;

/// Validate arguments only; the result passes through unchecked.
pub fn input<F>(validate: F) -> CheckBody
where
    F: Fn(&BoundArgs) -> Result<(), Violation> + Send + Sync + 'static,
{
    Arc::new(move |args: &BoundArgs| -> Result<CheckState, Violation> {
        validate(args)?;
        Ok(CheckState::Complete)
    })
}

/// Validate the result only.
pub fn output<F>(validate: F) -> CheckBody
where
    F: Fn(&BoundArgs, &Value) -> Result<(), Violation> + Send + Sync + 'static,
{
    Arc::new(TwoPhase {
        input: None,
        output: Arc::new(validate),
    })
}

/// Validate arguments before the call and the result after it.
pub fn two_phase<I, O>(validate_input: I, validate_output: O) -> CheckBody
where
    I: Fn(&BoundArgs) -> Result<(), Violation> + Send + Sync + 'static,
    O: Fn(&BoundArgs, &Value) -> Result<(), Violation> + Send + Sync + 'static,
{
    Arc::new(TwoPhase {
        input: Some(Box::new(validate_input)),
        output: Arc::new(validate_output),
    })
}

/// A hand-written staged routine.
pub fn staged<F>(routine: F) -> CheckBody
where
    F: Fn(&BoundArgs) -> Result<CheckState, Violation> + Send + Sync + 'static,
{
    Arc::new(routine)
}

struct TwoPhase {
    input: Option<Box<InputFn>>,
    output: Arc<OutputFn>,
}

impl ContractCheck for TwoPhase {
    fn begin(&self, args: &BoundArgs) -> Result<CheckState, Violation> {
        if let Some(input) = &self.input {
            input(args)?;
        }
        let output = Arc::clone(&self.output);
        let args = args.clone();
        Ok(CheckState::suspend(move |result: &Value| -> Result<CheckState, Violation> {
            output(&args, result)?;
            Ok(CheckState::Complete)
        }))
    }
}
