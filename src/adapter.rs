// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime wrapper enforcing the two-phase check protocol around a bound
//! method.
//!
//! Call order for an adapted method:
//!
//! 1. bind the caller's arguments against the contract signature
//! 2. run the check body's first phase (a violation here aborts the call,
//!    the implementation never runs)
//! 3. run the real implementation
//! 4. if the check suspended, resume it once with the result; a violation
//!    here is reported after the implementation's side effects happened
//!
//! The adapter holds no mutable state. Each call gets a fresh check routine.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::check::{CheckBody, CheckState};
use crate::error::{CallError, Violation};
use crate::interface::ContractMethod;
use crate::signature::{BoundArgs, CallArgs, SignatureDescriptor};
use crate::value::Value;

/// Which half of a two-phase check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckPhase {
    Input,
    Output,
}

impl fmt::Display for CheckPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckPhase::Input => f.write_str("input"),
            CheckPhase::Output => f.write_str("output"),
        }
    }
}

/// The real body of a model method.
pub type MethodFn = Arc<dyn Fn(&BoundArgs) -> Result<Value, CallError> + Send + Sync>;

/// Wrap a closure as a [`MethodFn`].
pub fn method_fn<F>(body: F) -> MethodFn
where
    F: Fn(&BoundArgs) -> Result<Value, CallError> + Send + Sync + 'static,
{
    Arc::new(body)
}

/// A raw implementation: its declared signature plus the function.
#[derive(Clone)]
pub struct Implementation {
    signature: SignatureDescriptor,
    call_signature: SignatureDescriptor,
    body: MethodFn,
}

impl Implementation {
    /// `signature` is the declared parameter list, receiver included.
    pub fn new(signature: SignatureDescriptor, body: MethodFn) -> Self {
        let call_signature = signature.without_receiver();
        Self {
            signature,
            call_signature,
            body,
        }
    }

    pub fn signature(&self) -> &SignatureDescriptor {
        &self.signature
    }

    /// Bind `args` against this implementation's own signature and run it.
    pub fn invoke(&self, method: &str, args: &CallArgs) -> Result<Value, CallError> {
        let bound =
            self.call_signature
                .bind(args)
                .map_err(|reason| CallError::ArgumentBinding {
                    method: method.to_string(),
                    reason,
                })?;
        (self.body)(&bound)
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implementation")
            .field("signature", &self.signature.to_string())
            .finish_non_exhaustive()
    }
}

/// Wraps an implementation with a contract's check body.
#[derive(Clone)]
pub struct CheckAdapter {
    method: String,
    contract_signature: SignatureDescriptor,
    body: Option<CheckBody>,
    implementation: Implementation,
}

impl CheckAdapter {
    pub fn new(method: impl Into<String>, contract: &ContractMethod, implementation: Implementation) -> Self {
        Self {
            method: method.into(),
            contract_signature: contract.signature().without_receiver(),
            body: contract.body().cloned(),
            implementation,
        }
    }

    /// The wrapped implementation, as it was before adaptation.
    pub fn raw(&self) -> &Implementation {
        &self.implementation
    }

    pub fn call(&self, args: &CallArgs) -> Result<Value, CallError> {
        let Some(body) = &self.body else {
            return self.implementation.invoke(&self.method, args);
        };

        let bound = self
            .contract_signature
            .bind(args)
            .map_err(|reason| CallError::ArgumentBinding {
                method: self.method.clone(),
                reason,
            })?;

        let state = body
            .begin(&bound)
            .map_err(|violation| self.violation(CheckPhase::Input, violation))?;
        debug!(method = %self.method, suspended = !state.is_complete(), "input check passed");

        let result = self.implementation.invoke(&self.method, args)?;

        match state {
            CheckState::Complete => Ok(result),
            CheckState::Suspended(next) => match next.resume(&result) {
                Ok(CheckState::Complete) => {
                    debug!(method = %self.method, "output check passed");
                    Ok(result)
                }
                Ok(CheckState::Suspended(_)) => Err(CallError::MalformedCheckFunction {
                    method: self.method.clone(),
                }),
                Err(violation) => Err(self.violation(CheckPhase::Output, violation)),
            },
        }
    }

    fn violation(&self, phase: CheckPhase, violation: Violation) -> CallError {
        debug!(method = %self.method, %phase, %violation, "contract violation");
        CallError::ContractViolation {
            method: self.method.clone(),
            phase,
            violation,
        }
    }
}

impl fmt::Debug for CheckAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckAdapter")
            .field("method", &self.method)
            .field("contract", &self.contract_signature.to_string())
            .field("has_body", &self.body.is_some())
            .field("implementation", &self.implementation)
            .finish()
    }
}
