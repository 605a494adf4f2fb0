// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy.
//!
//! Construction-time failures are [`BindError`], call-time failures are
//! [`CallError`]. Both fail fast: nothing in the crate retries or swallows
//! them, and a model type that fails any construction check is never handed
//! back to the caller.

use std::path::PathBuf;
use thiserror::Error;

use crate::adapter::CheckPhase;
use crate::compat::Incompatibility;

/// An assertion inside a check body or post-construction hook failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Violation {
    message: String,
}

impl Violation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Fail with `message` unless `cond` holds.
pub fn ensure(cond: bool, message: impl Into<String>) -> Result<(), Violation> {
    if cond {
        Ok(())
    } else {
        Err(Violation::new(message))
    }
}

/// A parameter list that cannot form a valid descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("duplicate parameter name `{0}`")]
    DuplicateParameter(String),

    #[error("non-default parameter `{0}` follows a defaulted parameter")]
    RequiredAfterDefault(String),

    #[error("invalid parameter name `{0}`")]
    InvalidName(String),

    #[error("invalid default literal `{0}`")]
    InvalidLiteral(String),

    #[error("`{0}` must be the last parameter")]
    MisplacedVariadic(String),
}

/// Call arguments that do not fit a signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("takes {expected} positional arguments but {given} were given")]
    TooManyPositional { expected: usize, given: usize },

    #[error("got multiple values for argument `{0}`")]
    MultipleValues(String),

    #[error("got an unexpected keyword argument `{0}`")]
    UnexpectedKeyword(String),

    #[error("missing required argument `{0}`")]
    Missing(String),
}

/// Type construction rejected a model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    #[error("{model}.{method} does not satisfy {interface}.{method}: {reason}")]
    SignatureIncompatible {
        model: String,
        interface: String,
        method: String,
        reason: Incompatibility,
    },

    #[error("interfaces {first} and {second} disagree on `{method}`: {reason}")]
    InterfaceConflict {
        first: String,
        second: String,
        method: String,
        reason: Incompatibility,
    },

    #[error("method `{method}` required by {interface} is not implemented by {model}")]
    MissingImplementation {
        model: String,
        interface: String,
        method: String,
    },

    #[error("{interface} rejected {model}: {violation}")]
    HookRejection {
        model: String,
        interface: String,
        violation: Violation,
    },
}

impl BindError {
    /// The incompatibility behind a signature or conflict failure.
    pub fn reason(&self) -> Option<&Incompatibility> {
        match self {
            BindError::SignatureIncompatible { reason, .. }
            | BindError::InterfaceConflict { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// A call through a bound model method failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CallError {
    #[error("contract violation in `{method}` ({phase} check): {violation}")]
    ContractViolation {
        method: String,
        phase: CheckPhase,
        violation: Violation,
    },

    #[error("check function for `{method}` suspended more than once")]
    MalformedCheckFunction { method: String },

    #[error("{model} has no method `{method}`")]
    UnknownMethod { model: String, method: String },

    #[error("bad arguments for `{method}`: {reason}")]
    ArgumentBinding {
        method: String,
        reason: ArgumentError,
    },

    #[error("interface function call - {interface}.{method}")]
    InterfaceInvoked { interface: String, method: String },

    #[error("`{method}` failed: {message}")]
    Implementation { method: String, message: String },
}

impl CallError {
    pub fn failed(method: impl Into<String>, message: impl Into<String>) -> Self {
        CallError::Implementation {
            method: method.into(),
            message: message.into(),
        }
    }

    pub fn is_violation(&self) -> bool {
        matches!(self, CallError::ContractViolation { .. })
    }
}

/// Name lookups against an [`InterfaceRegistry`](crate::InterfaceRegistry).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("interface `{0}` is already declared")]
    DuplicateInterface(String),

    #[error("model `{0}` is already declared")]
    DuplicateModel(String),

    #[error("unknown interface `{0}`")]
    UnknownInterface(String),

    #[error("unknown model `{0}`")]
    UnknownModel(String),

    #[error(transparent)]
    Bind(#[from] BindError),
}

/// Loading a declaration manifest failed.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{context}: {source}")]
    Signature {
        context: String,
        source: SignatureError,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
