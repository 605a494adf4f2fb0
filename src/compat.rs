// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Signature compatibility: can an implementation stand in for a contract?
//!
//! An implementation is acceptable when every argument list the contract
//! accepts is also accepted by the implementation. The relation is one-way:
//! `(a, b, c)` accepts `(a, b, c, d=12)` as an implementation, not the other
//! way round.
//!
//! Rules are applied in a fixed order and the first failing rule is
//! reported:
//!
//! | Rule                      | Rejects when                                          |
//! |---------------------------|-------------------------------------------------------|
//! | `MissingVariadicPositional` | contract has `*args`, implementation does not       |
//! | `MissingVariadicKeyword`  | contract has `**kw`, implementation does not          |
//! | `InsufficientDefaults`    | implementation defaults fewer trailing parameters     |
//! | `TooFewParameters`        | fewer positional names, without both catch-alls       |
//! | `TooManyParameters`       | implementation requires more than the contract passes |
//! | `NameMismatch`            | shared positional prefix differs by name              |
//! | `DefaultValueMismatch`    | a contract default is missing or unequal              |

use thiserror::Error;

use crate::signature::SignatureDescriptor;
use crate::value::Value;

/// Why an implementation signature is not acceptable for a contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Incompatibility {
    #[error("contract accepts *args but implementation {implementation} does not")]
    MissingVariadicPositional { implementation: String },

    #[error("contract accepts **kwargs but implementation {implementation} does not")]
    MissingVariadicKeyword { implementation: String },

    #[error("contract has {contract} defaults, implementation only {implementation}")]
    InsufficientDefaults { contract: usize, implementation: usize },

    #[error(
        "implementation takes {implementation} positional parameters, contract {contract}, \
         and lacks *args/**kwargs"
    )]
    TooFewParameters { contract: usize, implementation: usize },

    #[error("implementation requires {required} positional arguments, contract supplies {contract}")]
    TooManyParameters { contract: usize, required: usize },

    #[error("parameter {position} is `{implementation}` but the contract calls it `{contract}`")]
    NameMismatch {
        position: usize,
        contract: String,
        implementation: String,
    },

    #[error(
        "default for `{name}` is {} but the contract declares {expected}",
        DisplayDefault(.found)
    )]
    DefaultValueMismatch {
        name: String,
        expected: Value,
        found: Option<Value>,
    },
}

struct DisplayDefault<'a>(&'a Option<Value>);

impl std::fmt::Display for DisplayDefault<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{}", v),
            None => f.write_str("missing"),
        }
    }
}

impl Incompatibility {
    /// Stable short name of the failed rule.
    pub fn rule(&self) -> &'static str {
        match self {
            Incompatibility::MissingVariadicPositional { .. } => "MissingVariadicPositional",
            Incompatibility::MissingVariadicKeyword { .. } => "MissingVariadicKeyword",
            Incompatibility::InsufficientDefaults { .. } => "InsufficientDefaults",
            Incompatibility::TooFewParameters { .. } => "TooFewParameters",
            Incompatibility::TooManyParameters { .. } => "TooManyParameters",
            Incompatibility::NameMismatch { .. } => "NameMismatch",
            Incompatibility::DefaultValueMismatch { .. } => "DefaultValueMismatch",
        }
    }
}

/// Decide whether `implementation` can be called with any argument list
/// acceptable to `contract`.
///
/// With `iface_no_self`, a contract declared without a receiver gets one
/// synthesized before comparison.
pub fn check_signature_acceptable(
    contract: &SignatureDescriptor,
    implementation: &SignatureDescriptor,
    iface_no_self: bool,
) -> Result<(), Incompatibility> {
    if iface_no_self && !contract.has_receiver() {
        return check_compatible(&contract.with_receiver(), implementation);
    }
    check_compatible(contract, implementation)
}

/// Core comparison on already-extracted descriptors.
pub fn check_compatible(
    contract: &SignatureDescriptor,
    implementation: &SignatureDescriptor,
) -> Result<(), Incompatibility> {
    if contract.has_var_positional() && !implementation.has_var_positional() {
        return Err(Incompatibility::MissingVariadicPositional {
            implementation: implementation.to_string(),
        });
    }

    if contract.has_var_keyword() && !implementation.has_var_keyword() {
        return Err(Incompatibility::MissingVariadicKeyword {
            implementation: implementation.to_string(),
        });
    }

    let contract_defaults = contract.default_count();
    let impl_defaults = implementation.default_count();
    if contract_defaults > impl_defaults {
        return Err(Incompatibility::InsufficientDefaults {
            contract: contract_defaults,
            implementation: impl_defaults,
        });
    }

    let contract_len = contract.positional().len();
    let impl_len = implementation.positional().len();

    if contract_len > impl_len
        && !(implementation.has_var_positional() && implementation.has_var_keyword())
    {
        return Err(Incompatibility::TooFewParameters {
            contract: contract_len,
            implementation: impl_len,
        });
    }

    // Extra implementation defaults beyond the contract's absorb extra names.
    let required = impl_len - (impl_defaults - contract_defaults);
    if contract_len < required {
        return Err(Incompatibility::TooManyParameters {
            contract: contract_len,
            required,
        });
    }

    let shared = contract_len.min(impl_len);
    let mismatch = contract.positional()[..shared]
        .iter()
        .zip(&implementation.positional()[..shared])
        .position(|(c, i)| c != i);
    if let Some(position) = mismatch {
        return Err(Incompatibility::NameMismatch {
            position,
            contract: contract.positional()[position].clone(),
            implementation: implementation.positional()[position].clone(),
        });
    }

    for (name, expected) in contract.defaults() {
        let found = implementation.default_for(name);
        if found != Some(expected) {
            return Err(Incompatibility::DefaultValueMismatch {
                name: name.to_string(),
                expected: expected.clone(),
                found: found.cloned(),
            });
        }
    }

    Ok(())
}

/// Both directions must hold: the two descriptors have the same shape as
/// far as callers can tell.
pub fn mutually_compatible(
    a: &SignatureDescriptor,
    b: &SignatureDescriptor,
) -> Result<(), Incompatibility> {
    check_compatible(a, b)?;
    check_compatible(b, a)
}
