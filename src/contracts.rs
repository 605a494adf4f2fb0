//! Runtime contracts for the binding pipeline.
//!
//! Debug-mode assertions over the data structures the rest of the crate
//! builds. They:
//!
//! 1. Are **zero-cost in release builds** (use `debug_assert!`)
//! 2. Catch construction bugs at the point they happen, not at call time
//!
//! # INVARIANTS (DO NOT REMOVE THESE CHECKS)
//!
//! | Contract Function              | Property                                         |
//! |--------------------------------|--------------------------------------------------|
//! | `check_descriptor_well_formed` | defaults cover a suffix, names are unique        |
//! | `check_binding_complete`       | every positional name is bound exactly once      |
//! | `check_model_bound`            | every contract has a method and a memo entry     |
//!
//! # Usage
//!
//! ```ignore
//! use covenant::contracts::*;
//!
//! // In debug builds, this panics if the invariant is violated
//! check_descriptor_well_formed(&descriptor);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::binder::ModelType;
use crate::resolve::ResolvedMethod;
use crate::signature::{BoundArgs, SignatureDescriptor};

// ============================================================================
// DESCRIPTOR CONTRACTS
// ============================================================================

/// Check that a descriptor's defaults sit on a suffix of its positional
/// names and that no name repeats.
///
/// # Panics (debug builds only)
/// Panics if `default_count() > positional().len()` or a name appears twice.
#[inline]
pub fn check_descriptor_well_formed(sig: &SignatureDescriptor) {
    debug_assert!(
        sig.default_count() <= sig.positional().len(),
        "Descriptor invariant violated: {} defaults for {} positional names",
        sig.default_count(),
        sig.positional().len()
    );

    #[cfg(debug_assertions)]
    {
        let mut seen = std::collections::HashSet::new();
        let names = sig
            .positional()
            .iter()
            .map(String::as_str)
            .chain(sig.var_positional())
            .chain(sig.var_keyword());
        for name in names {
            debug_assert!(
                seen.insert(name),
                "Descriptor invariant violated: `{}` declared twice in {}",
                name,
                sig
            );
        }
    }
}

/// Check that binding produced one entry per positional name, in order.
///
/// # Panics (debug builds only)
/// Panics if the bound names differ from `sig.positional()`.
#[inline]
pub fn check_binding_complete(sig: &SignatureDescriptor, bound: &BoundArgs) {
    debug_assert!(
        bound
            .named()
            .iter()
            .map(|(n, _)| n)
            .eq(sig.positional().iter()),
        "Binding invariant violated: bound {:?} against {}",
        bound.named().iter().map(|(n, _)| n).collect::<Vec<_>>(),
        sig
    );
    debug_assert!(
        sig.has_var_positional() || bound.extra_positional().is_empty(),
        "Binding invariant violated: extra positionals without *args in {}",
        sig
    );
    debug_assert!(
        sig.has_var_keyword() || bound.extra_keyword().is_empty(),
        "Binding invariant violated: extra keywords without **kwargs in {}",
        sig
    );
}

// ============================================================================
// MODEL CONTRACTS
// ============================================================================

/// Check that a freshly bound model satisfies every resolved contract.
///
/// Every contract name must be bound, and its memo entry must point at the
/// interface the contract was resolved from.
///
/// # Panics (debug builds only)
/// Panics if a contract has no bound method or no matching memo entry.
#[inline]
pub fn check_model_bound(model: &ModelType, contracts: &BTreeMap<String, ResolvedMethod>) {
    for (name, resolved) in contracts {
        debug_assert!(
            model.method(name).is_some(),
            "Model invariant violated: {} has no `{}`",
            model.name(),
            name
        );
        debug_assert!(
            model
                .checked_against()
                .get(name)
                .is_some_and(|owner| Arc::ptr_eq(owner, &resolved.owner)),
            "Model invariant violated: {}.{} not validated against {}",
            model.name(),
            name,
            resolved.owner.name()
        );
    }
}
