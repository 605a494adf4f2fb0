// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Interface merging and contract resolution for one model type.
//!
//! Three steps, run by the binder in order:
//!
//! 1. [`merge_interfaces`]: the model's interface set is every parent
//!    model's merged set, in parent order, followed by its own list. A
//!    repeated interface keeps its first position.
//! 2. [`ConsistencyResolver::check_consistency`]: any two *independent*
//!    interfaces (neither extends the other) that both carry a method name
//!    must agree on its signature in both directions.
//! 3. [`ConsistencyResolver::resolve`]: the merged set is walked in reverse
//!    so later-listed interfaces win, giving one contract per name together
//!    with the interface it was resolved from.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::compat::mutually_compatible;
use crate::error::BindError;
use crate::interface::{ContractMethod, InterfaceHandle};

/// A contract selected for a method name, plus the interface it came from.
#[derive(Debug, Clone)]
pub struct ResolvedMethod {
    pub contract: Arc<ContractMethod>,
    pub owner: InterfaceHandle,
}

/// Concatenate interface lists, keeping the first occurrence of each.
pub fn merge_interfaces<'a, I>(lists: I) -> Vec<InterfaceHandle>
where
    I: IntoIterator<Item = &'a [InterfaceHandle]>,
{
    let mut merged: Vec<InterfaceHandle> = Vec::new();
    for list in lists {
        for iface in list {
            if !merged.iter().any(|seen| Arc::ptr_eq(seen, iface)) {
                merged.push(Arc::clone(iface));
            }
        }
    }
    merged
}

/// Checks and resolves the contracts of a merged interface set.
pub struct ConsistencyResolver<'a> {
    interfaces: &'a [InterfaceHandle],
}

impl<'a> ConsistencyResolver<'a> {
    pub fn new(interfaces: &'a [InterfaceHandle]) -> Self {
        Self { interfaces }
    }

    /// Fail on the first shared method name whose signatures disagree
    /// between two independent interfaces.
    pub fn check_consistency(&self) -> Result<(), BindError> {
        for (i, first) in self.interfaces.iter().enumerate() {
            for second in &self.interfaces[i + 1..] {
                if first.is_related(second) {
                    continue;
                }
                Self::check_pair(first, second)?;
            }
        }
        Ok(())
    }

    fn check_pair(first: &InterfaceHandle, second: &InterfaceHandle) -> Result<(), BindError> {
        let theirs = second.effective_methods();
        for (name, a) in first.effective_methods() {
            let Some(b) = theirs.get(name) else {
                continue;
            };
            // Same contract reached through a shared ancestor.
            if Arc::ptr_eq(a, b) {
                continue;
            }
            mutually_compatible(&a.signature().extract(true), &b.signature().extract(true))
                .map_err(|reason| BindError::InterfaceConflict {
                    first: first.name().to_string(),
                    second: second.name().to_string(),
                    method: name.clone(),
                    reason,
                })?;
            debug!(
                method = %name,
                first = first.name(),
                second = second.name(),
                "independent interfaces agree"
            );
        }
        Ok(())
    }

    /// One contract per method name; later interfaces take precedence.
    pub fn resolve(&self) -> BTreeMap<String, ResolvedMethod> {
        let mut resolved = BTreeMap::new();
        for owner in self.interfaces.iter().rev() {
            for (name, contract) in owner.effective_methods() {
                resolved
                    .entry(name.clone())
                    .or_insert_with(|| ResolvedMethod {
                        contract: Arc::clone(contract),
                        owner: Arc::clone(owner),
                    });
            }
        }
        resolved
    }
}
