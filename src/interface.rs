// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Interface declarations.
//!
//! An interface is a named set of contract methods. Declaring one records
//! every member with its [`MemberKind`]: ordinary methods are checked unless
//! their name is dunder-style (`__len__`), [`MemberKind::ForceCheck`] opts
//! such a name back in, and [`MemberKind::Exclude`] keeps any name out of
//! contract checking.
//!
//! Effective methods are computed once at declaration: parents are overlaid
//! in declaration order, then the interface's own members, so later parents
//! and local declarations win within one lineage. The result is immutable.
//!
//! Interfaces are never usable as implementations. [`InterfaceDefinition::invoke`]
//! always fails loudly.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::binder::ModelType;
use crate::check::CheckBody;
use crate::error::{CallError, Violation};
use crate::signature::{CallArgs, SignatureDescriptor};
use crate::value::Value;

/// Shared handle to a declared interface. Identity is pointer identity.
pub type InterfaceHandle = Arc<InterfaceDefinition>;

/// Post-construction hook, run with the freshly bound model type.
pub type HookFn = Arc<dyn Fn(&ModelType) -> Result<(), Violation> + Send + Sync>;

/// How a declared member takes part in contract checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// Checked, unless the name is dunder-style.
    #[default]
    Method,
    /// Checked even though the name is dunder-style.
    ForceCheck,
    /// Never checked.
    Exclude,
}

/// `__name__` style.
pub fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

impl MemberKind {
    pub fn is_checked(self, name: &str) -> bool {
        match self {
            MemberKind::Method => !is_dunder(name),
            MemberKind::ForceCheck => true,
            MemberKind::Exclude => false,
        }
    }
}

/// One contract: signature plus optional check body, owned by one interface.
#[derive(Clone)]
pub struct ContractMethod {
    interface: String,
    name: String,
    signature: SignatureDescriptor,
    body: Option<CheckBody>,
}

impl ContractMethod {
    pub fn new(
        interface: impl Into<String>,
        name: impl Into<String>,
        signature: SignatureDescriptor,
        body: Option<CheckBody>,
    ) -> Self {
        Self {
            interface: interface.into(),
            name: name.into(),
            signature,
            body,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the interface that declared this contract.
    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn signature(&self) -> &SignatureDescriptor {
        &self.signature
    }

    pub fn body(&self) -> Option<&CheckBody> {
        self.body.as_ref()
    }
}

impl fmt::Debug for ContractMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractMethod")
            .field("interface", &self.interface)
            .field("name", &self.name)
            .field("signature", &self.signature.to_string())
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// A member as written by declaration code.
#[derive(Clone)]
pub struct MemberDecl {
    pub name: String,
    pub kind: MemberKind,
    pub signature: SignatureDescriptor,
    pub body: Option<CheckBody>,
}

impl MemberDecl {
    pub fn method(name: impl Into<String>, signature: SignatureDescriptor) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Method,
            signature,
            body: None,
        }
    }

    pub fn with_body(mut self, body: CheckBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_kind(mut self, kind: MemberKind) -> Self {
        self.kind = kind;
        self
    }
}

/// A declared interface. Immutable once built.
pub struct InterfaceDefinition {
    name: String,
    parents: Vec<InterfaceHandle>,
    methods: BTreeMap<String, Arc<ContractMethod>>,
    excluded: BTreeSet<String>,
    effective: BTreeMap<String, Arc<ContractMethod>>,
    hook: Option<HookFn>,
}

impl InterfaceDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parents(&self) -> &[InterfaceHandle] {
        &self.parents
    }

    /// Contracts declared directly on this interface.
    pub fn methods(&self) -> &BTreeMap<String, Arc<ContractMethod>> {
        &self.methods
    }

    /// Names declared here but kept out of checking.
    pub fn excluded(&self) -> &BTreeSet<String> {
        &self.excluded
    }

    /// Own contracts overlaid on every parent's effective contracts.
    pub fn effective_methods(&self) -> &BTreeMap<String, Arc<ContractMethod>> {
        &self.effective
    }

    /// Own hook, else the first parent's effective hook.
    pub fn hook(&self) -> Option<&HookFn> {
        self.hook
            .as_ref()
            .or_else(|| self.parents.iter().find_map(|p| p.hook()))
    }

    /// Whether `other` is a transitive parent of `self`.
    pub fn extends(&self, other: &InterfaceDefinition) -> bool {
        self.parents
            .iter()
            .any(|p| std::ptr::eq(p.as_ref(), other) || p.extends(other))
    }

    /// Two interfaces are related when one extends the other.
    pub fn is_related(&self, other: &InterfaceDefinition) -> bool {
        std::ptr::eq(self, other) || self.extends(other) || other.extends(self)
    }

    /// Interfaces are contracts, not implementations; calling one fails.
    pub fn invoke(&self, method: &str, _args: &CallArgs) -> Result<Value, CallError> {
        Err(CallError::InterfaceInvoked {
            interface: self.name.clone(),
            method: method.to_string(),
        })
    }
}

impl fmt::Debug for InterfaceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceDefinition")
            .field("name", &self.name)
            .field(
                "parents",
                &self.parents.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("methods", &self.effective.keys().collect::<Vec<_>>())
            .field("has_hook", &self.hook().is_some())
            .finish()
    }
}

/// Declare an interface from a member list.
pub fn define_interface(name: impl Into<String>, members: Vec<MemberDecl>) -> InterfaceHandle {
    let mut builder = InterfaceBuilder::new(name);
    builder.members = members;
    builder.build()
}

/// Declaration surface for interfaces.
///
/// ```
/// use covenant::{check, ensure, InterfaceBuilder};
///
/// let sized = InterfaceBuilder::new("Sized")
///     .force_check(
///         "__len__",
///         "self".parse().unwrap(),
///         check::output(|_, len| ensure(len.as_int().is_some_and(|n| n > 0), "len must be positive")),
///     )
///     .build();
/// assert!(sized.effective_methods().contains_key("__len__"));
/// ```
#[derive(Default)]
pub struct InterfaceBuilder {
    name: String,
    parents: Vec<InterfaceHandle>,
    members: Vec<MemberDecl>,
    hook: Option<HookFn>,
}

impl InterfaceBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn extends(mut self, parent: &InterfaceHandle) -> Self {
        self.parents.push(Arc::clone(parent));
        self
    }

    pub fn member(mut self, member: MemberDecl) -> Self {
        self.members.push(member);
        self
    }

    /// A contract without a check body.
    pub fn method(self, name: impl Into<String>, signature: SignatureDescriptor) -> Self {
        self.member(MemberDecl::method(name, signature))
    }

    /// A contract with a runtime check body.
    pub fn checked_method(
        self,
        name: impl Into<String>,
        signature: SignatureDescriptor,
        body: CheckBody,
    ) -> Self {
        self.member(MemberDecl::method(name, signature).with_body(body))
    }

    pub fn force_check(
        self,
        name: impl Into<String>,
        signature: SignatureDescriptor,
        body: CheckBody,
    ) -> Self {
        self.member(
            MemberDecl::method(name, signature)
                .with_body(body)
                .with_kind(MemberKind::ForceCheck),
        )
    }

    pub fn exclude(self, name: impl Into<String>, signature: SignatureDescriptor) -> Self {
        self.member(MemberDecl::method(name, signature).with_kind(MemberKind::Exclude))
    }

    pub fn after_bind<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ModelType) -> Result<(), Violation> + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(hook));
        self
    }

    pub fn build(self) -> InterfaceHandle {
        let mut methods = BTreeMap::new();
        let mut excluded = BTreeSet::new();

        // Later declarations of a name replace earlier ones.
        for member in self.members {
            if member.kind.is_checked(&member.name) {
                excluded.remove(&member.name);
                let contract = ContractMethod::new(
                    self.name.clone(),
                    member.name.clone(),
                    member.signature,
                    member.body,
                );
                methods.insert(member.name, Arc::new(contract));
            } else {
                methods.remove(&member.name);
                excluded.insert(member.name);
            }
        }

        let mut effective = BTreeMap::new();
        for parent in &self.parents {
            for (name, contract) in parent.effective_methods() {
                effective.insert(name.clone(), Arc::clone(contract));
            }
        }
        for name in &excluded {
            effective.remove(name);
        }
        for (name, contract) in &methods {
            effective.insert(name.clone(), Arc::clone(contract));
        }

        Arc::new(InterfaceDefinition {
            name: self.name,
            parents: self.parents,
            methods,
            excluded,
            effective,
            hook: self.hook,
        })
    }
}
