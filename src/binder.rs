// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Type construction: turning a model declaration into a bound model type.
//!
//! Binding runs once per model declaration and produces an immutable
//! [`ModelType`]. Steps, in order:
//!
//! 1. Merge the interface set (parents' merged sets, then the model's own
//!    `implements` list).
//! 2. Unless the model opts out with `allow_overlap`, check that
//!    independent interfaces agree on every shared method name.
//! 3. Resolve one contract per name, later interfaces winning.
//! 4. Collect bound methods: the model's own bodies, then whatever each
//!    parent model bound, left to right. Inherited methods carry the
//!    parent's memo entry; own bodies start unvalidated.
//! 5. For every contract: a missing method is an error. A method already
//!    validated against the same owning interface is kept as is. Anything
//!    else is unwrapped to its raw implementation, checked for signature
//!    compatibility, and re-wrapped in a fresh [`CheckAdapter`].
//! 6. Run each distinct post-construction hook of the merged interfaces.
//!
//! Signature checks always run. [`BindOptions::runtime_check`] only decides
//! whether accepted methods are wrapped.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::adapter::{method_fn, CheckAdapter, Implementation, MethodFn};
use crate::compat::check_signature_acceptable;
use crate::config::BindOptions;
use crate::contracts;
use crate::error::{BindError, CallError};
use crate::interface::{HookFn, InterfaceHandle};
use crate::resolve::{merge_interfaces, ConsistencyResolver};
use crate::signature::{BoundArgs, CallArgs, SignatureDescriptor};
use crate::value::Value;

/// Shared handle to a bound model type.
pub type ModelHandle = Arc<ModelType>;

/// A method as it sits on a bound model type.
#[derive(Debug, Clone)]
pub struct BoundMethod {
    name: String,
    defined_in: String,
    implementation: Implementation,
    adapter: Option<CheckAdapter>,
}

impl BoundMethod {
    fn plain(name: &str, defined_in: &str, implementation: Implementation) -> Self {
        Self {
            name: name.to_string(),
            defined_in: defined_in.to_string(),
            implementation,
            adapter: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Model that supplied the body.
    pub fn defined_in(&self) -> &str {
        &self.defined_in
    }

    /// The implementation without any check adapter.
    pub fn raw(&self) -> &Implementation {
        self.adapter
            .as_ref()
            .map_or(&self.implementation, CheckAdapter::raw)
    }

    pub fn is_checked(&self) -> bool {
        self.adapter.is_some()
    }

    pub fn call(&self, args: &CallArgs) -> Result<Value, CallError> {
        match &self.adapter {
            Some(adapter) => adapter.call(args),
            None => self.implementation.invoke(&self.name, args),
        }
    }
}

/// A model declaration, before binding.
#[derive(Default)]
pub struct ModelDecl {
    pub name: String,
    pub parents: Vec<ModelHandle>,
    pub implements: Vec<InterfaceHandle>,
    pub methods: BTreeMap<String, Implementation>,
    pub attributes: BTreeMap<String, Value>,
    pub allow_overlap: bool,
}

/// Declaration surface for model types.
///
/// ```
/// use covenant::{BindOptions, InterfaceBuilder, ModelBuilder, Value};
///
/// let iface = InterfaceBuilder::new("Greeter")
///     .method("greet", "name".parse().unwrap())
///     .build();
/// let model = ModelBuilder::new("English")
///     .implements(&iface)
///     .method("greet", "self, name".parse().unwrap(), |args| {
///         Ok(Value::from(format!("hello {}", args.get("name").unwrap())))
///     })
///     .bind(&BindOptions::default())
///     .unwrap();
/// assert!(model.call("greet", &covenant::args!["bob"]).is_ok());
/// ```
#[derive(Default)]
pub struct ModelBuilder {
    decl: ModelDecl,
}

impl ModelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            decl: ModelDecl {
                name: name.into(),
                ..ModelDecl::default()
            },
        }
    }

    pub fn extends(mut self, parent: &ModelHandle) -> Self {
        self.decl.parents.push(Arc::clone(parent));
        self
    }

    pub fn implements(mut self, iface: &InterfaceHandle) -> Self {
        self.decl.implements.push(Arc::clone(iface));
        self
    }

    pub fn method<F>(self, name: impl Into<String>, signature: SignatureDescriptor, body: F) -> Self
    where
        F: Fn(&BoundArgs) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        self.method_fn(name, signature, method_fn(body))
    }

    pub fn method_fn(
        mut self,
        name: impl Into<String>,
        signature: SignatureDescriptor,
        body: MethodFn,
    ) -> Self {
        self.decl
            .methods
            .insert(name.into(), Implementation::new(signature, body));
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.decl.attributes.insert(name.into(), value.into());
        self
    }

    /// Skip the independent-interface consistency check.
    pub fn allow_overlap(mut self, allow: bool) -> Self {
        self.decl.allow_overlap = allow;
        self
    }

    pub fn declaration(self) -> ModelDecl {
        self.decl
    }

    pub fn bind(self, options: &BindOptions) -> Result<ModelHandle, BindError> {
        bind_model(self.decl, options)
    }
}

/// A bound model type. Immutable.
pub struct ModelType {
    name: String,
    parents: Vec<ModelHandle>,
    implements: Vec<InterfaceHandle>,
    interfaces: Vec<InterfaceHandle>,
    methods: BTreeMap<String, Arc<BoundMethod>>,
    checked_against: BTreeMap<String, InterfaceHandle>,
    attributes: BTreeMap<String, Value>,
    revalidated: Vec<String>,
    runtime_check: bool,
}

impl ModelType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parents(&self) -> &[ModelHandle] {
        &self.parents
    }

    /// Interfaces listed on this declaration only.
    pub fn implements(&self) -> &[InterfaceHandle] {
        &self.implements
    }

    /// Every interface this model answers to, inherited ones included.
    pub fn interfaces(&self) -> &[InterfaceHandle] {
        &self.interfaces
    }

    pub fn method(&self, name: &str) -> Option<&Arc<BoundMethod>> {
        self.methods.get(name)
    }

    pub fn methods(&self) -> &BTreeMap<String, Arc<BoundMethod>> {
        &self.methods
    }

    /// Interface each checked method was last validated against.
    pub fn checked_against(&self) -> &BTreeMap<String, InterfaceHandle> {
        &self.checked_against
    }

    /// Attribute lookup, falling back through ancestor models.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    /// Methods validated during this model's own binding step.
    pub fn revalidated(&self) -> &[String] {
        &self.revalidated
    }

    pub fn runtime_check(&self) -> bool {
        self.runtime_check
    }

    /// Whether `iface` is among this model's merged interfaces.
    pub fn provides(&self, iface: &InterfaceHandle) -> bool {
        self.interfaces.iter().any(|i| Arc::ptr_eq(i, iface))
    }

    pub fn call(&self, method: &str, args: &CallArgs) -> Result<Value, CallError> {
        let bound = self
            .methods
            .get(method)
            .ok_or_else(|| CallError::UnknownMethod {
                model: self.name.clone(),
                method: method.to_string(),
            })?;
        bound.call(args)
    }
}

impl fmt::Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelType")
            .field("name", &self.name)
            .field(
                "interfaces",
                &self.interfaces.iter().map(|i| i.name()).collect::<Vec<_>>(),
            )
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("revalidated", &self.revalidated)
            .finish()
    }
}

/// Bind a model declaration.
pub fn bind_model(decl: ModelDecl, options: &BindOptions) -> Result<ModelHandle, BindError> {
    let ModelDecl {
        name,
        parents,
        implements,
        methods: own_methods,
        attributes: own_attributes,
        allow_overlap,
    } = decl;

    let interfaces = merge_interfaces(
        parents
            .iter()
            .map(|p| p.interfaces())
            .chain(std::iter::once(implements.as_slice())),
    );

    let resolver = ConsistencyResolver::new(&interfaces);
    if allow_overlap {
        warn!(model = %name, "interface consistency check suppressed");
    } else {
        resolver.check_consistency()?;
    }
    let required = resolver.resolve();

    let mut methods: BTreeMap<String, Arc<BoundMethod>> = own_methods
        .into_iter()
        .map(|(method, implementation)| {
            let bound = BoundMethod::plain(&method, &name, implementation);
            (method, Arc::new(bound))
        })
        .collect();
    let mut checked_against: BTreeMap<String, InterfaceHandle> = BTreeMap::new();
    let mut attributes = BTreeMap::new();

    for parent in &parents {
        for (method, bound) in parent.methods() {
            if methods.contains_key(method) {
                continue;
            }
            methods.insert(method.clone(), Arc::clone(bound));
            if let Some(owner) = parent.checked_against().get(method) {
                checked_against.insert(method.clone(), Arc::clone(owner));
            }
        }
        for (key, value) in parent.attributes() {
            attributes
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }
    attributes.extend(own_attributes);

    let mut revalidated = Vec::new();
    for (method, resolved) in &required {
        let bound = methods
            .get(method)
            .ok_or_else(|| BindError::MissingImplementation {
                model: name.clone(),
                interface: resolved.owner.name().to_string(),
                method: method.clone(),
            })?;

        // An unwrapped inherited method still needs an adapter when this
        // construction runs checks.
        let wrapped_enough = bound.is_checked() || !options.runtime_check;
        if wrapped_enough
            && checked_against
                .get(method)
                .is_some_and(|owner| Arc::ptr_eq(owner, &resolved.owner))
        {
            debug!(model = %name, method = %method, "already validated, keeping adapter");
            continue;
        }

        let raw = bound.raw().clone();
        check_signature_acceptable(resolved.contract.signature(), raw.signature(), true)
            .map_err(|reason| BindError::SignatureIncompatible {
                model: name.clone(),
                interface: resolved.owner.name().to_string(),
                method: method.clone(),
                reason,
            })?;

        let adapter = options
            .runtime_check
            .then(|| CheckAdapter::new(method.clone(), &resolved.contract, raw.clone()));
        let rebound = BoundMethod {
            name: method.clone(),
            defined_in: bound.defined_in().to_string(),
            implementation: raw,
            adapter,
        };
        debug!(
            model = %name,
            method = %method,
            interface = resolved.owner.name(),
            wrapped = rebound.is_checked(),
            "validated"
        );
        methods.insert(method.clone(), Arc::new(rebound));
        checked_against.insert(method.clone(), Arc::clone(&resolved.owner));
        revalidated.push(method.clone());
    }

    let model = ModelType {
        name,
        parents,
        implements,
        interfaces,
        methods,
        checked_against,
        attributes,
        revalidated,
        runtime_check: options.runtime_check,
    };
    contracts::check_model_bound(&model, &required);

    run_hooks(&model)?;

    info!(
        model = %model.name,
        interfaces = model.interfaces.len(),
        revalidated = model.revalidated.len(),
        "model bound"
    );
    Ok(Arc::new(model))
}

fn run_hooks(model: &ModelType) -> Result<(), BindError> {
    let mut seen: Vec<&HookFn> = Vec::new();
    for iface in &model.interfaces {
        let Some(hook) = iface.hook() else {
            continue;
        };
        if seen.iter().any(|&h| Arc::ptr_eq(h, hook)) {
            continue;
        }
        seen.push(hook);
        hook(model).map_err(|violation| BindError::HookRejection {
            model: model.name.clone(),
            interface: iface.name().to_string(),
            violation,
        })?;
    }
    Ok(())
}
