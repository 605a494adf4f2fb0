// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Declarative JSON manifests.
//!
//! A manifest declares interfaces and models without code, which is what
//! `covenant check` binds. Method bodies are stand-ins that return a fixed
//! value; everything checked at bind time (signatures, completeness,
//! interface consistency, attribute requirements) is exactly what the
//! programmatic surface checks.
//!
//! ```json
//! {
//!   "options": { "runtime_check": true },
//!   "interfaces": [
//!     {
//!       "name": "Prioritized",
//!       "methods": [
//!         { "name": "rank", "signature": "x, y=1", "expects": { "x": "int" }, "returns": "int" }
//!       ],
//!       "requires": [ { "attribute": "priority", "kind": "int", "above": 0, "below": 100 } ]
//!     }
//!   ],
//!   "models": [
//!     {
//!       "name": "Task",
//!       "implements": ["Prioritized"],
//!       "methods": [ { "name": "rank", "signature": "self, x, y=1", "returns": 3 } ],
//!       "attributes": { "priority": 10 }
//!     }
//!   ]
//! }
//! ```
//!
//! Interfaces are declared in file order and may only extend interfaces
//! declared before them. The same holds for models. A model whose parent
//! failed to bind is skipped, not rejected.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::binder::{ModelBuilder, ModelType};
use crate::check::{self, CheckBody};
use crate::config::BindOptions;
use crate::error::{ensure, ManifestError, RegistryError, Violation};
use crate::interface::{InterfaceBuilder, MemberDecl, MemberKind};
use crate::registry::InterfaceRegistry;
use crate::signature::SignatureDescriptor;
use crate::value::{Value, ValueKind};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub options: BindOptions,
    #[serde(default)]
    pub interfaces: Vec<InterfaceSpec>,
    #[serde(default)]
    pub models: Vec<ModelSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceSpec {
    pub name: String,
    #[serde(default)]
    pub extends: Vec<String>,
    #[serde(default)]
    pub methods: Vec<ContractSpec>,
    #[serde(default)]
    pub requires: Vec<Requirement>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContractSpec {
    pub name: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub kind: MemberKind,
    /// Argument kinds checked before the call.
    #[serde(default)]
    pub expects: BTreeMap<String, ValueKind>,
    /// Result kind checked after the call.
    #[serde(default)]
    pub returns: Option<ValueKind>,
}

/// A class-level attribute a model must carry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Requirement {
    pub attribute: String,
    #[serde(default)]
    pub kind: Option<ValueKind>,
    /// Exclusive lower bound.
    #[serde(default)]
    pub above: Option<f64>,
    /// Exclusive upper bound.
    #[serde(default)]
    pub below: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSpec {
    pub name: String,
    #[serde(default)]
    pub extends: Vec<String>,
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(default)]
    pub methods: Vec<MethodSpec>,
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
    #[serde(default)]
    pub allow_overlap: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodSpec {
    pub name: String,
    #[serde(default)]
    pub signature: String,
    /// Value the stand-in body returns.
    #[serde(default)]
    pub returns: Value,
}

/// Result of binding one manifest model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelOutcome {
    Bound {
        model: String,
        interfaces: Vec<String>,
        revalidated: Vec<String>,
    },
    Rejected {
        model: String,
        error: String,
    },
    Skipped {
        model: String,
        parent: String,
    },
}

impl ModelOutcome {
    pub fn model(&self) -> &str {
        match self {
            ModelOutcome::Bound { model, .. }
            | ModelOutcome::Rejected { model, .. }
            | ModelOutcome::Skipped { model, .. } => model,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, ModelOutcome::Bound { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CheckReport {
    pub interfaces: Vec<String>,
    pub models: Vec<ModelOutcome>,
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        self.models.iter().all(ModelOutcome::is_bound)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ModelOutcome> {
        self.models.iter().filter(|m| !m.is_bound())
    }
}

impl Manifest {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = raw.len(), "loaded manifest");
        raw.parse()
    }

    /// Declare every interface into a fresh registry.
    ///
    /// Structural problems (bad signatures, unknown names, duplicates) fail
    /// the whole manifest.
    pub fn declare(&self) -> Result<InterfaceRegistry, ManifestError> {
        let mut registry = InterfaceRegistry::new();
        for spec in &self.interfaces {
            let mut builder = InterfaceBuilder::new(&spec.name);
            for parent in &spec.extends {
                builder = builder.extends(registry.interface(parent)?);
            }
            for method in &spec.methods {
                let context = format!("{}.{}", spec.name, method.name);
                let signature = parse_signature(&method.signature, &context)?;
                let mut member = MemberDecl::method(&method.name, signature).with_kind(method.kind);
                if let Some(body) = method.check_body() {
                    member = member.with_body(body);
                }
                builder = builder.member(member);
            }
            if !spec.requires.is_empty() {
                let requires = spec.requires.clone();
                builder = builder.after_bind(move |model| {
                    requires.iter().try_for_each(|r| r.verify(model))
                });
            }
            registry.declare_interface(builder.build())?;
        }
        Ok(registry)
    }

    /// Declare interfaces, then bind models one by one.
    ///
    /// Bind failures are recorded per model; only structural problems are
    /// returned as errors.
    pub fn check(&self, options: &BindOptions) -> Result<(InterfaceRegistry, CheckReport), ManifestError> {
        let mut registry = self.declare()?;
        let mut report = CheckReport {
            interfaces: self.interfaces.iter().map(|i| i.name.clone()).collect(),
            models: Vec::with_capacity(self.models.len()),
        };

        for spec in &self.models {
            let outcome = self.bind_one(&mut registry, spec, &report, options)?;
            info!(model = %spec.name, bound = outcome.is_bound(), "checked model");
            report.models.push(outcome);
        }
        Ok((registry, report))
    }

    fn bind_one(
        &self,
        registry: &mut InterfaceRegistry,
        spec: &ModelSpec,
        report: &CheckReport,
        options: &BindOptions,
    ) -> Result<ModelOutcome, ManifestError> {
        let mut builder = ModelBuilder::new(&spec.name).allow_overlap(spec.allow_overlap);

        for parent in &spec.extends {
            if let Some(failed) = report.failures().find(|m| m.model() == parent) {
                return Ok(ModelOutcome::Skipped {
                    model: spec.name.clone(),
                    parent: failed.model().to_string(),
                });
            }
            builder = builder.extends(registry.model(parent)?);
        }
        for iface in &spec.implements {
            builder = builder.implements(registry.interface(iface)?);
        }
        for method in &spec.methods {
            let context = format!("{}.{}", spec.name, method.name);
            let signature = parse_signature(&method.signature, &context)?;
            let returns = method.returns.clone();
            builder = builder.method(&method.name, signature, move |_| Ok(returns.clone()));
        }
        for (name, value) in &spec.attributes {
            builder = builder.attribute(name, value.clone());
        }

        match registry.bind_model(builder.declaration(), options) {
            Ok(model) => Ok(ModelOutcome::Bound {
                model: spec.name.clone(),
                interfaces: model.interfaces().iter().map(|i| i.name().to_string()).collect(),
                revalidated: model.revalidated().to_vec(),
            }),
            Err(RegistryError::Bind(err)) => Ok(ModelOutcome::Rejected {
                model: spec.name.clone(),
                error: err.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }
}

impl std::str::FromStr for Manifest {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

impl ContractSpec {
    fn check_body(&self) -> Option<CheckBody> {
        if self.expects.is_empty() && self.returns.is_none() {
            return None;
        }
        let expects = self.expects.clone();
        let validate_input = move |args: &crate::signature::BoundArgs| {
            expects
                .iter()
                .try_for_each(|(name, kind)| args.expect_kind(name, *kind).map(|_| ()))
        };
        Some(match self.returns {
            Some(kind) => check::two_phase(validate_input, move |_, result| {
                ensure(
                    result.is_a(kind),
                    format!("result must be {}, got {} ({})", kind, result.kind(), result),
                )
            }),
            None => check::input(validate_input),
        })
    }
}

impl Requirement {
    pub fn verify(&self, model: &ModelType) -> Result<(), Violation> {
        let value = model
            .attribute(&self.attribute)
            .ok_or_else(|| Violation::new(format!("`{}` attribute is missing", self.attribute)))?;
        if let Some(kind) = self.kind {
            ensure(
                value.is_a(kind),
                format!("`{}` must be {}, got {}", self.attribute, kind, value.kind()),
            )?;
        }
        if self.above.is_none() && self.below.is_none() {
            return Ok(());
        }
        let Some(n) = value.as_f64() else {
            return Err(Violation::new(format!("`{}` must be numeric", self.attribute)));
        };
        if let Some(low) = self.above {
            ensure(n > low, format!("`{}` must be above {}, got {}", self.attribute, low, value))?;
        }
        if let Some(high) = self.below {
            ensure(n < high, format!("`{}` must be below {}, got {}", self.attribute, high, value))?;
        }
        Ok(())
    }
}

fn parse_signature(src: &str, context: &str) -> Result<SignatureDescriptor, ManifestError> {
    src.parse().map_err(|source| ManifestError::Signature {
        context: context.to_string(),
        source,
    })
}
