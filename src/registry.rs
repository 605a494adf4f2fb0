// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Name-keyed registry of declared interfaces and bound models.
//!
//! Handles stay the source of identity; the registry only adds lookup by
//! name and rejects redeclaration.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::binder::{self, ModelDecl, ModelHandle};
use crate::config::BindOptions;
use crate::error::RegistryError;
use crate::interface::{ContractMethod, InterfaceHandle};

#[derive(Debug, Default)]
pub struct InterfaceRegistry {
    interfaces: BTreeMap<String, InterfaceHandle>,
    models: BTreeMap<String, ModelHandle>,
}

impl InterfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_interface(&mut self, iface: InterfaceHandle) -> Result<InterfaceHandle, RegistryError> {
        if self.interfaces.contains_key(iface.name()) {
            return Err(RegistryError::DuplicateInterface(iface.name().to_string()));
        }
        self.interfaces
            .insert(iface.name().to_string(), Arc::clone(&iface));
        Ok(iface)
    }

    pub fn interface(&self, name: &str) -> Result<&InterfaceHandle, RegistryError> {
        self.interfaces
            .get(name)
            .ok_or_else(|| RegistryError::UnknownInterface(name.to_string()))
    }

    /// Contracts a model implementing `name` must satisfy.
    pub fn effective_methods(
        &self,
        name: &str,
    ) -> Result<&BTreeMap<String, Arc<ContractMethod>>, RegistryError> {
        Ok(self.interface(name)?.effective_methods())
    }

    pub fn bind_model(&mut self, decl: ModelDecl, options: &BindOptions) -> Result<ModelHandle, RegistryError> {
        if self.models.contains_key(&decl.name) {
            return Err(RegistryError::DuplicateModel(decl.name));
        }
        let model = binder::bind_model(decl, options)?;
        self.models
            .insert(model.name().to_string(), Arc::clone(&model));
        Ok(model)
    }

    pub fn model(&self, name: &str) -> Result<&ModelHandle, RegistryError> {
        self.models
            .get(name)
            .ok_or_else(|| RegistryError::UnknownModel(name.to_string()))
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &InterfaceHandle> {
        self.interfaces.values()
    }

    pub fn models(&self) -> impl Iterator<Item = &ModelHandle> {
        self.models.values()
    }
}
