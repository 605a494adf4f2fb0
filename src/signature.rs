// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Structural descriptions of callable parameter lists.
//!
//! A [`SignatureDescriptor`] is pure data: the ordered positional names, the
//! default values of a trailing run of them, and whether the callable also
//! soaks up extra positional (`*rest`) or keyword (`**kw`) arguments.
//!
//! Descriptors are built explicitly by declaration code, either through
//! [`SignatureBuilder`] or by parsing the familiar textual form:
//!
//! ```
//! use covenant::SignatureDescriptor;
//!
//! let sig: SignatureDescriptor = "a, b, c=12, *rest, **kw".parse().unwrap();
//! assert_eq!(sig.positional(), ["a", "b", "c"]);
//! assert_eq!(sig.default_count(), 1);
//! assert!(sig.has_var_positional() && sig.has_var_keyword());
//! ```
//!
//! # Invariant
//!
//! Defaults always cover exactly the trailing `default_count()` positional
//! names. The representation stores them as a suffix vector, so the
//! invariant cannot be broken after construction; the constructors reject
//! any parameter list where a required name follows a defaulted one.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::contracts;
use crate::error::{ArgumentError, SignatureError, Violation};
use crate::value::{split_top_level, Value, ValueKind};

/// Conventional name of the receiver parameter.
pub const RECEIVER: &str = "self";

/// One positional parameter as written by the declaring author.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub default: Option<Value>,
}

impl Param {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
        }
    }
}

/// Parameter list of a contract or an implementation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureDescriptor {
    positional: Vec<String>,
    /// Defaults for `positional[positional.len() - defaults.len()..]`.
    defaults: Vec<Value>,
    var_positional: Option<String>,
    var_keyword: Option<String>,
}

impl SignatureDescriptor {
    /// Build a descriptor from explicit parts.
    pub fn new(
        params: Vec<Param>,
        var_positional: Option<String>,
        var_keyword: Option<String>,
    ) -> Result<Self, SignatureError> {
        let mut seen = HashSet::new();
        let mut positional = Vec::with_capacity(params.len());
        let mut defaults = Vec::new();

        for param in params {
            validate_name(&param.name)?;
            if !seen.insert(param.name.clone()) {
                return Err(SignatureError::DuplicateParameter(param.name));
            }
            match param.default {
                Some(value) => defaults.push(value),
                None if !defaults.is_empty() => {
                    return Err(SignatureError::RequiredAfterDefault(param.name));
                }
                None => {}
            }
            positional.push(param.name);
        }

        for name in var_positional.iter().chain(var_keyword.iter()) {
            validate_name(name)?;
            if !seen.insert(name.clone()) {
                return Err(SignatureError::DuplicateParameter(name.clone()));
            }
        }

        let descriptor = Self {
            positional,
            defaults,
            var_positional,
            var_keyword,
        };
        contracts::check_descriptor_well_formed(&descriptor);
        Ok(descriptor)
    }

    pub fn builder() -> SignatureBuilder {
        SignatureBuilder::default()
    }

    /// A descriptor taking no arguments at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    pub fn default_count(&self) -> usize {
        self.defaults.len()
    }

    /// Number of positional parameters without a default.
    pub fn required_count(&self) -> usize {
        self.positional.len() - self.defaults.len()
    }

    pub fn has_var_positional(&self) -> bool {
        self.var_positional.is_some()
    }

    pub fn has_var_keyword(&self) -> bool {
        self.var_keyword.is_some()
    }

    pub fn var_positional(&self) -> Option<&str> {
        self.var_positional.as_deref()
    }

    pub fn var_keyword(&self) -> Option<&str> {
        self.var_keyword.as_deref()
    }

    /// Defaulted names with their values, in declaration order.
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &Value)> {
        let first = self.required_count();
        self.positional[first..]
            .iter()
            .map(String::as_str)
            .zip(self.defaults.iter())
    }

    pub fn default_for(&self, name: &str) -> Option<&Value> {
        self.defaults().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn params(&self) -> Vec<Param> {
        let first = self.required_count();
        self.positional
            .iter()
            .enumerate()
            .map(|(i, name)| Param {
                name: name.clone(),
                default: i.checked_sub(first).map(|d| self.defaults[d].clone()),
            })
            .collect()
    }

    /// Whether the first positional parameter is the receiver.
    pub fn has_receiver(&self) -> bool {
        self.positional.first().is_some_and(|n| n == RECEIVER)
    }

    /// The descriptor with a receiver synthesized as first positional name
    /// when it lacks one.
    pub fn with_receiver(&self) -> Self {
        if self.has_receiver() {
            return self.clone();
        }
        let mut out = self.clone();
        out.positional.insert(0, RECEIVER.to_string());
        out
    }

    /// The descriptor as callers see it: receiver slot removed.
    pub fn without_receiver(&self) -> Self {
        if !self.has_receiver() {
            return self.clone();
        }
        let mut out = self.clone();
        out.positional.remove(0);
        if out.defaults.len() > out.positional.len() {
            out.defaults.remove(0);
        }
        out
    }

    /// Descriptor used for comparison. In `iface_no_self` mode a contract
    /// declared without a receiver gets one, so it lines up with
    /// implementation descriptors that always carry it.
    pub fn extract(&self, iface_no_self: bool) -> Self {
        if iface_no_self {
            self.with_receiver()
        } else {
            self.clone()
        }
    }

    /// Map call arguments onto parameter names.
    ///
    /// Positional arguments fill names in order, with any surplus going to
    /// the variadic-positional slot. Keywords fill remaining names or land in
    /// the variadic-keyword slot. Missing names take their defaults.
    pub fn bind(&self, args: &CallArgs) -> Result<BoundArgs, ArgumentError> {
        let mut named: BTreeMap<String, Value> = BTreeMap::new();
        let mut extra_positional = Vec::new();
        let mut extra_keyword = BTreeMap::new();

        for (i, value) in args.positional.iter().enumerate() {
            match self.positional.get(i) {
                Some(name) => {
                    named.insert(name.clone(), value.clone());
                }
                None if self.has_var_positional() => extra_positional.push(value.clone()),
                None => {
                    return Err(ArgumentError::TooManyPositional {
                        expected: self.positional.len(),
                        given: args.positional.len(),
                    })
                }
            }
        }

        for (name, value) in &args.keyword {
            if self.positional.iter().any(|p| p == name) {
                if named.contains_key(name) {
                    return Err(ArgumentError::MultipleValues(name.clone()));
                }
                named.insert(name.clone(), value.clone());
            } else if self.has_var_keyword() {
                if extra_keyword.insert(name.clone(), value.clone()).is_some() {
                    return Err(ArgumentError::MultipleValues(name.clone()));
                }
            } else {
                return Err(ArgumentError::UnexpectedKeyword(name.clone()));
            }
        }

        let mut ordered = Vec::with_capacity(self.positional.len());
        for param in self.params() {
            let value = match named.remove(&param.name) {
                Some(v) => v,
                None => param
                    .default
                    .ok_or_else(|| ArgumentError::Missing(param.name.clone()))?,
            };
            ordered.push((param.name, value));
        }

        let bound = BoundArgs {
            named: ordered,
            extra_positional,
            extra_keyword,
        };
        contracts::check_binding_complete(self, &bound);
        Ok(bound)
    }
}

fn validate_name(name: &str) -> Result<(), SignatureError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => chars.all(|c| c == '_' || c.is_alphanumeric()),
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(SignatureError::InvalidName(name.to_string()))
    }
}

impl fmt::Display for SignatureDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self
            .params()
            .into_iter()
            .map(|p| match p.default {
                Some(v) => format!("{}={}", p.name, v),
                None => p.name,
            })
            .collect();
        if let Some(name) = &self.var_positional {
            parts.push(format!("*{}", name));
        }
        if let Some(name) = &self.var_keyword {
            parts.push(format!("**{}", name));
        }
        write!(f, "({})", parts.join(", "))
    }
}

impl FromStr for SignatureDescriptor {
    type Err = SignatureError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let src = src.trim();
        let src = src
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(src);

        let mut builder = SignatureBuilder::default();
        let parts: Vec<&str> = split_top_level(src, ',')
            .into_iter()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        for (i, part) in parts.iter().enumerate() {
            let is_last = i + 1 == parts.len();
            if let Some(name) = part.strip_prefix("**") {
                if !is_last {
                    return Err(SignatureError::MisplacedVariadic(part.to_string()));
                }
                builder = builder.var_keyword(name.trim());
            } else if let Some(name) = part.strip_prefix('*') {
                let next_is_kw = parts.get(i + 1).is_some_and(|p| p.starts_with("**"));
                if !(is_last || next_is_kw) {
                    return Err(SignatureError::MisplacedVariadic(part.to_string()));
                }
                builder = builder.var_positional(name.trim());
            } else if builder.var_positional.is_some() || builder.var_keyword.is_some() {
                return Err(SignatureError::MisplacedVariadic(part.to_string()));
            } else if let Some((name, literal)) = part.split_once('=') {
                builder.params.push(Param {
                    name: name.trim().to_string(),
                    default: Some(Value::parse_literal(literal)?),
                });
            } else {
                builder = builder.param(*part);
            }
        }
        builder.build()
    }
}

/// Incremental construction of a [`SignatureDescriptor`].
#[derive(Debug, Clone, Default)]
pub struct SignatureBuilder {
    params: Vec<Param>,
    var_positional: Option<String>,
    var_keyword: Option<String>,
}

impl SignatureBuilder {
    /// Start the list with the receiver parameter.
    pub fn receiver(self) -> Self {
        self.param(RECEIVER)
    }

    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param::required(name));
        self
    }

    pub fn params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.extend(names.into_iter().map(Param::required));
        self
    }

    pub fn default_param(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.params.push(Param::with_default(name, default));
        self
    }

    pub fn var_positional(mut self, name: impl Into<String>) -> Self {
        self.var_positional = Some(name.into());
        self
    }

    pub fn var_keyword(mut self, name: impl Into<String>) -> Self {
        self.var_keyword = Some(name.into());
        self
    }

    pub fn build(self) -> Result<SignatureDescriptor, SignatureError> {
        SignatureDescriptor::new(self.params, self.var_positional, self.var_keyword)
    }
}

/// Arguments supplied by a caller, receiver excluded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    pub positional: Vec<Value>,
    pub keyword: Vec<(String, Value)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.push((name.into(), value.into()));
        self
    }
}

impl From<Vec<Value>> for CallArgs {
    fn from(positional: Vec<Value>) -> Self {
        Self {
            positional,
            keyword: Vec::new(),
        }
    }
}

/// Build [`CallArgs`] from positional values.
///
/// ```
/// use covenant::{args, Value};
///
/// let a = args![1, "ff", 2];
/// assert_eq!(a.positional[1], Value::from("ff"));
/// ```
#[macro_export]
macro_rules! args {
    () => { $crate::CallArgs::new() };
    ($($value:expr),+ $(,)?) => {
        $crate::CallArgs::from(vec![$($crate::Value::from($value)),+])
    };
}

/// Arguments after binding against a particular descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArgs {
    named: Vec<(String, Value)>,
    extra_positional: Vec<Value>,
    extra_keyword: BTreeMap<String, Value>,
}

impl BoundArgs {
    /// Value of a named parameter or of a variadic keyword.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.named
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .or_else(|| self.extra_keyword.get(name))
    }

    /// Like [`get`](Self::get) but a missing name is a violation.
    pub fn require(&self, name: &str) -> Result<&Value, Violation> {
        self.get(name)
            .ok_or_else(|| Violation::new(format!("argument `{}` was not supplied", name)))
    }

    /// Require `name` to hold a value of `kind`.
    pub fn expect_kind(&self, name: &str, kind: ValueKind) -> Result<&Value, Violation> {
        let value = self.require(name)?;
        if value.is_a(kind) {
            Ok(value)
        } else {
            Err(Violation::new(format!(
                "`{}` must be {}, got {} ({})",
                name,
                kind,
                value.kind(),
                value
            )))
        }
    }

    pub fn named(&self) -> &[(String, Value)] {
        &self.named
    }

    pub fn extra_positional(&self) -> &[Value] {
        &self.extra_positional
    }

    pub fn extra_keyword(&self) -> &BTreeMap<String, Value> {
        &self.extra_keyword
    }
}
