//! Interface contracts for dynamically bound model types.
//!
//! An interface declares method contracts (a parameter list plus an optional
//! check body). A model type declares which interfaces it implements. When
//! the model is bound, every contract is verified against the model's
//! implementation signatures, and accepted methods are wrapped so their
//! check bodies run around each call.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ signature.rs │────▶│ interface.rs │────▶│ registry.rs  │
//! │ (descriptor, │     │ (contracts,  │     │ (lookup by   │
//! │  binding)    │     │  hooks)      │     │  name)       │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!        │                    │                    │
//!        ▼                    ▼                    ▼
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  compat.rs   │◀────│  binder.rs   │────▶│  resolve.rs  │
//! │ (acceptable  │     │ (bind_model, │     │ (merge,      │
//! │  signatures) │     │  ModelType)  │     │  consistency)│
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                             │
//!                             ▼
//!                      ┌──────────────┐     ┌──────────────┐
//!                      │  adapter.rs  │────▶│   check.rs   │
//!                      │ (two-phase   │     │ (check body  │
//!                      │  call)       │     │  protocol)   │
//!                      └──────────────┘     └──────────────┘
//! ```
//!
//! # Failure modes
//!
//! | Error                                    | Raised when                                  |
//! |------------------------------------------|----------------------------------------------|
//! | [`BindError::SignatureIncompatible`]     | implementation cannot accept contract's args |
//! | [`BindError::InterfaceConflict`]         | independent interfaces disagree on a name    |
//! | [`BindError::MissingImplementation`]     | no method anywhere in the ancestry           |
//! | [`BindError::HookRejection`]             | a post-construction hook refused the model   |
//! | [`CallError::ContractViolation`]         | a check body rejected a call                 |
//! | [`CallError::MalformedCheckFunction`]    | a check body suspended twice                 |
//!
//! # Usage
//!
//! ```
//! use covenant::{check, ensure, BindOptions, CallError, InterfaceBuilder, ModelBuilder, Value, ValueKind};
//!
//! let numbers = InterfaceBuilder::new("Numbers")
//!     .checked_method(
//!         "double",
//!         "x".parse().unwrap(),
//!         check::two_phase(
//!             |args| {
//!                 args.expect_kind("x", ValueKind::Int)?;
//!                 Ok(())
//!             },
//!             |_, result| ensure(result.is_a(ValueKind::Int), "result must be int"),
//!         ),
//!     )
//!     .build();
//!
//! let model = ModelBuilder::new("Doubler")
//!     .implements(&numbers)
//!     .method("double", "self, x".parse().unwrap(), |args| {
//!         let x = args.get("x").and_then(Value::as_int).unwrap_or(0);
//!         Ok(Value::Int(x * 2))
//!     })
//!     .bind(&BindOptions::default())
//!     .unwrap();
//!
//! assert_eq!(model.call("double", &covenant::args![21]), Ok(Value::Int(42)));
//! assert!(matches!(
//!     model.call("double", &covenant::args!["21"]),
//!     Err(CallError::ContractViolation { .. })
//! ));
//! ```

// Module declarations
pub mod adapter;
pub mod binder;
pub mod check;
pub mod compat;
pub mod config;
pub mod contracts;
pub mod error;
pub mod interface;
pub mod manifest;
pub mod registry;
pub mod resolve;
pub mod signature;
pub mod testing;
pub mod value;

// Re-exports for public API
pub use adapter::{method_fn, CheckAdapter, CheckPhase, Implementation, MethodFn};
pub use binder::{bind_model, BoundMethod, ModelBuilder, ModelDecl, ModelHandle, ModelType};
pub use check::{CheckBody, CheckState, ContractCheck, ResultCheck};
pub use compat::{check_compatible, check_signature_acceptable, mutually_compatible, Incompatibility};
pub use config::BindOptions;
pub use error::{
    ensure, ArgumentError, BindError, CallError, ManifestError, RegistryError, SignatureError,
    Violation,
};
pub use interface::{
    define_interface, ContractMethod, HookFn, InterfaceBuilder, InterfaceDefinition,
    InterfaceHandle, MemberDecl, MemberKind,
};
pub use manifest::{CheckReport, Manifest, ModelOutcome};
pub use registry::InterfaceRegistry;
pub use resolve::{ConsistencyResolver, ResolvedMethod};
pub use signature::{BoundArgs, CallArgs, Param, SignatureBuilder, SignatureDescriptor};
pub use value::{Value, ValueKind};
