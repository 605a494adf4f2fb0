// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the covenant command-line interface.
//!
//! Two subcommands: `check` binds every model in a JSON manifest and reports
//! which ones satisfy their interfaces, and `compat` runs the signature
//! checker on two parameter lists given on the command line.

pub mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "covenant",
    about = "Interface contract checking for model types",
    version
)]
pub struct Cli {
    /// Log binder decisions (same as RUST_LOG=covenant=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bind every model declared in a manifest and report the outcome
    Check {
        /// Path to the manifest JSON file
        manifest: PathBuf,

        /// Validate signatures but do not wrap methods in check adapters
        ///
        /// Overrides the manifest's `options.runtime_check` and the
        /// COVENANT_RUNTIME_CHECK environment variable.
        #[arg(long)]
        no_runtime_check: bool,

        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check whether an implementation signature satisfies a contract
    Compat {
        /// Contract parameter list, e.g. "x, y=1, *rest"
        contract: String,

        /// Implementation parameter list, e.g. "self, x, y=1, *rest"
        implementation: String,

        /// Treat the contract as declared without a receiver and add one
        #[arg(long)]
        no_self: bool,
    },
}
