// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use covenant::{check_signature_acceptable, BindOptions, Manifest, ModelOutcome, SignatureDescriptor};

mod cli;
use cli::display::{self, CYAN, GRAY};
use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::Check {
            manifest,
            no_runtime_check,
            json,
        } => run_check(&manifest, no_runtime_check, json),
        Commands::Compat {
            contract,
            implementation,
            no_self,
        } => run_compat(&contract, &implementation, no_self),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let filter = log_filter(base, verbose);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().without_time().with_writer(std::io::stderr))
        .init();
}

/// `-v` raises the crate to debug on top of whatever `RUST_LOG` selected.
fn log_filter(base: EnvFilter, verbose: bool) -> EnvFilter {
    if !verbose {
        return base;
    }
    match "covenant=debug".parse() {
        Ok(directive) => base.add_directive(directive),
        Err(_) => base,
    }
}

/// Options precedence: manifest, then environment, then the command line.
fn resolve_options(manifest: &Manifest, no_runtime_check: bool) -> BindOptions {
    let mut options = manifest.options;
    if std::env::var_os(covenant::config::RUNTIME_CHECK_ENV).is_some() {
        options = BindOptions::from_env();
    }
    if no_runtime_check {
        options.runtime_check = false;
    }
    options
}

fn run_check(path: &Path, no_runtime_check: bool, json: bool) -> Result<bool> {
    let manifest = Manifest::from_path(path)
        .with_context(|| format!("loading manifest {}", path.display()))?;
    let options = resolve_options(&manifest, no_runtime_check);
    let (_, report) = manifest
        .check(&options)
        .with_context(|| format!("declaring {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report.passed());
    }

    display::section_top(&format!("INTERFACES ({})", report.interfaces.len()));
    for name in &report.interfaces {
        display::row(&display::themed(CYAN, &[], name));
    }
    display::section_bot();

    display::section_top(&format!("MODELS ({})", report.models.len()));
    for outcome in &report.models {
        match outcome {
            ModelOutcome::Bound {
                model,
                interfaces,
                revalidated,
            } => {
                display::row(&format!("{} {}", display::bound_badge(), model));
                if !interfaces.is_empty() {
                    display::row(&display::dim(&format!("    implements {}", interfaces.join(", "))));
                }
                if !revalidated.is_empty() {
                    display::row(&display::dim(&format!("    validated {}", revalidated.join(", "))));
                }
            }
            ModelOutcome::Rejected { model, error } => {
                display::row(&format!("{} {}", display::rejected_badge(), model));
                let detail = display::truncate(error, display::BOX_WIDTH - 6);
                display::row(&format!("    {}", detail));
            }
            ModelOutcome::Skipped { model, parent } => {
                display::row(&format!(
                    "{} {} {}",
                    display::skipped_badge(),
                    model,
                    display::themed(GRAY, &[], &format!("(parent {} failed)", parent))
                ));
            }
        }
    }
    display::section_bot();

    let failed = report.failures().count();
    if failed > 0 {
        eprintln!("{} of {} models failed", failed, report.models.len());
    }
    Ok(report.passed())
}

fn run_compat(contract: &str, implementation: &str, no_self: bool) -> Result<bool> {
    let contract: SignatureDescriptor = contract
        .parse()
        .with_context(|| format!("parsing contract `{}`", contract))?;
    let implementation: SignatureDescriptor = implementation
        .parse()
        .with_context(|| format!("parsing implementation `{}`", implementation))?;

    match check_signature_acceptable(&contract, &implementation, no_self) {
        Ok(()) => {
            println!("{} {} accepts {}", display::bound_badge(), contract, implementation);
            Ok(true)
        }
        Err(reason) => {
            println!("{} {}: {}", display::rejected_badge(), reason.rule(), reason);
            Ok(false)
        }
    }
}
