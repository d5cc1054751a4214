// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `disposer lint`: run the analysis rules over C# source files.
//!
//! All `.cs` files under the given path form ONE compilation, so types may
//! derive from types declared in other files. Front-end errors and rule
//! diagnostics are reported together; the command exits non-zero if any are
//! found.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use disposer_core::lint::find_rule;
use disposer_core::prelude::{Compilation, CompilationOptions, Diagnostic};
use disposer_core::source_analysis::sort_and_dedup;
use miette::{Context, IntoDiagnostic, Result};
use tracing::{debug, info};

use crate::config::{Settings, find_config, parse_config};
use crate::diagnostic::LintDiagnostic;

/// Source file extension picked up from directories.
const SOURCE_EXTENSION: &str = "cs";

/// Arguments of `disposer lint`.
#[derive(Debug, Clone)]
pub struct LintArgs {
    pub path: Utf8PathBuf,
    pub format: OutputFormat,
    pub language: Option<String>,
    pub sequential: bool,
    pub config: Option<Utf8PathBuf>,
}

/// Run the lint rules on the given path (file or directory).
///
/// Prints each diagnostic and returns an error if any are found.
pub fn run_lint(args: &LintArgs) -> Result<()> {
    let path = args.path.as_path();
    let source_files = if path.is_file() {
        if path.extension() == Some(SOURCE_EXTENSION) {
            vec![path.to_path_buf()]
        } else {
            miette::bail!("File '{}' is not a .cs source file", path);
        }
    } else if path.is_dir() {
        collect_source_files_from_dir(path)?
    } else {
        miette::bail!("Path '{}' does not exist", path);
    };

    if source_files.is_empty() {
        miette::bail!("No .cs source files found in '{path}'");
    }

    let settings = load_settings(args)?;

    let mut sources = Vec::with_capacity(source_files.len());
    for file in &source_files {
        let text = fs::read_to_string(file)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read '{file}'"))?;
        sources.push((file.to_string(), text));
    }

    let compilation = Compilation::new(
        sources,
        CompilationOptions {
            language: settings.language,
            ..CompilationOptions::default()
        },
    );
    let mut diagnostics: Vec<Diagnostic> = compilation.diagnostics().to_vec();
    diagnostics.extend(disposer_core::lint::run_lint(&compilation, &settings.lint));
    sort_and_dedup(&mut diagnostics);
    info!(
        files = source_files.len(),
        diagnostics = diagnostics.len(),
        "lint finished"
    );

    for diagnostic in &diagnostics {
        let (file_path, source) = diagnostic
            .file
            .and_then(|id| compilation.file(id))
            .map_or(("<core>", ""), |file| (file.path.as_str(), file.text.as_str()));
        match args.format {
            OutputFormat::Text => {
                let report = LintDiagnostic::from_core_diagnostic(diagnostic, file_path, source);
                eprintln!("{:?}", miette::Report::new(report));
            }
            OutputFormat::Json => println!("{}", json_line(diagnostic, file_path)),
        }
    }

    if !diagnostics.is_empty() {
        let count = diagnostics.len();
        let files_checked = source_files.len();
        let plural = if count == 1 { "" } else { "s" };
        miette::bail!("{count} diagnostic{plural} found in {files_checked} file(s)");
    }

    Ok(())
}

/// Reads `disposer.toml` (explicit or next to the path) and applies flags.
fn load_settings(args: &LintArgs) -> Result<Settings> {
    let file = match &args.config {
        Some(config) => Some(parse_config(config)?),
        None => {
            let dir = if args.path.is_dir() {
                Some(args.path.as_path())
            } else {
                args.path.parent()
            };
            match dir {
                Some(dir) if !dir.as_str().is_empty() => find_config(dir)?,
                _ => find_config(Utf8Path::new("."))?,
            }
        }
    };
    let settings = file.unwrap_or_default().into_settings()?;
    let settings = settings.with_overrides(args.language.as_deref(), args.sequential)?;
    debug!(
        language = settings.language.as_str(),
        parallel = settings.lint.parallel,
        "lint settings"
    );
    Ok(settings)
}

/// One JSON object describing `diagnostic`.
fn json_line(diagnostic: &Diagnostic, file_path: &str) -> serde_json::Value {
    let help_url = diagnostic
        .code
        .as_deref()
        .and_then(find_rule)
        .map(|rule| rule.descriptor().help_url);
    serde_json::json!({
        "file": file_path,
        "rule": diagnostic.code.as_deref(),
        "severity": diagnostic.severity.as_str(),
        "message": diagnostic.message.as_str(),
        "span_start": diagnostic.span.start(),
        "span_end": diagnostic.span.end(),
        "arguments": diagnostic.arguments.iter().map(|a| a.as_str()).collect::<Vec<_>>(),
        "help_url": help_url,
    })
}

/// Collect all `.cs` files below `dir`, sorted for deterministic output.
pub fn collect_source_files_from_dir(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();
    collect_cs_files_recursive(dir, &mut files)?;
    files.sort();
    Ok(files)
}

/// Recursively collect all `.cs` files from a directory tree.
///
/// Symlinks are skipped to avoid potential infinite recursion from circular links.
fn collect_cs_files_recursive(dir: &Utf8Path, files: &mut Vec<Utf8PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read directory '{dir}'"))?
    {
        let entry = entry.into_diagnostic()?;
        let file_type = entry.file_type().into_diagnostic()?;
        if file_type.is_symlink() {
            continue;
        }
        let entry_path = Utf8PathBuf::from_path_buf(entry.path())
            .map_err(|_| miette::miette!("Non-UTF-8 path"))?;

        if file_type.is_dir() {
            collect_cs_files_recursive(&entry_path, files)?;
        } else if file_type.is_file() && entry_path.extension() == Some(SOURCE_EXTENSION) {
            files.push(entry_path);
        }
    }
    Ok(())
}

/// Output format for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output via miette (default).
    #[default]
    Text,
    /// Machine-readable JSON (one object per line).
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown format '{other}': expected 'text' or 'json'"
            )),
        }
    }
}
