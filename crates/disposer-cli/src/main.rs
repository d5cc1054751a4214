// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Disposer command-line interface.
//!
//! This is the main entry point for the `disposer` command.

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, Subcommand};
use miette::Result;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod diagnostic;

use commands::lint::{LintArgs, OutputFormat};

/// Disposer: checks that dispose overrides call their base implementation
#[derive(Debug, Parser)]
#[command(name = "disposer")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Lint source files and report rule violations
    Lint {
        /// Source file or directory to lint
        #[arg(default_value = ".")]
        path: Utf8PathBuf,

        /// Output format: `text` or `json`
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Source language used for message spelling: `csharp` or `visual-basic`
        #[arg(long)]
        language: Option<String>,

        /// Analyze method bodies on one thread
        #[arg(long)]
        sequential: bool,

        /// Configuration file (default: `disposer.toml` next to PATH)
        #[arg(long)]
        config: Option<Utf8PathBuf>,
    },

    /// List the registered rules
    Rules,

    /// Describe one rule
    Explain {
        /// Rule identifier, e.g. `CA2215`
        rule: String,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Lint {
            path,
            format,
            language,
            sequential,
            config,
        } => commands::lint::run_lint(&LintArgs {
            path,
            format,
            language,
            sequential,
            config,
        }),
        Command::Rules => {
            commands::rules::list_rules();
            Ok(())
        }
        Command::Explain { rule } => commands::rules::explain(&rule),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{e:?}");
            std::process::exit(1);
        }
    }
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "disposer=warn,disposer_core=warn",
        1 => "disposer=debug,disposer_core=debug",
        _ => "disposer=trace,disposer_core=trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn directive_defaults() {
        assert_eq!(directive_for_verbosity(0), "disposer=warn,disposer_core=warn");
        assert_eq!(directive_for_verbosity(1), "disposer=debug,disposer_core=debug");
        assert_eq!(directive_for_verbosity(5), "disposer=trace,disposer_core=trace");
    }

    #[test]
    fn lint_defaults() {
        let cli = Cli::parse_from(["disposer", "lint"]);
        match cli.command {
            Command::Lint {
                path,
                format,
                language,
                sequential,
                config,
            } => {
                assert_eq!(path, ".");
                assert_eq!(format, OutputFormat::Text);
                assert!(language.is_none());
                assert!(!sequential);
                assert!(config.is_none());
            }
            other => panic!("expected lint, got {other:?}"),
        }
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::parse_from(["disposer", "-vv", "rules"]);
        assert_eq!(cli.verbose, 2);
    }
}
