// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Repolore CLI - explainable profiles of unfamiliar repositories

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use repolore::commands::{self, Output};
use repolore::config;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "repolore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "REPOLORE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", global = true)]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recent commits, module counts and a file preview
    Analyze {
        /// Repository URL or local path
        repo: String,
    },

    /// Describe the project: type, stack, features and layout
    Summary {
        /// Repository URL or local path
        #[arg(default_value = ".")]
        repo: String,
    },

    /// Build the static import graph
    Deps {
        /// Repository URL or local path
        #[arg(default_value = ".")]
        repo: String,
    },

    /// Render the dependency graph as a diagram
    Diagram {
        /// Repository URL or local path
        #[arg(default_value = ".")]
        repo: String,

        /// Output format (mermaid, dot)
        #[arg(short, long, default_value = "mermaid")]
        format: String,

        /// Maximum number of nodes
        #[arg(long)]
        max_nodes: Option<usize>,

        /// Maximum number of edges
        #[arg(long)]
        max_edges: Option<usize>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Classify the files touched by the early commits
    Roles {
        /// Repository URL or local path
        repo: String,

        /// Hosting API token (overrides the configured one)
        #[arg(long)]
        token: Option<String>,
    },

    /// Per-file change statistics across the early commits
    Evolution {
        /// Repository URL or local path
        repo: String,

        /// Hosting API token (overrides the configured one)
        #[arg(long)]
        token: Option<String>,
    },

    /// Timeline of one file
    History {
        /// Repository URL or local path
        repo: String,

        /// Repo-relative file path
        file: String,

        /// Hosting API token (overrides the configured one)
        #[arg(long)]
        token: Option<String>,
    },

    /// List the functions and classes of one file
    Symbols {
        /// Repository URL or local path
        repo: String,

        /// Repo-relative file path
        file: String,
    },

    /// Describe each function and class of one file in prose
    Summarize {
        /// Repository URL or local path
        repo: String,

        /// Repo-relative file path
        file: String,
    },

    /// Dashboard: summary, file roles, connections and history
    Profile {
        /// Repository URL or local path
        repo: String,

        /// Hosting API token (overrides the configured one)
        #[arg(long)]
        token: Option<String>,
    },

    /// Architecture overview: layers, key files and diagram
    Architecture {
        /// Repository URL or local path
        repo: String,

        /// Hosting API token (overrides the configured one)
        #[arg(long)]
        token: Option<String>,
    },

    /// Print the effective configuration
    Config {
        /// Print the default config file location instead
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => LevelFilter::ERROR,
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::default().add_directive(log_level.into()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Completions { shell } = cli.command {
        return commands::completions::run(shell, &mut Cli::command());
    }

    let config = config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let out = Output::new(cli.json, !cli.no_color);

    // Execute command
    match cli.command {
        Commands::Analyze { repo } => commands::analyze::run(&out, config, &repo),
        Commands::Summary { repo } => commands::summary::run(&out, config, &repo),
        Commands::Deps { repo } => commands::deps::run(&out, config, &repo),
        Commands::Diagram { repo, format, max_nodes, max_edges, output } => {
            commands::diagram::run(&out, config, &repo, &format, max_nodes, max_edges, output)
        }
        Commands::Roles { repo, token } => commands::roles::run(&out, config, &repo, token.as_deref()),
        Commands::Evolution { repo, token } => commands::evolution::run(&out, config, &repo, token.as_deref()),
        Commands::History { repo, file, token } => {
            commands::history::run(&out, config, &repo, &file, token.as_deref())
        }
        Commands::Symbols { repo, file } => commands::symbols::run(&out, config, &repo, &file),
        Commands::Summarize { repo, file } => commands::summarize::run(&out, config, &repo, &file),
        Commands::Profile { repo, token } => commands::profile::run(&out, config, &repo, token.as_deref()),
        Commands::Architecture { repo, token } => {
            commands::architecture::run(&out, config, &repo, token.as_deref())
        }
        Commands::Config { path } => commands::config::run(&out, &config, path),
        Commands::Completions { .. } => Ok(()),
    }
}
