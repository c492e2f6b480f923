//! Command-line interface for trackify
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::gateway::Gateway;
use crate::output::OutputOptions;

mod add;
mod board;
mod init;
mod ls;
mod rm;
mod urgency;

/// trackify - task time tracking
///
/// Create task cards, run one elapsed-time timer at a time, assign urgency
/// levels and keep everything persisted in a remote card store.
#[derive(Parser, Debug)]
#[command(name = "trackify")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base URL of the card store server (e.g. http://localhost:3000)
    #[arg(long, global = true, env = "TRACKIFY_SERVER")]
    pub server: Option<String>,

    /// Path to a trackify.toml config file
    #[arg(long, global = true, env = "TRACKIFY_CONFIG")]
    pub config: Option<std::path::PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default trackify.toml in the working directory
    Init,

    /// Create a card and persist it to the card store
    Add {
        /// What you are working on
        description: String,

        /// Urgency: low, normal, high
        #[arg(long, default_value = "normal")]
        urgency: String,
    },

    /// List cards from the card store
    Ls,

    /// Reassign a card's urgency
    Urgency {
        /// Card id
        id: u64,

        /// Urgency: low, normal, high
        level: String,
    },

    /// Delete a card from the card store
    Rm {
        /// Card id
        id: u64,
    },

    /// Interactive board with live timers
    Board,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let options = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };

        if let Commands::Init = self.command {
            return init::run(options);
        }

        let gateway = self.gateway()?;

        // All remaining commands talk to the remote store; they share one
        // current-thread runtime so the whole process stays single-threaded.
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        runtime.block_on(async move {
            match self.command {
                Commands::Init => unreachable!("handled above"),
                Commands::Add {
                    description,
                    urgency,
                } => add::run(gateway, &description, &urgency, options).await,
                Commands::Ls => ls::run(gateway, options).await,
                Commands::Urgency { id, level } => {
                    urgency::run(gateway, id, &level, options).await
                }
                Commands::Rm { id } => rm::run(gateway, id, options).await,
                Commands::Board => board::run(gateway).await,
            }
        })
    }

    fn gateway(&self) -> Result<Gateway> {
        let config = Config::load_default(self.config.as_deref())?
            .with_server_url(self.server.clone())?;
        Gateway::new(&config.server.url, config.server.timeout())
    }
}
