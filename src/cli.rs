// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cargolift")]
#[command(about = "Start, stop and deploy to local Java application servers")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output, only final results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// JSON lines output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new cargolift.yml configuration file
    Init {
        /// Container id (see `cargolift containers`)
        #[arg(short, long)]
        container: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Configure and start the container, waiting until it answers
    Start,

    /// Stop the container and wait for its ports to close
    Stop,

    /// Start the container, wait for Ctrl-C, then stop it
    Run,

    /// Install the configured deployables without starting the container
    Deploy {
        /// Remove and copy again deployables that are already installed
        #[arg(long)]
        redeploy: bool,
    },

    /// Merge several WARs into one
    Merge {
        /// Source WARs; the first one provides the base web.xml
        #[arg(required = true)]
        wars: Vec<PathBuf>,

        /// Merged WAR to write
        #[arg(short, long)]
        output: PathBuf,

        /// Extra JAR to add to WEB-INF/lib (repeatable)
        #[arg(long = "jar")]
        jars: Vec<PathBuf>,

        /// Drop the JARs the source WARs carry in WEB-INF/lib
        #[arg(long)]
        no_merge_jars: bool,

        /// Resource to merge by line union, e.g. META-INF/services/x (repeatable)
        #[arg(long = "concat")]
        concat: Vec<String>,
    },

    /// List the known container kinds
    Containers,
}
