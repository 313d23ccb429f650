// ABOUTME: Entry point for the cargolift CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use cargolift::error::Result;
use cargolift::output::{Output, OutputMode};
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(OutputMode::from_flags(cli.quiet, cli.json));

    if let Err(e) = run(cli.command, output).await {
        Output::new(OutputMode::from_flags(cli.quiet, cli.json)).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(command: Commands, output: Output) -> Result<()> {
    match command {
        Commands::Init { container, force } => commands::init(container.as_deref(), force, output),
        Commands::Start => commands::start(output).await,
        Commands::Stop => commands::stop(output).await,
        Commands::Run => commands::run(output).await,
        Commands::Deploy { redeploy } => commands::deploy(redeploy, output),
        Commands::Merge {
            wars,
            output: target,
            jars,
            no_merge_jars,
            concat,
        } => commands::merge(
            commands::MergeArgs {
                wars,
                target,
                jars,
                merge_jars: !no_merge_jars,
                concat,
            },
            output,
        ),
        Commands::Containers => {
            commands::containers(output);
            Ok(())
        }
    }
}
