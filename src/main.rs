use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tmq::cli::{Cli, CliCommand};
use tmq::client::{AddOptions, RemoveOptions, TodoList};
use tmq::config::Config;
use tmq::error::Result;
use tmq::sources::build_source;
use tmq::task::Tags;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli)?;
    debug!(?config, "config loaded");

    let todo = TodoList::new(build_source(&config.source)?);

    match &cli.command {
        CliCommand::List => {
            for task in todo.get_tasks()? {
                println!("{}", task.title());
            }
        }
        CliCommand::Add { task } => {
            todo.add_task(task, Tags::new(), AddOptions::default())?;
            info!(title = %task, "task added");
        }
        CliCommand::Remo { task } => {
            todo.remove_task(task, RemoveOptions::default())?;
            info!(title = %task, "task removed");
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
