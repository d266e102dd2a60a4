use clap::{Parser, Subcommand};

/// tmq: todo list over pluggable task sources
#[derive(Parser, Debug, Clone)]
#[command(name = "tmq", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,

    /// Path to config file (default: ~/.config/tmq/todo.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// List tasks
    #[command(visible_aliases = ["l", "get", "g"])]
    List,

    /// Create a task
    #[command(visible_aliases = ["a", "c", "create"])]
    Add {
        /// Task title
        task: String,
    },

    /// Delete a task
    #[command(visible_aliases = ["r", "d", "delete"])]
    Remo {
        /// Task title
        task: String,
    },
}
