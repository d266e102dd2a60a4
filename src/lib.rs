pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod sources;
pub mod task;

pub use client::{AddOptions, RemoveOptions, RemoveTarget, TaggedTasks, TodoList};
pub use error::{Error, Result};
pub use sources::{LocalSource, RemoteSource, Source, TagSource};
pub use task::{Tags, Task, TaskRecord, tags};
