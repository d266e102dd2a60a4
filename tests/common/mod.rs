#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tmq::error::{Error, Result};
use tmq::sources::remote::RemoteClient;

/// In-process stand-in for the remote todo endpoint.
///
/// Speaks the same `ged` command protocol and ignores duplicate adds.
#[derive(Default)]
pub struct FakeEndpoint {
    pub titles: Mutex<Vec<String>>,
    pub commands: Mutex<Vec<String>>,
}

pub struct FakeClient(pub Arc<FakeEndpoint>);

impl RemoteClient for FakeClient {
    fn get(&self, _url: &str, query: &[(&str, &str)]) -> Result<String> {
        let param = |name: &str| {
            query
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        };
        let command = param("ged").unwrap_or_default();
        self.0.commands.lock().push(command.clone());

        let mut titles = self.0.titles.lock();
        match command.as_str() {
            "todoGet" => Ok(titles.join("\n")),
            "taskAdd" => {
                let title = param("task").unwrap_or_default();
                if !titles.contains(&title) {
                    titles.push(title);
                }
                Ok(String::new())
            }
            "taskRemo" => {
                let title = param("task").unwrap_or_default();
                titles.retain(|t| *t != title);
                Ok(String::new())
            }
            other => Err(Error::Transport(format!("unknown command {other}"))),
        }
    }
}

/// Write `content` as a config file inside a fresh temp dir.
pub fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.toml");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}
