//! Task persistence
//!
//! With `--store-tasks` the miner appends every prompt it serves to a
//! per-day JSONL file. Storage is best-effort: the caller logs failures and
//! keeps serving.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

#[derive(Serialize)]
struct TaskRecord<'a> {
    received_at: &'a str,
    text: &'a str,
}

/// Appends received prompts to per-day JSONL files under one directory.
pub struct TaskStore {
    dir: PathBuf,
}

impl TaskStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at `MINR_TASK_DIR`, falling back to `./tasks`.
    pub fn from_env() -> Self {
        let dir = std::env::var("MINR_TASK_DIR").unwrap_or_else(|_| "tasks".to_string());
        Self::new(dir)
    }

    /// Append one record per prompt to today's file.
    pub fn append(&self, task: &[String]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create task directory {}", self.dir.display()))?;

        let now = Utc::now();
        let path = self
            .dir
            .join(format!("tasks-{}.jsonl", now.format("%Y-%m-%d")));
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        let received_at = now.to_rfc3339();
        for text in task {
            let record = TaskRecord {
                received_at: &received_at,
                text,
            };
            serde_json::to_writer(&mut file, &record)?;
            file.write_all(b"\n")?;
        }
        Ok(())
    }
}
