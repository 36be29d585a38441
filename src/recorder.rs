//! Append-only prediction log: one JSON object per line, written for
//! every handled request. Each append opens the file fresh, so existing
//! lines are never rewritten. There is no locking and no rotation.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::models::PredictionResponse;

pub struct PredictionLog {
    path: PathBuf,
}

impl PredictionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PredictionLog { path: path.into() }
    }

    pub fn append(&self, record: &PredictionResponse) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(record)?)
    }
}
