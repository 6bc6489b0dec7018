use std::{
    fs, io,
    path::{Path, PathBuf},
};

use draw_model::AdjustPolicy;

pub const DEFAULT_STATE_DIR: &str = "tombola.state";

#[derive(Clone)]
pub struct PoolConfig {
    pub state_dir: PathBuf,
    /// Fixed RNG seed; `None` seeds from the clock at bootstrap.
    pub seed: Option<u64>,
    pub policy: AdjustPolicy,
}

impl PoolConfig {
    pub fn new(state_dir: PathBuf) -> Self {
        Self {
            state_dir,
            seed: None,
            policy: AdjustPolicy::default(),
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn roster_path(&self) -> PathBuf {
        self.state_dir.join("participants.json")
    }

    pub fn history_path(&self) -> PathBuf {
        self.state_dir.join("selections.jsonl")
    }

    pub fn ensure_dirs(&self) -> io::Result<()> {
        if !self.state_dir.exists() {
            fs::create_dir_all(&self.state_dir)?;
        }
        Ok(())
    }
}
