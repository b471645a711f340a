//! Durable storage of a single controller as a JSON file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::info;

use super::brain::Controller;
use super::error::SimError;

/// A file slot holding at most one saved controller.
#[derive(Debug, Clone)]
pub struct BrainStore {
    path: PathBuf,
}

impl BrainStore {
    /// A store backed by `path`. Nothing is touched until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a controller is currently saved.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Saves the controller to a JSON file, replacing any previous one.
    pub fn save(&self, controller: &Controller) -> Result<(), SimError> {
        let json = controller.to_json()?;
        std::fs::write(&self.path, json)?;
        info!("saved controller to {}", self.path.display());
        Ok(())
    }

    /// Loads the saved controller, or `None` if nothing is saved.
    pub fn load(&self) -> Result<Option<Controller>, SimError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let controller = Controller::from_json(&json)?;
        info!("loaded controller from {}", self.path.display());
        Ok(Some(controller))
    }

    /// Removes the saved controller. Returns whether there was one.
    pub fn delete(&self) -> Result<bool, SimError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!("deleted controller at {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
