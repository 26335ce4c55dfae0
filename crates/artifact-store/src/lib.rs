// In crates/artifact-store/src/lib.rs

use app_config::types::ArtifactSettings;
use core_types::ModelArtifact;
use std::fs;
use std::path::PathBuf;

pub mod error;

pub use error::{Error, Result};

const FILE_PREFIX: &str = "model_";
const FILE_EXTENSION: &str = "json";

/// A key-value store of model artifacts, one JSON document per model id.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The file a model id maps to.
    pub fn path_for(&self, model_id: &str) -> Result<PathBuf> {
        validate_model_id(model_id)?;
        Ok(self.root.join(format!("{FILE_PREFIX}{model_id}.{FILE_EXTENSION}")))
    }

    /// Writes the artifact, replacing any previous version, and returns its path.
    pub fn save(&self, artifact: &ModelArtifact) -> Result<PathBuf> {
        let path = self.path_for(&artifact.model_id)?;
        fs::create_dir_all(&self.root)?;
        fs::write(&path, serde_json::to_vec_pretty(artifact)?)?;
        tracing::info!(model_id = %artifact.model_id, path = %path.display(), "Saved model artifact.");
        Ok(path)
    }

    pub fn load(&self, model_id: &str) -> Result<ModelArtifact> {
        let path = self.path_for(model_id)?;
        tracing::info!(model_id, path = %path.display(), "Loading model artifact.");

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound(model_id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Lists the ids of all stored models, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.strip_prefix(FILE_PREFIX))
            {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

/// Opens the store configured in the application settings.
pub fn open(settings: &ArtifactSettings) -> ArtifactStore {
    ArtifactStore::new(settings.dir.clone())
}

fn validate_model_id(model_id: &str) -> Result<()> {
    let valid = !model_id.is_empty()
        && model_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidModelId(model_id.to_string()))
    }
}
