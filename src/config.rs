use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SpamError};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub artifacts: ArtifactConfig,
    pub logging: LoggingConfig,
}

/// Where the pre-built artifacts live. Relative file names resolve
/// against `dir`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub dir: PathBuf,
    pub message_classifier: PathBuf,
    pub message_labels: PathBuf,
    pub message_vectorizer: PathBuf,
    pub email_classifier: PathBuf,
    pub email_vectorizer: PathBuf,
    /// Newline-delimited stop-word list; the bundled English list otherwise.
    pub stopwords: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
            message_classifier: PathBuf::from("spam_classifier_model.bin"),
            message_labels: PathBuf::from("label_encoder.bin"),
            message_vectorizer: PathBuf::from("countvectorizer.bin"),
            email_classifier: PathBuf::from("spam_classifier_model_email.bin"),
            email_vectorizer: PathBuf::from("countvectorizer_email.bin"),
            stopwords: None,
        }
    }
}

impl ArtifactConfig {
    /// Default file names under `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn path(&self, name: &Path) -> PathBuf {
        if name.is_absolute() {
            name.to_path_buf()
        } else {
            self.dir.join(name)
        }
    }

    pub fn stopwords_path(&self) -> Option<PathBuf> {
        self.stopwords.as_deref().map(|p| self.path(p))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SpamError::io(path, e))?;

        toml::from_str(&content)
            .map_err(|e| SpamError::Config(format!("{}: {e}", path.display())))
    }
}
