//! Loading and saving of the pre-built model artifacts.
//!
//! Artifacts are plain serde values. Files ending in `.json` use JSON, which
//! is what an external training job usually exports; anything else is
//! bincode. Everything is loaded and cross-checked once, before the first
//! request, and is read-only afterwards.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::classifier::Classifier;
use crate::config::ArtifactConfig;
use crate::error::{Result, SpamError};
use crate::label::LabelEncoder;
use crate::preprocess::{StemmerKind, StopWords};
use crate::track::{EmailPipeline, MessagePipeline, TrackPipeline};
use crate::vectorizer::CountVectorizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Bincode,
    Json,
}

impl Codec {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Codec::Json,
            _ => Codec::Bincode,
        }
    }
}

pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| SpamError::io(path, e))?;
    let reader = BufReader::new(file);

    match Codec::for_path(path) {
        Codec::Json => serde_json::from_reader(reader).map_err(|e| SpamError::artifact(path, e)),
        Codec::Bincode => bincode::deserialize_from(reader).map_err(|e| SpamError::artifact(path, e)),
    }
}

pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).map_err(|e| SpamError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    match Codec::for_path(path) {
        Codec::Json => {
            serde_json::to_writer(&mut writer, value).map_err(|e| SpamError::artifact(path, e))?
        }
        Codec::Bincode => {
            bincode::serialize_into(&mut writer, value).map_err(|e| SpamError::artifact(path, e))?
        }
    }

    writer.flush().map_err(|e| SpamError::io(path, e))
}

fn load_classifier(path: &Path) -> Result<Classifier> {
    let classifier: Classifier = load(path)?;
    classifier
        .validate()
        .map_err(|e| SpamError::artifact(path, e))?;
    info!(
        path = %path.display(),
        kind = classifier.kind(),
        features = classifier.n_features(),
        classes = classifier.classes().len(),
        "loaded classifier"
    );
    Ok(classifier)
}

fn load_vectorizer(path: &Path) -> Result<CountVectorizer> {
    let vectorizer: CountVectorizer = load(path)?;
    info!(
        path = %path.display(),
        vocabulary = vectorizer.dimension(),
        stemmer = ?vectorizer.stemmer(),
        "loaded vectorizer"
    );
    Ok(vectorizer)
}

fn load_labels(path: &Path) -> Result<LabelEncoder> {
    let labels: LabelEncoder = load(path)?;
    labels.validate().map_err(|e| SpamError::artifact(path, e))?;
    info!(path = %path.display(), classes = ?labels.classes(), "loaded label encoder");
    Ok(labels)
}

fn load_stopwords(config: &ArtifactConfig) -> Result<StopWords> {
    let stopwords = match config.stopwords_path() {
        Some(path) => {
            let stopwords = StopWords::from_file(&path)?;
            info!(path = %path.display(), words = stopwords.len(), "loaded stop words");
            stopwords
        }
        None => {
            let stopwords = StopWords::english();
            info!(words = stopwords.len(), "using bundled English stop words");
            stopwords
        }
    };

    if stopwords.is_empty() {
        return Err(SpamError::StopWords("stop-word set is empty".to_string()));
    }

    Ok(stopwords)
}

/// Everything the dispatcher needs, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub stopwords: StopWords,
    pub message: MessagePipeline,
    pub email: EmailPipeline,
}

impl Artifacts {
    /// Both tracks share one preprocessor, so their vocabularies must have
    /// been stemmed the same way.
    pub fn new(
        stopwords: StopWords,
        message: MessagePipeline,
        email: EmailPipeline,
    ) -> Result<Self> {
        let (m, e) = (message.vectorizer().stemmer(), email.vectorizer().stemmer());
        if m != e {
            return Err(SpamError::StemmerMismatch { message: m, email: e });
        }

        Ok(Self {
            stopwords,
            message,
            email,
        })
    }

    /// Stemmer the cleaned text must be produced with.
    pub fn stemmer(&self) -> StemmerKind {
        self.message.vectorizer().stemmer()
    }

    /// Loads and cross-checks all five artifacts plus the stop-word set.
    pub fn load(config: &ArtifactConfig) -> Result<Self> {
        info!(dir = %config.dir.display(), "loading artifacts");

        let stopwords = load_stopwords(config)?;

        let message = MessagePipeline::new(
            load_vectorizer(&config.path(&config.message_vectorizer))?,
            load_classifier(&config.path(&config.message_classifier))?,
            load_labels(&config.path(&config.message_labels))?,
        )?;

        let email = EmailPipeline::new(
            load_vectorizer(&config.path(&config.email_vectorizer))?,
            load_classifier(&config.path(&config.email_classifier))?,
        )?;

        Self::new(stopwords, message, email)
    }

    /// Writes the five model artifacts to the locations named by `config`.
    /// The stop-word set is not written.
    pub fn save(&self, config: &ArtifactConfig) -> Result<()> {
        std::fs::create_dir_all(&config.dir).map_err(|e| SpamError::io(&config.dir, e))?;

        save(&config.path(&config.message_vectorizer), self.message.vectorizer())?;
        save(&config.path(&config.message_classifier), self.message.classifier())?;
        save(&config.path(&config.message_labels), self.message.labels())?;
        save(&config.path(&config.email_vectorizer), self.email.vectorizer())?;
        save(&config.path(&config.email_classifier), self.email.classifier())?;

        Ok(())
    }
}
