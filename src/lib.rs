//! Spam / not-spam classification of short texts.
//!
//! Two independently trained tracks (`message`, `email`) share one
//! preprocessing stage and differ in their vectorizer, classifier and label
//! convention. All model state is loaded once into [`Artifacts`] and owned
//! by an immutable [`Dispatcher`].

pub mod artifacts;
pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod label;
pub mod porter;
pub mod preprocess;
pub mod track;
pub mod types;
pub mod vectorizer;

pub use artifacts::Artifacts;
pub use classifier::{Classifier, LinearModel, NaiveBayes};
pub use config::{ArtifactConfig, Config, LogFormat, LoggingConfig};
pub use dispatcher::Dispatcher;
pub use error::{Result, SpamError};
pub use label::LabelEncoder;
pub use preprocess::{Preprocessor, StemmerKind, StopWords, normalize};
pub use track::{EmailPipeline, MessagePipeline, TrackPipeline};
pub use types::{ClassIndex, ClassOutcome, ClassifyRequest, ClassifyResponse, Track};
pub use vectorizer::{CountVectorizer, FeatureVector};
