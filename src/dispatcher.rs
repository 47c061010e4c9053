use tracing::{debug, info};

use crate::artifacts::Artifacts;
use crate::config::ArtifactConfig;
use crate::error::{Result, SpamError};
use crate::preprocess::Preprocessor;
use crate::track::{EmailPipeline, MessagePipeline, TrackPipeline};
use crate::types::{ClassOutcome, ClassifyRequest, ClassifyResponse, Track};

/// Routes requests to the pipeline of their track.
///
/// Holds only immutable state, so one instance can serve any number of
/// threads without locking.
#[derive(Debug)]
pub struct Dispatcher {
    preprocessor: Preprocessor,
    message: MessagePipeline,
    email: EmailPipeline,
}

impl Dispatcher {
    pub fn new(artifacts: Artifacts) -> Self {
        let stemmer = artifacts.stemmer();
        let Artifacts {
            stopwords,
            message,
            email,
        } = artifacts;

        Self {
            preprocessor: Preprocessor::new(stopwords).with_stemmer(stemmer),
            message,
            email,
        }
    }

    pub fn from_config(config: &ArtifactConfig) -> Result<Self> {
        let dispatcher = Self::new(Artifacts::load(config)?);
        info!("dispatcher ready");
        Ok(dispatcher)
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn message(&self) -> &MessagePipeline {
        &self.message
    }

    pub fn email(&self) -> &EmailPipeline {
        &self.email
    }

    pub fn pipeline(&self, track: Track) -> &dyn TrackPipeline {
        match track {
            Track::Message => &self.message,
            Track::Email => &self.email,
        }
    }

    pub fn classify(&self, track: Track, text: &str) -> Result<ClassOutcome> {
        let tokens = self.preprocessor.tokens(text);
        let outcome = self.pipeline(track).run(&tokens.join(" "))?;

        debug!(%track, tokens = tokens.len(), %outcome, "classified");
        Ok(outcome)
    }

    pub fn classify_str(&self, track: &str, text: &str) -> Result<ClassOutcome> {
        self.classify(track.parse()?, text)
    }

    /// Request/response form. An unknown track becomes the
    /// `"Invalid type selected"` result; any other error is returned.
    pub fn respond(&self, request: &ClassifyRequest) -> Result<ClassifyResponse> {
        match self.classify_str(&request.kind, &request.input) {
            Ok(outcome) => Ok(outcome.into()),
            Err(SpamError::InvalidTrack(kind)) => {
                debug!(%kind, "rejected unknown track");
                Ok(ClassifyResponse::invalid_type())
            }
            Err(e) => Err(e),
        }
    }
}
