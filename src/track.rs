//! Per-track pipelines: vectorizer, classifier and label convention.
//!
//! Both tracks share the preprocessing stage but were trained separately.
//! The message track encodes labels symbolically through a [`LabelEncoder`];
//! the email track treats class `0` as not-spam. Each pipeline owns its
//! convention so the dispatcher only ever sees a [`ClassOutcome`].

use crate::classifier::Classifier;
use crate::error::{Result, SpamError};
use crate::label::LabelEncoder;
use crate::types::{ClassIndex, ClassOutcome, Track};
use crate::vectorizer::CountVectorizer;

/// Symbolic label the message track uses for legitimate text.
pub const HAM_LABEL: &str = "ham";

pub trait TrackPipeline: Send + Sync {
    fn track(&self) -> Track;

    fn vectorizer(&self) -> &CountVectorizer;

    fn classifier(&self) -> &Classifier;

    fn resolve_label(&self, index: ClassIndex) -> Result<ClassOutcome>;

    /// Vectorize, predict and resolve one cleaned text.
    fn run(&self, cleaned: &str) -> Result<ClassOutcome> {
        let features = self.vectorizer().transform(cleaned);
        let index = self.classifier().predict(&features)?;
        self.resolve_label(index)
    }
}

fn check_compatible(vectorizer: &CountVectorizer, classifier: &Classifier) -> Result<()> {
    classifier.validate()?;

    let expected = classifier.n_features();
    let actual = vectorizer.dimension();
    if expected != actual {
        return Err(SpamError::DimensionMismatch { expected, actual });
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub struct MessagePipeline {
    vectorizer: CountVectorizer,
    classifier: Classifier,
    labels: LabelEncoder,
}

impl MessagePipeline {
    pub fn new(
        vectorizer: CountVectorizer,
        classifier: Classifier,
        labels: LabelEncoder,
    ) -> Result<Self> {
        check_compatible(&vectorizer, &classifier)?;
        labels.validate()?;

        // every class the model can emit must have a label
        for &class in classifier.classes() {
            labels.inverse_transform(ClassIndex(class))?;
        }

        Ok(Self {
            vectorizer,
            classifier,
            labels,
        })
    }

    pub fn labels(&self) -> &LabelEncoder {
        &self.labels
    }
}

impl TrackPipeline for MessagePipeline {
    fn track(&self) -> Track {
        Track::Message
    }

    fn vectorizer(&self) -> &CountVectorizer {
        &self.vectorizer
    }

    fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    fn resolve_label(&self, index: ClassIndex) -> Result<ClassOutcome> {
        let label = self.labels.inverse_transform(index)?;
        Ok(if label == HAM_LABEL {
            ClassOutcome::NotSpam
        } else {
            ClassOutcome::Spam
        })
    }
}

#[derive(Debug, Clone)]
pub struct EmailPipeline {
    vectorizer: CountVectorizer,
    classifier: Classifier,
}

impl EmailPipeline {
    pub fn new(vectorizer: CountVectorizer, classifier: Classifier) -> Result<Self> {
        check_compatible(&vectorizer, &classifier)?;

        Ok(Self {
            vectorizer,
            classifier,
        })
    }
}

impl TrackPipeline for EmailPipeline {
    fn track(&self) -> Track {
        Track::Email
    }

    fn vectorizer(&self) -> &CountVectorizer {
        &self.vectorizer
    }

    fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    fn resolve_label(&self, index: ClassIndex) -> Result<ClassOutcome> {
        Ok(match index {
            ClassIndex(0) => ClassOutcome::NotSpam,
            _ => ClassOutcome::Spam,
        })
    }
}
