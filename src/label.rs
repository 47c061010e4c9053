use serde::{Deserialize, Serialize};

use crate::error::{Result, SpamError};
use crate::types::ClassIndex;

/// Maps encoded class indices back to their symbolic labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new<I, S>(classes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let encoder = Self {
            classes: classes.into_iter().map(Into::into).collect(),
        };
        encoder.validate()?;
        Ok(encoder)
    }

    pub fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(SpamError::InvalidModel("label encoder has no classes".to_string()));
        }
        for (i, class) in self.classes.iter().enumerate() {
            if self.classes[..i].contains(class) {
                return Err(SpamError::InvalidModel(format!(
                    "label {class:?} is encoded twice"
                )));
            }
        }
        Ok(())
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn inverse_transform(&self, index: ClassIndex) -> Result<&str> {
        self.classes
            .get(index.0)
            .map(String::as_str)
            .ok_or(SpamError::UnknownClass { index: index.0 })
    }
}
