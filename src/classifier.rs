//! Pre-trained classifiers. Inference only; parameters come from artifacts.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpamError};
use crate::types::ClassIndex;
use crate::vectorizer::FeatureVector;

/// Multinomial naive Bayes in log space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveBayes {
    pub classes: Vec<usize>,
    pub class_log_prior: Vec<f64>,
    /// One row per class, one column per feature.
    pub feature_log_prob: Vec<Vec<f64>>,
}

impl NaiveBayes {
    fn joint_log_likelihood(&self, x: &FeatureVector) -> Vec<f64> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, row)| prior + x.dot(row))
            .collect()
    }
}

/// Linear decision function (logistic regression, linear SVM, ...).
///
/// A binary model stores a single row; a positive score selects `classes[1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub classes: Vec<usize>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl LinearModel {
    fn decision_function(&self, x: &FeatureVector) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| b + x.dot(row))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classifier {
    MultinomialNb(NaiveBayes),
    Linear(LinearModel),
}

/// Position of the first maximum.
fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = i;
        }
    }
    best
}

fn check_rows(rows: &[Vec<f64>], what: &str) -> Result<usize> {
    let width = rows.first().map(Vec::len).unwrap_or(0);
    if width == 0 {
        return Err(SpamError::InvalidModel(format!("{what} has no feature columns")));
    }
    if let Some(row) = rows.iter().find(|row| row.len() != width) {
        return Err(SpamError::InvalidModel(format!(
            "{what} rows differ in width ({} vs {width})",
            row.len()
        )));
    }
    if rows.iter().flatten().any(|v| !v.is_finite()) {
        return Err(SpamError::InvalidModel(format!("{what} holds non-finite values")));
    }
    Ok(width)
}

fn check_classes(classes: &[usize]) -> Result<()> {
    if classes.len() < 2 {
        return Err(SpamError::InvalidModel(format!(
            "need at least two classes, found {}",
            classes.len()
        )));
    }
    let mut sorted = classes.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != classes.len() {
        return Err(SpamError::InvalidModel("duplicate class values".to_string()));
    }
    Ok(())
}

fn shape_error(what: &str, expected: usize, found: usize) -> SpamError {
    SpamError::InvalidModel(format!("{what}: expected {expected} entries, found {found}"))
}

impl Classifier {
    pub fn kind(&self) -> &'static str {
        match self {
            Classifier::MultinomialNb(_) => "multinomial_nb",
            Classifier::Linear(_) => "linear",
        }
    }

    pub fn classes(&self) -> &[usize] {
        match self {
            Classifier::MultinomialNb(nb) => &nb.classes,
            Classifier::Linear(lm) => &lm.classes,
        }
    }

    /// Input width the model was trained on.
    pub fn n_features(&self) -> usize {
        let rows = match self {
            Classifier::MultinomialNb(nb) => &nb.feature_log_prob,
            Classifier::Linear(lm) => &lm.coef,
        };
        rows.first().map(Vec::len).unwrap_or(0)
    }

    /// Checks that the parameter shapes agree with each other.
    pub fn validate(&self) -> Result<()> {
        check_classes(self.classes())?;
        let n_classes = self.classes().len();

        match self {
            Classifier::MultinomialNb(nb) => {
                if nb.class_log_prior.len() != n_classes {
                    return Err(shape_error("class_log_prior", n_classes, nb.class_log_prior.len()));
                }
                if nb.feature_log_prob.len() != n_classes {
                    return Err(shape_error("feature_log_prob", n_classes, nb.feature_log_prob.len()));
                }
                if nb.class_log_prior.iter().any(|v| !v.is_finite()) {
                    return Err(SpamError::InvalidModel(
                        "class_log_prior holds non-finite values".to_string(),
                    ));
                }
                check_rows(&nb.feature_log_prob, "feature_log_prob")?;
            }
            Classifier::Linear(lm) => {
                let n_rows = if n_classes == 2 { 1 } else { n_classes };
                if lm.coef.len() != n_rows {
                    return Err(shape_error("coef", n_rows, lm.coef.len()));
                }
                if lm.intercept.len() != n_rows {
                    return Err(shape_error("intercept", n_rows, lm.intercept.len()));
                }
                if lm.intercept.iter().any(|v| !v.is_finite()) {
                    return Err(SpamError::InvalidModel(
                        "intercept holds non-finite values".to_string(),
                    ));
                }
                check_rows(&lm.coef, "coef")?;
            }
        }

        Ok(())
    }

    /// Row counts and widths only, so `predict` never indexes out of bounds
    /// on a model that skipped [`validate`](Self::validate).
    fn check_shape(&self, width: usize) -> Result<()> {
        let n_classes = self.classes().len();
        if n_classes < 2 {
            return Err(SpamError::InvalidModel(format!(
                "need at least two classes, found {n_classes}"
            )));
        }

        let (rows, offsets, n_rows) = match self {
            Classifier::MultinomialNb(nb) => (&nb.feature_log_prob, &nb.class_log_prior, n_classes),
            Classifier::Linear(lm) => {
                let n_rows = if n_classes == 2 { 1 } else { n_classes };
                (&lm.coef, &lm.intercept, n_rows)
            }
        };

        if rows.len() != n_rows {
            return Err(shape_error("weight rows", n_rows, rows.len()));
        }
        if offsets.len() != n_rows {
            return Err(shape_error("offsets", n_rows, offsets.len()));
        }
        if let Some(row) = rows.iter().find(|row| row.len() != width) {
            return Err(shape_error("row width", width, row.len()));
        }

        Ok(())
    }

    /// Deterministic class for `x`. A width mismatch is an artifact
    /// integrity failure and never yields a prediction.
    pub fn predict(&self, x: &FeatureVector) -> Result<ClassIndex> {
        let expected = self.n_features();
        if x.dim() != expected {
            return Err(SpamError::DimensionMismatch {
                expected,
                actual: x.dim(),
            });
        }
        self.check_shape(expected)?;

        let position = match self {
            Classifier::MultinomialNb(nb) => argmax(&nb.joint_log_likelihood(x)),
            Classifier::Linear(lm) => {
                let scores = lm.decision_function(x);
                if scores.len() == 1 {
                    usize::from(scores[0] > 0.0)
                } else {
                    argmax(&scores)
                }
            }
        };

        Ok(ClassIndex(self.classes()[position]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::CountVectorizer;

    // columns: cash, lunch, meet, prize
    fn vectorizer() -> CountVectorizer {
        CountVectorizer::from_terms(["cash", "lunch", "meet", "prize"]).unwrap()
    }

    fn naive_bayes() -> Classifier {
        Classifier::MultinomialNb(NaiveBayes {
            classes: vec![0, 1],
            class_log_prior: vec![0.6f64.ln(), 0.4f64.ln()],
            feature_log_prob: vec![
                vec![0.05f64.ln(), 0.45f64.ln(), 0.45f64.ln(), 0.05f64.ln()],
                vec![0.45f64.ln(), 0.05f64.ln(), 0.05f64.ln(), 0.45f64.ln()],
            ],
        })
    }

    fn linear() -> Classifier {
        Classifier::Linear(LinearModel {
            classes: vec![0, 1],
            coef: vec![vec![2.0, -1.5, -1.5, 2.0]],
            intercept: vec![-0.5],
        })
    }

    #[test]
    fn naive_bayes_follows_word_evidence() {
        let v = vectorizer();
        let nb = naive_bayes();
        nb.validate().unwrap();
        assert_eq!(nb.predict(&v.transform("cash prize")).unwrap(), ClassIndex(1));
        assert_eq!(nb.predict(&v.transform("meet lunch")).unwrap(), ClassIndex(0));
    }

    #[test]
    fn naive_bayes_falls_back_to_prior_on_empty_input() {
        let nb = naive_bayes();
        assert_eq!(nb.predict(&FeatureVector::zeros(4)).unwrap(), ClassIndex(0));
    }

    #[test]
    fn linear_binary_uses_sign_of_score() {
        let v = vectorizer();
        let lm = linear();
        lm.validate().unwrap();
        assert_eq!(lm.predict(&v.transform("prize")).unwrap(), ClassIndex(1));
        assert_eq!(lm.predict(&v.transform("lunch")).unwrap(), ClassIndex(0));
        assert_eq!(lm.predict(&FeatureVector::zeros(4)).unwrap(), ClassIndex(0));
    }

    #[test]
    fn linear_multiclass_takes_argmax_with_first_on_ties() {
        let lm = Classifier::Linear(LinearModel {
            classes: vec![3, 5, 7],
            coef: vec![vec![0.0], vec![1.0], vec![1.0]],
            intercept: vec![0.0, 0.0, 0.0],
        });
        lm.validate().unwrap();
        let v = CountVectorizer::from_terms(["go"]).unwrap();
        assert_eq!(lm.predict(&v.transform("go")).unwrap(), ClassIndex(5));
    }

    #[test]
    fn predict_rejects_wrong_width() {
        let err = naive_bayes().predict(&FeatureVector::zeros(3)).unwrap_err();
        assert!(matches!(
            err,
            SpamError::DimensionMismatch { expected: 4, actual: 3 }
        ));
    }

    #[test]
    fn predict_rejects_malformed_models_without_panicking() {
        let x = CountVectorizer::from_terms(["go", "stop"]).unwrap().transform("go stop");

        let ragged = Classifier::Linear(LinearModel {
            classes: vec![0, 1, 2],
            coef: vec![vec![1.0, 1.0], vec![1.0]],
            intercept: vec![0.0, 0.0, 0.0],
        });
        assert!(matches!(ragged.predict(&x), Err(SpamError::InvalidModel(_))));

        let single = Classifier::Linear(LinearModel {
            classes: vec![0],
            coef: vec![vec![1.0, 1.0]],
            intercept: vec![0.0],
        });
        assert!(matches!(single.predict(&x), Err(SpamError::InvalidModel(_))));

        let short_prior = Classifier::MultinomialNb(NaiveBayes {
            classes: vec![0, 1],
            class_log_prior: vec![-0.7],
            feature_log_prob: vec![vec![-1.0, -1.0], vec![-1.0, -1.0]],
        });
        assert!(matches!(short_prior.predict(&x), Err(SpamError::InvalidModel(_))));
    }

    #[test]
    fn validate_catches_shape_errors() {
        let mut nb = NaiveBayes {
            classes: vec![0, 1],
            class_log_prior: vec![-0.7, -0.7],
            feature_log_prob: vec![vec![-1.0, -1.0], vec![-1.0]],
        };
        assert!(Classifier::MultinomialNb(nb.clone()).validate().is_err());

        nb.feature_log_prob[1].push(f64::NAN);
        assert!(Classifier::MultinomialNb(nb.clone()).validate().is_err());

        nb.feature_log_prob[1][1] = -1.0;
        nb.classes = vec![1, 1];
        assert!(Classifier::MultinomialNb(nb).validate().is_err());

        let lm = Classifier::Linear(LinearModel {
            classes: vec![0, 1],
            coef: vec![vec![1.0], vec![1.0]],
            intercept: vec![0.0],
        });
        assert!(lm.validate().is_err());
    }

    #[test]
    fn serialized_form_is_tagged_by_kind() {
        let json = serde_json::to_value(linear()).unwrap();
        assert!(json.get("linear").is_some());
        let back: Classifier = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind(), "linear");
        assert_eq!(back.n_features(), 4);
    }
}
