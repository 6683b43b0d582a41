//! `userauth-picmodel`
//!
//! **Responsibility:** image-based celebrity recognition boundary.
//!
//! This crate is intentionally **not** part of the domain model:
//! - It must not depend on user records or stores.
//! - It must not mutate state.
//! - It emits a recognition claim; the policy layer decides what it means.
//!
//! The real model is not shipped: `StubCelebDetector` stands in for it and
//! answers with a configured name/confidence pair.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A recognition claim: who the model thinks the image shows, and how sure
/// it is (confidence in \[0, 1\]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub name: String,
    pub confidence: f64,
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("invalid image input: {0}")]
    InvalidInput(String),

    #[error("inference failed: {0}")]
    InferenceFailed(String),
}

pub trait CelebrityClassifier: Send + Sync {
    fn predict(&self, image: &[u8]) -> Result<Prediction, ClassifierError>;
}

impl<C> CelebrityClassifier for std::sync::Arc<C>
where
    C: CelebrityClassifier + ?Sized,
{
    fn predict(&self, image: &[u8]) -> Result<Prediction, ClassifierError> {
        (**self).predict(image)
    }
}

/// Placeholder for the real recognition model.
///
/// Always answers with the configured pair, regardless of the image.
#[derive(Debug, Clone)]
pub struct StubCelebDetector {
    prediction: Prediction,
}

impl StubCelebDetector {
    pub fn recognizing(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            prediction: Prediction {
                name: name.into(),
                confidence,
            },
        }
    }

    /// A detector that never recognizes anyone.
    pub fn rejecting() -> Self {
        Self::recognizing("", 0.0)
    }
}

impl CelebrityClassifier for StubCelebDetector {
    fn predict(&self, image: &[u8]) -> Result<Prediction, ClassifierError> {
        if image.is_empty() {
            return Err(ClassifierError::InvalidInput("empty image".to_string()));
        }
        Ok(self.prediction.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_returns_configured_prediction() {
        let detector = StubCelebDetector::recognizing("Tom Cruise", 0.96);
        let prediction = detector.predict(b"jpeg bytes").unwrap();
        assert_eq!(prediction.name, "Tom Cruise");
        assert_eq!(prediction.confidence, 0.96);
    }

    #[test]
    fn empty_image_is_invalid_input() {
        let detector = StubCelebDetector::rejecting();
        assert!(matches!(
            detector.predict(b""),
            Err(ClassifierError::InvalidInput(_))
        ));
    }
}
