use linfa::traits::Predict;
use linfa_linear::FittedLinearRegression;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::core::{PriceError, PriceResult};
use crate::ml::features::{FeatureTable, FEATURE_NAMES};

/// Inference capability the prediction handler depends on.
///
/// Implementations return the raw model output for the first row of the
/// table, which for the car price model is a log-space price.
pub trait Regressor: Send + Sync {
    fn predict(&self, table: &FeatureTable) -> PriceResult<f64>;
}

/// On-disk form of the model
#[derive(Deserialize)]
struct ModelArtifact {
    features: Vec<String>,
    estimator: FittedLinearRegression<f64>,
}

/// Borrowed counterpart of `ModelArtifact` used when writing
#[derive(Serialize)]
struct ModelArtifactRef<'a> {
    features: &'a [&'a str],
    estimator: &'a FittedLinearRegression<f64>,
}

/// Frozen car selling price model, loaded once at startup
#[derive(Debug)]
pub struct PriceModel {
    estimator: FittedLinearRegression<f64>,
}

impl PriceModel {
    /// Wrap an already fitted estimator
    pub fn new(estimator: FittedLinearRegression<f64>) -> PriceResult<Self> {
        let coefficients = estimator.params().len();
        if coefficients != FEATURE_NAMES.len() {
            return Err(PriceError::ModelSchemaError(format!(
                "estimator has {} coefficients, expected {}",
                coefficients,
                FEATURE_NAMES.len()
            )));
        }

        Ok(Self { estimator })
    }

    /// Load the model artifact from disk
    pub fn load(path: impl AsRef<Path>) -> PriceResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| PriceError::ModelLoadError {
            path: path.to_path_buf(),
            source,
        })?;

        let model = Self::from_json(&content)?;
        info!("Loaded price model from {}", path.display());

        Ok(model)
    }

    /// Parse a model artifact from its JSON form
    pub fn from_json(content: &str) -> PriceResult<Self> {
        let artifact: ModelArtifact = serde_json::from_str(content)?;

        if artifact.features != FEATURE_NAMES {
            return Err(PriceError::ModelSchemaError(format!(
                "artifact features {:?} do not match {:?}",
                artifact.features, FEATURE_NAMES
            )));
        }

        Self::new(artifact.estimator)
    }

    /// Serialize to the artifact format understood by `from_json`
    pub fn to_json(&self) -> PriceResult<String> {
        let artifact = ModelArtifactRef {
            features: &FEATURE_NAMES,
            estimator: &self.estimator,
        };

        Ok(serde_json::to_string_pretty(&artifact)?)
    }

    /// Bias term of the fitted estimator, in log-price units
    pub fn intercept(&self) -> f64 {
        self.estimator.intercept()
    }
}

impl Regressor for PriceModel {
    fn predict(&self, table: &FeatureTable) -> PriceResult<f64> {
        let predictions = self.estimator.predict(table.as_array());

        predictions
            .get(0)
            .copied()
            .ok_or_else(|| PriceError::InferenceError("model returned no predictions".to_string()))
    }
}
