use crate::domain::model::{Feature, FeatureVector};
use crate::domain::ports::Predictor;
use crate::utils::error::{PricerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MODEL_PATH: &str = "assets/mars_habitat_pricer.json";

const LINEAR_REGRESSION_KIND: &str = "linear_regression";

/// 訓練完成的線性迴歸模型檔（JSON）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    pub kind: String,
    pub inputs: Vec<String>,
    pub output: String,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub input_bounds: Option<Vec<[f64; 2]>>,
}

impl ModelArtifact {
    /// 從 JSON 字串解析模型檔，不做內容驗證
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// 已驗證、不可變的迴歸模型
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegressionModel {
    name: String,
    intercept: f64,
    coefficients: [f64; Feature::COUNT],
    bounds: Option<[[f64; 2]; Feature::COUNT]>,
}

impl LinearRegressionModel {
    pub fn new(intercept: f64, coefficients: [f64; Feature::COUNT]) -> Self {
        Self {
            name: "linear".to_string(),
            intercept,
            coefficients,
            bounds: None,
        }
    }

    pub fn with_bounds(mut self, bounds: [[f64; 2]; Feature::COUNT]) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        let invalid = |reason: String| PricerError::ModelUnavailable { reason };

        if artifact.kind != LINEAR_REGRESSION_KIND {
            return Err(invalid(format!(
                "unsupported model kind '{}', expected '{}'",
                artifact.kind, LINEAR_REGRESSION_KIND
            )));
        }

        let expected: Vec<&str> = Feature::ALL.iter().map(|f| f.model_input_name()).collect();
        if artifact.inputs != expected {
            return Err(invalid(format!(
                "model inputs {:?} do not match features {:?}",
                artifact.inputs, expected
            )));
        }

        let coefficients: [f64; Feature::COUNT] =
            artifact.coefficients.as_slice().try_into().map_err(|_| {
                invalid(format!(
                    "model has {} coefficients, expected {}",
                    artifact.coefficients.len(),
                    Feature::COUNT
                ))
            })?;

        if !artifact.intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(invalid("model parameters must be finite".to_string()));
        }

        let bounds = match artifact.input_bounds {
            None => None,
            Some(bounds) => {
                let bounds: [[f64; 2]; Feature::COUNT] =
                    bounds.as_slice().try_into().map_err(|_| {
                        invalid(format!(
                            "model declares {} input bounds, expected {}",
                            bounds.len(),
                            Feature::COUNT
                        ))
                    })?;
                for (feature, [min, max]) in Feature::ALL.iter().zip(bounds) {
                    if min.is_nan() || max.is_nan() || min > max {
                        return Err(invalid(format!(
                            "invalid bounds [{}, {}] for {}",
                            min, max, feature
                        )));
                    }
                }
                Some(bounds)
            }
        };

        Ok(Self {
            name: artifact.name,
            intercept: artifact.intercept,
            coefficients,
            bounds,
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| PricerError::ModelUnavailable {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        // 解析失敗對預測週期而言等同模型不可用
        let artifact =
            ModelArtifact::from_json_str(&content).map_err(|e| PricerError::ModelUnavailable {
                reason: format!("cannot parse {}: {}", path.display(), e),
            })?;
        Self::from_artifact(artifact)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn evaluate(&self, vector: &FeatureVector) -> Result<f64> {
        for (feature, value) in vector.iter() {
            if !value.is_finite() {
                return Err(PricerError::InferenceError {
                    message: format!("{} value {} is not finite", feature, value),
                });
            }
            if let Some(bounds) = &self.bounds {
                let [min, max] = bounds[feature.position()];
                if value < min || value > max {
                    return Err(PricerError::InferenceError {
                        message: format!(
                            "{} value {} is outside the model range [{}, {}]",
                            feature, value, min, max
                        ),
                    });
                }
            }
        }

        let price = self.intercept
            + self
                .coefficients
                .iter()
                .zip(vector.as_slice())
                .map(|(c, x)| c * x)
                .sum::<f64>();

        if !price.is_finite() {
            return Err(PricerError::InferenceError {
                message: "model produced a non-finite price".to_string(),
            });
        }
        Ok(price)
    }
}

#[derive(Debug, Clone)]
enum ModelState {
    Loaded(LinearRegressionModel),
    Unavailable(String),
}

/// 在整個程序生命週期內持有定價模型
///
/// 模型載入失敗時引擎進入不可用狀態，之後每次預測都回報 `ModelUnavailable`
#[derive(Debug, Clone)]
pub struct PredictionEngine {
    state: ModelState,
}

impl PredictionEngine {
    pub fn new(model: LinearRegressionModel) -> Self {
        Self {
            state: ModelState::Loaded(model),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: ModelState::Unavailable(reason.into()),
        }
    }

    pub fn try_load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let model = LinearRegressionModel::load(&path)?;
        tracing::info!(
            "Loaded model '{}' from {}",
            model.name(),
            path.as_ref().display()
        );
        Ok(Self::new(model))
    }

    /// 同 [`PredictionEngine::try_load`]，但保留失敗原因供之後的預測回報
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_load(&path) {
            Ok(engine) => engine,
            Err(e) => {
                tracing::warn!("Model unavailable: {}", e);
                let reason = match e {
                    PricerError::ModelUnavailable { reason } => reason,
                    other => other.to_string(),
                };
                Self::unavailable(reason)
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, ModelState::Loaded(_))
    }

    /// 給未型別化呼叫者的入口，切片長度必須等於特徵數
    pub fn predict_values(&self, values: &[f64]) -> Result<f64> {
        let vector = FeatureVector::from_slice(values)?;
        self.predict(&vector)
    }
}

impl Predictor for PredictionEngine {
    fn predict(&self, vector: &FeatureVector) -> Result<f64> {
        match &self.state {
            ModelState::Loaded(model) => model.evaluate(vector),
            ModelState::Unavailable(reason) => Err(PricerError::ModelUnavailable {
                reason: reason.clone(),
            }),
        }
    }
}
