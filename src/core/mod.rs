pub mod catalog;
pub mod engine;
pub mod formatter;
pub mod orchestrator;

pub use crate::domain::model::{CatalogEntry, Feature, FeatureVector, PredictionResult, SelectionState};
pub use crate::domain::ports::{ConfigProvider, PriceSink, Predictor, SelectionSource};
pub use crate::utils::error::Result;
