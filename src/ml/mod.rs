// Machine Learning Module

pub mod features;
pub mod price_model;

// Expose key types
pub use features::{FeatureRecord, FeatureTable, FEATURE_NAMES};
pub use price_model::{PriceModel, Regressor};
