// Web Interface Module

pub mod layout;
pub mod prediction;
pub mod server;

pub use prediction::{
    format_currency,
    predict_price,
    PredictionInput,
    MISSING_INPUT_PROMPT,
    PREDICTION_PREFIX,
};
pub use server::{CarPriceServer, FormSubmission, PredictionResponse};
