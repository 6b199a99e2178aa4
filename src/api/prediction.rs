use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::PriceResult;
use crate::ml::{FeatureRecord, FeatureTable, Regressor};

/// Shown when at least one field is still empty
pub const MISSING_INPUT_PROMPT: &str = "Please fill in all fields to calculate the price.";

/// Text placed in front of the formatted price
pub const PREDICTION_PREFIX: &str = "The predicted selling price of the car is: $";

/// Observable form state handed to the prediction handler
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    /// Number of times the Calculate button has been pressed
    #[serde(default)]
    pub n_clicks: u64,

    pub year: Option<f64>,
    pub mileage: Option<f64>,
    pub max_power: Option<f64>,
}

impl PredictionInput {
    /// Feature record, if every field is filled in
    pub fn feature_record(&self) -> Option<FeatureRecord> {
        Some(FeatureRecord {
            year: self.year?,
            mileage: self.mileage?,
            max_power: self.max_power?,
        })
    }
}

/// Compute the text for the output region.
///
/// Returns an empty string before the first click and the fill-in prompt
/// when any field is missing. Otherwise the model is called exactly once and
/// its log-space output is exponentiated into a price.
pub fn predict_price(model: &dyn Regressor, input: &PredictionInput) -> PriceResult<String> {
    if input.n_clicks == 0 {
        return Ok(String::new());
    }

    let Some(record) = input.feature_record() else {
        return Ok(MISSING_INPUT_PROMPT.to_string());
    };

    let table = FeatureTable::single(&record);
    let log_price = model.predict(&table)?;
    let price = log_price.exp();

    debug!(?record, log_price, price, "Predicted selling price");

    Ok(format!("{}{}", PREDICTION_PREFIX, format_currency(price)))
}

/// Format an amount with thousands separators and no decimals
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let rounded = format!("{:.0}", amount);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}{}", sign, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PriceError;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use test_case::test_case;

    /// Returns a fixed log price and remembers every row it was asked about
    struct RecordingRegressor {
        log_price: f64,
        calls: Mutex<Vec<Vec<f64>>>,
    }

    impl RecordingRegressor {
        fn new(log_price: f64) -> Self {
            Self {
                log_price,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Vec<f64>> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Regressor for RecordingRegressor {
        fn predict(&self, table: &FeatureTable) -> PriceResult<f64> {
            let mut calls = self.calls.lock().unwrap();
            for row in 0..table.nrows() {
                calls.push(table.row(row).to_vec());
            }
            Ok(self.log_price)
        }
    }

    struct FailingRegressor;

    impl Regressor for FailingRegressor {
        fn predict(&self, _table: &FeatureTable) -> PriceResult<f64> {
            Err(PriceError::InferenceError("boom".to_string()))
        }
    }

    fn input(n_clicks: u64, year: Option<f64>, mileage: Option<f64>, max_power: Option<f64>) -> PredictionInput {
        PredictionInput {
            n_clicks,
            year,
            mileage,
            max_power,
        }
    }

    #[test]
    fn test_zero_clicks_leaves_output_empty() {
        let model = RecordingRegressor::new(13.0);

        let output = predict_price(&model, &input(0, Some(2015.0), Some(18.5), Some(85.0))).unwrap();

        assert_eq!(output, "");
        assert!(model.calls().is_empty());
    }

    #[test_case(None, None, None ; "all fields empty")]
    #[test_case(None, Some(18.0), Some(85.0) ; "year missing")]
    #[test_case(Some(2015.0), None, Some(85.0) ; "mileage missing")]
    #[test_case(Some(2015.0), Some(18.0), None ; "max power missing")]
    fn test_missing_field_prompts_without_inference(
        year: Option<f64>,
        mileage: Option<f64>,
        max_power: Option<f64>,
    ) {
        let model = RecordingRegressor::new(13.0);

        let output = predict_price(&model, &input(1, year, mileage, max_power)).unwrap();

        assert_eq!(output, "Please fill in all fields to calculate the price.");
        assert!(model.calls().is_empty());
    }

    #[test]
    fn test_prediction_is_exponentiated_and_formatted() {
        let model = RecordingRegressor::new(13.0);

        let output = predict_price(&model, &input(1, Some(2015.0), Some(18.5), Some(85.0))).unwrap();

        assert_eq!(output, "The predicted selling price of the car is: $442,413");
        assert_eq!(model.calls(), vec![vec![2015.0, 18.5, 85.0]]);
    }

    #[test]
    fn test_repeated_clicks_give_identical_output() {
        let model = RecordingRegressor::new(12.25);

        let first = predict_price(&model, &input(1, Some(2012.0), Some(21.0), Some(74.0))).unwrap();
        let second = predict_price(&model, &input(2, Some(2012.0), Some(21.0), Some(74.0))).unwrap();

        assert_eq!(first, second);
        assert!(first.starts_with(PREDICTION_PREFIX));
        assert_eq!(model.calls().len(), 2);
    }

    #[test]
    fn test_inference_failure_propagates() {
        let result = predict_price(&FailingRegressor, &input(1, Some(2015.0), Some(18.5), Some(85.0)));

        assert!(matches!(result, Err(PriceError::InferenceError(_))));
    }

    #[test_case(0.0, "0")]
    #[test_case(999.4, "999")]
    #[test_case(1000.0, "1,000")]
    #[test_case(442413.392, "442,413")]
    #[test_case(1234567.89, "1,234,568")]
    #[test_case(-98765.0, "-98,765")]
    #[test_case(f64::INFINITY, "inf")]
    fn test_format_currency(amount: f64, expected: &str) {
        assert_eq!(format_currency(amount), expected);
    }
}
