use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::{Filter, Rejection, Reply};
use tracing::{error, info};

use crate::api::layout::render_page;
use crate::api::prediction::{predict_price, PredictionInput};
use crate::config::ServerSettings;
use crate::ml::Regressor;

/// Raw form submission, every field as typed by the user
#[derive(Debug, Default, Deserialize)]
pub struct FormSubmission {
    #[serde(default)]
    pub n_clicks: u64,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub mileage: String,
    #[serde(default)]
    pub max_power: String,
}

impl FormSubmission {
    /// Handler input for this submission, counting it as one more click
    pub fn into_input(self) -> PredictionInput {
        PredictionInput {
            n_clicks: self.n_clicks.saturating_add(1),
            year: parse_field(&self.year),
            mileage: parse_field(&self.mileage),
            max_power: parse_field(&self.max_power),
        }
    }
}

/// Empty or non-numeric values count as not filled in
fn parse_field(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Response body of the JSON prediction endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub n_clicks: u64,
    pub output: String,
}

/// Web server hosting the prediction form
pub struct CarPriceServer {
    config: ServerSettings,
    model: Arc<dyn Regressor>,
}

impl CarPriceServer {
    /// Create a new server around an already loaded model
    pub fn new(config: ServerSettings, model: Arc<dyn Regressor>) -> Self {
        Self { config, model }
    }

    /// Start the server and run until the process exits
    pub async fn start(&self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .context("Invalid server address")?;

        info!("Starting car price server on http://{}", addr);

        warp::serve(self.routes()).run(addr).await;

        Ok(())
    }

    /// All routes, with rejections mapped to plain-text responses
    pub fn routes(&self) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
        self.page_routes()
            .or(self.api_routes())
            .recover(handle_rejection)
    }

    /// Form page routes
    fn page_routes(&self) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
        // GET /
        let index = warp::path::end()
            .and(warp::get())
            .map(|| warp::reply::html(render_page(&PredictionInput::default(), "")));

        // POST /
        let submit = warp::path::end()
            .and(warp::post())
            .and(warp::body::form())
            .and(with_model(Arc::clone(&self.model)))
            .and_then(submit_form);

        index.or(submit)
    }

    /// JSON routes
    fn api_routes(&self) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
        // POST /api/predict
        let predict = warp::path!("api" / "predict")
            .and(warp::post())
            .and(warp::body::json())
            .and(with_model(Arc::clone(&self.model)))
            .and_then(predict_json);

        // GET /health
        let health = warp::path("health")
            .and(warp::path::end())
            .and(warp::get())
            .map(|| warp::reply::json(&serde_json::json!({ "status": "ok" })));

        predict.or(health)
    }
}

fn with_model(
    model: Arc<dyn Regressor>,
) -> impl Filter<Extract = (Arc<dyn Regressor>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&model))
}

async fn submit_form(
    form: FormSubmission,
    model: Arc<dyn Regressor>,
) -> Result<impl Reply, Rejection> {
    let input = form.into_input();
    let output = run_prediction(model.as_ref(), &input)?;

    Ok(warp::reply::html(render_page(&input, &output)))
}

async fn predict_json(
    input: PredictionInput,
    model: Arc<dyn Regressor>,
) -> Result<impl Reply, Rejection> {
    let output = run_prediction(model.as_ref(), &input)?;

    Ok(warp::reply::json(&PredictionResponse {
        n_clicks: input.n_clicks,
        output,
    }))
}

fn run_prediction(model: &dyn Regressor, input: &PredictionInput) -> Result<String, Rejection> {
    predict_price(model, input).map_err(|err| {
        error!("Prediction failed: {}", err);
        warp::reject::custom(PredictionFailed)
    })
}

/// Custom Rejection Handlers
#[derive(Debug)]
struct PredictionFailed;
impl warp::reject::Reject for PredictionFailed {}

/// Global Error Handler
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Rejection> {
    if err.is_not_found() {
        Ok(warp::reply::with_status(
            "Not Found",
            warp::http::StatusCode::NOT_FOUND,
        ))
    } else if err.find::<PredictionFailed>().is_some() {
        Ok(warp::reply::with_status(
            "Prediction Failed",
            warp::http::StatusCode::INTERNAL_SERVER_ERROR,
        ))
    } else {
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("2015", Some(2015.0))]
    #[test_case(" 18.5 ", Some(18.5))]
    #[test_case("", None)]
    #[test_case("abc", None)]
    #[test_case("NaN", None)]
    fn test_parse_field(raw: &str, expected: Option<f64>) {
        assert_eq!(parse_field(raw), expected);
    }

    #[test]
    fn test_form_submission_counts_a_click() {
        let form = FormSubmission {
            n_clicks: 4,
            year: "2015".to_string(),
            mileage: String::new(),
            max_power: "85".to_string(),
        };

        let input = form.into_input();

        assert_eq!(input.n_clicks, 5);
        assert_eq!(input.year, Some(2015.0));
        assert_eq!(input.mileage, None);
        assert_eq!(input.max_power, Some(85.0));
    }
}
