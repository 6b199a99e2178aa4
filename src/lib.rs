//! Car selling price estimator.
//!
//! Serves a small web form that collects a car's year of manufacture,
//! mileage and max power, runs them through a pre-trained regression model
//! and shows the predicted selling price.

pub mod api;
pub mod config;
pub mod core;
pub mod ml;
