pub mod error;

pub use error::{PriceError, PriceResult};
