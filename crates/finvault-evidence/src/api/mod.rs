//! External data-source clients

pub mod sec_edgar;
pub mod yahoo;

pub use sec_edgar::{EdgarFiling, FormType, SecEdgarClient};
pub use yahoo::{PriceSample, YahooFinanceClient};
