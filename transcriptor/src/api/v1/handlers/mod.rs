pub(crate) mod health;
pub mod languages;
pub mod ocr;

pub use health::health_check;
