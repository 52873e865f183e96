use thiserror::Error;

/// Rejections of a single `on_bar` call. The detector state is untouched
/// whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ZigZagError {
    #[error("bar index {index} is not after the last processed index {last}")]
    OutOfOrderInput { index: u64, last: u64 },

    #[error("bar {index} carries a non-finite price")]
    NonFinitePrice { index: u64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("percentage move must be finite and non-negative, got {0}")]
    InvalidPercentageMove(f64),

    #[error("warm-up must require at least one bar")]
    InvalidWarmup,

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}
