use thiserror::Error;

#[derive(Debug, Error)]
pub enum LensQuoteError {
    #[error("{0}")]
    Validation(String),

    #[error("Brand data error: {0}")]
    BrandData(String),
}

impl From<LensQuoteError> for String {
    fn from(err: LensQuoteError) -> Self {
        err.to_string()
    }
}
