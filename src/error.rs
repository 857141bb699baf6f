use thiserror::Error;

pub type Result<T> = std::result::Result<T, PromoError>;

#[derive(Error, Debug)]
pub enum PromoError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The delivery evaluator has no fallback when the cart carries no
    /// delivery groups; the host treats the whole invocation as failed.
    #[error("cart has no delivery groups")]
    NoDeliveryGroups,
    /// A discount-code or attribute mutation refused by the host.
    #[error("checkout rejected change: {0}")]
    ChangeRejected(String),
}
