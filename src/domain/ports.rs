use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

/// One applied discount code as the checkout reports it.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DiscountCode {
    pub code: String,
}

/// One checkout attribute key/value pair.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountCodeChange {
    ReplaceAll { codes: Vec<String> },
    Remove { code: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeChange {
    Update { key: String, value: String },
}

/// "Something changed" notification from the host. Delivery is
/// at-least-once; handlers re-read the current snapshot rather than trust
/// any payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    DiscountCodes,
    Attributes,
}

/// The live checkout session handle the host passes to a mounted widget.
///
/// Reads return snapshots; mutations are asynchronous and may either fail
/// outright or succeed without being reflected in the next read
/// (read-after-write is not guaranteed consistent).
#[async_trait]
pub trait CheckoutSession: Send + Sync {
    async fn discount_codes(&self) -> Vec<DiscountCode>;
    async fn attributes(&self) -> Vec<Attribute>;
    async fn apply_discount_code_change(&self, change: DiscountCodeChange) -> Result<()>;
    async fn apply_attribute_change(&self, change: AttributeChange) -> Result<()>;
    fn subscribe(&self) -> mpsc::UnboundedReceiver<StateChange>;
}

pub type CheckoutSessionRef = Arc<dyn CheckoutSession>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerStatus {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerAction {
    RemoveCodes,
}

/// View model for one rendered banner.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub status: BannerStatus,
    pub text: String,
    pub action: Option<BannerAction>,
}

impl Banner {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            status: BannerStatus::Info,
            text: text.into(),
            action: None,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            status: BannerStatus::Warning,
            text: text.into(),
            action: None,
        }
    }

    pub fn critical(text: impl Into<String>) -> Self {
        Self {
            status: BannerStatus::Critical,
            text: text.into(),
            action: None,
        }
    }

    pub fn with_action(mut self, action: BannerAction) -> Self {
        self.action = Some(action);
        self
    }
}

/// The widget's slice of the checkout UI tree. Each `render` call replaces
/// the previous contents wholesale.
pub trait Surface: Send + Sync {
    fn render(&self, banners: Vec<Banner>);
}

pub type SurfaceRef = Arc<dyn Surface>;
