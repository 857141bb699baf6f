//! In-memory implementation of the checkout session port.
//!
//! Serves as the reference host for tests and local runs. The write
//! behavior is configurable so tests can reproduce the consistency
//! guarantees (and lack thereof) of the real host: rejected mutations,
//! mutations that are accepted but never reflected, and replace-all calls
//! that only take effect after a number of attempts.

use crate::domain::ports::{
    Attribute, AttributeChange, Banner, CheckoutSession, DiscountCode, DiscountCodeChange,
    StateChange, Surface,
};
use crate::error::{PromoError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// How the simulated host treats incoming mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteBehavior {
    /// Mutations succeed and are visible to the next read.
    #[default]
    Immediate,
    /// Every mutation is refused.
    Reject,
    /// Mutations are accepted but never change the observable state.
    AcceptAndIgnore,
    /// Per-code removals are accepted but ignored; only the nth
    /// replace-all call (1-based) actually clears the collection.
    ReplaceTakesEffectAfter(u32),
}

#[derive(Default)]
struct HostState {
    codes: Vec<String>,
    attributes: BTreeMap<String, String>,
    behavior: WriteBehavior,
    code_change_calls: usize,
    replace_calls: u32,
}

#[derive(Default, Clone)]
pub struct InMemoryCheckout {
    state: Arc<RwLock<HostState>>,
    // std mutex: `subscribe` is sync on the port and `notify` never holds
    // the lock across an await point.
    subscribers: Arc<std::sync::Mutex<Vec<mpsc::UnboundedSender<StateChange>>>>,
}

impl InMemoryCheckout {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_write_behavior(&self, behavior: WriteBehavior) {
        self.state.write().await.behavior = behavior;
    }

    /// Replaces the applied codes out-of-band, as the shopper or another
    /// extension would, and notifies subscribers.
    pub async fn seed_codes<I, S>(&self, codes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        {
            let mut state = self.state.write().await;
            state.codes = codes.into_iter().map(Into::into).collect();
        }
        self.notify(StateChange::DiscountCodes);
    }

    /// Sets an attribute out-of-band and notifies subscribers.
    pub async fn seed_attribute(&self, key: &str, value: &str) {
        {
            let mut state = self.state.write().await;
            state.attributes.insert(key.to_string(), value.to_string());
        }
        self.notify(StateChange::Attributes);
    }

    pub async fn attribute(&self, key: &str) -> Option<String> {
        self.state.read().await.attributes.get(key).cloned()
    }

    /// Total `apply_discount_code_change` calls observed, rejected or not.
    pub async fn code_change_calls(&self) -> usize {
        self.state.read().await.code_change_calls
    }

    fn notify(&self, change: StateChange) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| tx.send(change).is_ok());
    }
}

#[async_trait]
impl CheckoutSession for InMemoryCheckout {
    async fn discount_codes(&self) -> Vec<DiscountCode> {
        self.state
            .read()
            .await
            .codes
            .iter()
            .map(|code| DiscountCode { code: code.clone() })
            .collect()
    }

    async fn attributes(&self) -> Vec<Attribute> {
        self.state
            .read()
            .await
            .attributes
            .iter()
            .map(|(key, value)| Attribute {
                key: key.clone(),
                value: value.clone(),
            })
            .collect()
    }

    async fn apply_discount_code_change(&self, change: DiscountCodeChange) -> Result<()> {
        let changed = {
            let mut state = self.state.write().await;
            state.code_change_calls += 1;
            match state.behavior {
                WriteBehavior::Reject => {
                    return Err(PromoError::ChangeRejected(format!("{change:?}")));
                }
                WriteBehavior::AcceptAndIgnore => false,
                WriteBehavior::ReplaceTakesEffectAfter(n) => match change {
                    DiscountCodeChange::ReplaceAll { codes } => {
                        state.replace_calls += 1;
                        if state.replace_calls >= n {
                            state.codes = codes;
                            true
                        } else {
                            false
                        }
                    }
                    DiscountCodeChange::Remove { .. } => false,
                },
                WriteBehavior::Immediate => match change {
                    DiscountCodeChange::ReplaceAll { codes } => {
                        state.codes = codes;
                        true
                    }
                    DiscountCodeChange::Remove { code } => {
                        let before = state.codes.len();
                        state.codes.retain(|c| c != &code);
                        state.codes.len() != before
                    }
                },
            }
        };
        if changed {
            self.notify(StateChange::DiscountCodes);
        }
        Ok(())
    }

    async fn apply_attribute_change(&self, change: AttributeChange) -> Result<()> {
        {
            let mut state = self.state.write().await;
            if state.behavior == WriteBehavior::Reject {
                return Err(PromoError::ChangeRejected(format!("{change:?}")));
            }
            let AttributeChange::Update { key, value } = change;
            state.attributes.insert(key, value);
        }
        self.notify(StateChange::Attributes);
        Ok(())
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<StateChange> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().push(tx);
        rx
    }
}

/// Surface that records every rendered frame, newest last.
#[derive(Default)]
pub struct BannerLog {
    frames: std::sync::Mutex<Vec<Vec<Banner>>>,
}

impl BannerLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<Vec<Banner>> {
        self.frames.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Vec<Banner>> {
        self.frames.lock().unwrap().last().cloned()
    }
}

impl Surface for BannerLog {
    fn render(&self, banners: Vec<Banner>) {
        self.frames.lock().unwrap().push(banners);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_immediate_mutations_apply() {
        let host = InMemoryCheckout::new();
        host.seed_codes(["SAVE10", "TOP20"]).await;

        host.apply_discount_code_change(DiscountCodeChange::Remove {
            code: "SAVE10".to_string(),
        })
        .await
        .unwrap();
        let codes = host.discount_codes().await;
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[0].code, "TOP20");

        host.apply_discount_code_change(DiscountCodeChange::ReplaceAll { codes: vec![] })
            .await
            .unwrap();
        assert!(host.discount_codes().await.is_empty());
    }

    #[tokio::test]
    async fn test_reject_behavior_refuses_and_keeps_state() {
        let host = InMemoryCheckout::new();
        host.seed_codes(["SAVE10"]).await;
        host.set_write_behavior(WriteBehavior::Reject).await;

        let result = host
            .apply_discount_code_change(DiscountCodeChange::ReplaceAll { codes: vec![] })
            .await;
        assert!(matches!(result, Err(PromoError::ChangeRejected(_))));
        assert_eq!(host.discount_codes().await.len(), 1);
        assert_eq!(host.code_change_calls().await, 1);
    }

    #[tokio::test]
    async fn test_accept_and_ignore_never_changes_state() {
        let host = InMemoryCheckout::new();
        host.seed_codes(["SAVE10"]).await;
        host.set_write_behavior(WriteBehavior::AcceptAndIgnore).await;

        host.apply_discount_code_change(DiscountCodeChange::ReplaceAll { codes: vec![] })
            .await
            .unwrap();
        host.apply_discount_code_change(DiscountCodeChange::Remove {
            code: "SAVE10".to_string(),
        })
        .await
        .unwrap();
        assert_eq!(host.discount_codes().await.len(), 1);
    }

    #[tokio::test]
    async fn test_replace_takes_effect_after_n_attempts() {
        let host = InMemoryCheckout::new();
        host.seed_codes(["SAVE10"]).await;
        host.set_write_behavior(WriteBehavior::ReplaceTakesEffectAfter(2))
            .await;

        host.apply_discount_code_change(DiscountCodeChange::ReplaceAll { codes: vec![] })
            .await
            .unwrap();
        assert_eq!(host.discount_codes().await.len(), 1);

        host.apply_discount_code_change(DiscountCodeChange::ReplaceAll { codes: vec![] })
            .await
            .unwrap();
        assert!(host.discount_codes().await.is_empty());
    }

    #[tokio::test]
    async fn test_attributes_sorted_snapshot() {
        let host = InMemoryCheckout::new();
        host.seed_attribute("b", "2").await;
        host.seed_attribute("a", "1").await;

        let attrs = host.attributes().await;
        assert_eq!(attrs[0].key, "a");
        assert_eq!(attrs[1].key, "b");
        assert_eq!(host.attribute("a").await.as_deref(), Some("1"));
    }
}
