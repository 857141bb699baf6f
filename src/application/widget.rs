//! Checkout widget controller: shows applied discount codes and forcibly
//! removes them, either on load or when an out-of-band attribute flag asks
//! for it.

use crate::application::remover::{CodeRemover, DEFAULT_TIMEOUT};
use crate::domain::ports::{
    AttributeChange, Banner, BannerAction, CheckoutSessionRef, StateChange, SurfaceRef,
};
use std::time::Duration;
use tracing::{debug, warn};

/// Attribute set to the literal "1" to request a forced removal.
pub const REMOVE_FLAG_KEY: &str = "rm_discount_all";
/// Companion timestamp attribute, cleared together with the flag.
pub const REMOVE_FLAG_TS_KEY: &str = "rm_discount_ts";

const REMOVING_TEXT: &str = "Removing discount…";
const AUTO_FAIL_TEXT: &str = "Tried to remove discount code(s). If a discount still shows with no code listed, it is likely an automatic discount configured in Admin.";
const MANUAL_FAIL_TEXT: &str = "Could not fully remove discount code(s). If a discount persists with no code shown, it is an automatic discount (Admin › Discounts).";

pub struct Widget {
    session: CheckoutSessionRef,
    surface: SurfaceRef,
    remover: CodeRemover,
    /// When set, removal runs unconditionally on every mount instead of
    /// waiting for the attribute flag.
    remove_on_load: bool,
    timeout: Duration,
}

impl Widget {
    pub fn new(session: CheckoutSessionRef, surface: SurfaceRef) -> Self {
        let remover = CodeRemover::new(session.clone());
        Self {
            session,
            surface,
            remover,
            remove_on_load: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn remove_on_load(mut self, enabled: bool) -> Self {
        self.remove_on_load = enabled;
        self
    }

    pub fn removal_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Mounts the widget and reacts to host notifications until the
    /// session's channel closes.
    ///
    /// Notifications are handled strictly one at a time; anything arriving
    /// while a handler (including a removal loop) is running waits in the
    /// channel.
    pub async fn run(&self) {
        let mut changes = self.session.subscribe();
        self.mount().await;
        while let Some(change) = changes.recv().await {
            self.handle_change(change).await;
        }
    }

    /// Initial pass on mount: auto-remove check, then render.
    pub async fn mount(&self) {
        self.auto_remove_if_needed().await;
        self.render().await;
    }

    pub async fn handle_change(&self, change: StateChange) {
        match change {
            StateChange::DiscountCodes => self.render().await,
            StateChange::Attributes => self.auto_remove_if_needed().await,
        }
    }

    /// Manual "Remove" action on the applied-codes banner.
    pub async fn remove_clicked(&self) {
        self.surface.render(vec![Banner::info(REMOVING_TEXT)]);
        let ok = self.remover.remove_all(self.timeout).await;
        let failure = if ok {
            None
        } else {
            warn!("manual discount removal did not converge");
            Some(Banner::critical(MANUAL_FAIL_TEXT))
        };
        self.surface.render(self.view(failure).await);
    }

    async fn auto_remove_if_needed(&self) {
        let flagged = self
            .session
            .attributes()
            .await
            .iter()
            .any(|a| a.key == REMOVE_FLAG_KEY && a.value == "1");
        if !(self.remove_on_load || flagged) {
            return;
        }

        self.surface.render(vec![Banner::info(REMOVING_TEXT)]);
        let ok = self.remover.remove_all(self.timeout).await;
        // Clear the trigger whether or not removal converged, so it does
        // not re-fire on the next attribute notification.
        self.clear_flag().await;
        let failure = if ok {
            None
        } else {
            warn!("automatic discount removal did not converge");
            Some(Banner::warning(AUTO_FAIL_TEXT))
        };
        self.surface.render(self.view(failure).await);
    }

    async fn clear_flag(&self) {
        for key in [REMOVE_FLAG_KEY, REMOVE_FLAG_TS_KEY] {
            if let Err(err) = self
                .session
                .apply_attribute_change(AttributeChange::Update {
                    key: key.to_string(),
                    value: String::new(),
                })
                .await
            {
                debug!(key, "could not clear removal flag: {err}");
            }
        }
    }

    async fn render(&self) {
        self.surface.render(self.view(None).await);
    }

    /// Builds the full banner frame: an optional failure banner followed by
    /// the applied-codes banner when any codes remain.
    async fn view(&self, failure: Option<Banner>) -> Vec<Banner> {
        let mut banners = Vec::new();
        banners.extend(failure);

        let codes = self.session.discount_codes().await;
        if !codes.is_empty() {
            let list = codes
                .iter()
                .map(|c| c.code.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            banners.push(
                Banner::info(format!("Discount applied: {list}. "))
                    .with_action(BannerAction::RemoveCodes),
            );
        }
        banners
    }
}
