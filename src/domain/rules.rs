//! Merchant rule table: code → discount rule.
//!
//! The table arrives as a JSON string inside a metafield the merchant
//! controls, so parsing is deliberately forgiving: a malformed document
//! reads as an empty table and odd field shapes are defaulted per rule
//! instead of failing the whole table.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Order,
    Product,
    /// Anything the table declares that this extension does not know;
    /// matches neither evaluation branch.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Rule {
    #[serde(rename = "type")]
    pub kind: RuleKind,
    #[serde(default, deserialize_with = "lenient_percent")]
    pub percent: Decimal,
    #[serde(default)]
    pub message: Option<String>,
    /// Explicit allow-list of eligible product identifiers; absence means
    /// the rule applies to every cart line.
    #[serde(rename = "productIds", default, deserialize_with = "lenient_ids")]
    pub product_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default, PartialEq, Clone)]
pub struct RuleConfig {
    #[serde(default)]
    pub codes: HashMap<String, Rule>,
}

impl RuleConfig {
    /// Parses the merchant metafield value. `None`, empty, and malformed
    /// documents all read as an empty table; the parse failure itself is
    /// only reported on the diagnostic channel.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        if raw.is_empty() {
            return Self::default();
        }
        match serde_json::from_str(raw) {
            Ok(config) => config,
            Err(err) => {
                tracing::debug!("ignoring malformed merchant rule table: {err}");
                Self::default()
            }
        }
    }

    /// Looks up `code` in the merchant table first, then in the built-in
    /// fallback table.
    pub fn resolve(&self, code: &str) -> Option<Rule> {
        self.codes.get(code).cloned().or_else(|| builtin_rule(code))
    }
}

impl Rule {
    /// Percent confined to the closed interval [0, 100].
    pub fn clamped_percent(&self) -> Decimal {
        self.percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
    }

    /// Customer-facing message; an absent or empty message falls back to
    /// the code itself.
    pub fn message_or(&self, code: &str) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(code)
            .to_string()
    }
}

/// Normalizes a raw promo code: surrounding whitespace trimmed, upper-cased.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Rules shipped with the extension, consulted when the merchant table has
/// no entry for the code.
fn builtin_rule(code: &str) -> Option<Rule> {
    match code {
        "SAVE10" => Some(Rule {
            kind: RuleKind::Order,
            percent: dec!(10),
            message: Some("10% off order".to_string()),
            product_ids: None,
        }),
        "TOP20" => Some(Rule {
            kind: RuleKind::Product,
            percent: dec!(20),
            message: Some("20% off top item".to_string()),
            product_ids: None,
        }),
        _ => None,
    }
}

/// Accepts numbers and numeric strings; everything else reads as 0.
fn lenient_percent<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let percent = match value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .and_then(|f| Decimal::try_from(f).ok())
            .unwrap_or(Decimal::ZERO),
        serde_json::Value::String(s) => Decimal::from_str(s.trim()).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    };
    Ok(percent)
}

/// Accepts an array of strings; any other shape reads as "no allow-list".
fn lenient_ids<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(None);
    };
    Ok(Some(
        items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
    ))
}
