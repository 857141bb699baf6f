//! Wire model for the operations the function hands back to the host.
//!
//! Field names, casing, and the selection-strategy strings are part of the
//! host contract; serde attributes here reproduce the exact JSON shapes the
//! pricing pipeline consumes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result document of one function invocation: `{ "operations": [...] }`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Default, Clone)]
pub struct RunResult {
    pub operations: Vec<Operation>,
}

impl RunResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// One discount operation, externally tagged the way the host expects
/// (`{"productDiscountsAdd": {...}}` and so on).
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    ProductDiscountsAdd(ProductDiscountsAdd),
    OrderDiscountsAdd(OrderDiscountsAdd),
    DeliveryDiscountsAdd(DeliveryDiscountsAdd),
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProductDiscountsAdd {
    pub candidates: Vec<ProductCandidate>,
    pub selection_strategy: ProductSelectionStrategy,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderDiscountsAdd {
    pub candidates: Vec<OrderCandidate>,
    pub selection_strategy: OrderSelectionStrategy,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDiscountsAdd {
    pub candidates: Vec<DeliveryCandidate>,
    pub selection_strategy: DeliverySelectionStrategy,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductSelectionStrategy {
    First,
    Maximum,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSelectionStrategy {
    First,
    Maximum,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliverySelectionStrategy {
    All,
    First,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProductCandidate {
    pub message: String,
    pub targets: Vec<ProductTarget>,
    pub value: DiscountValue,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderCandidate {
    pub message: String,
    pub targets: Vec<OrderTarget>,
    pub value: DiscountValue,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryCandidate {
    pub message: String,
    pub targets: Vec<DeliveryTarget>,
    pub value: DiscountValue,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub enum ProductTarget {
    CartLine(CartLineTarget),
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CartLineTarget {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub enum OrderTarget {
    OrderSubtotal(OrderSubtotalTarget),
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubtotalTarget {
    pub excluded_cart_line_ids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub enum DeliveryTarget {
    DeliveryGroup(DeliveryGroupTarget),
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryGroupTarget {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub enum DiscountValue {
    Percentage(Percentage),
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Percentage {
    pub value: Decimal,
}

impl Operation {
    /// Product discount over explicit cart-line targets; the single
    /// candidate already covers every target line, so the host is told to
    /// apply just that first candidate.
    pub fn product_percentage_off(
        message: String,
        line_ids: Vec<String>,
        percent: Decimal,
    ) -> Self {
        Self::ProductDiscountsAdd(ProductDiscountsAdd {
            candidates: vec![ProductCandidate {
                message,
                targets: line_ids
                    .into_iter()
                    .map(|id| ProductTarget::CartLine(CartLineTarget { id }))
                    .collect(),
                value: DiscountValue::Percentage(Percentage { value: percent }),
            }],
            selection_strategy: ProductSelectionStrategy::First,
        })
    }

    /// Order discount against the whole subtotal, no line exclusions.
    pub fn order_percentage_off(message: String, percent: Decimal) -> Self {
        Self::OrderDiscountsAdd(OrderDiscountsAdd {
            candidates: vec![OrderCandidate {
                message,
                targets: vec![OrderTarget::OrderSubtotal(OrderSubtotalTarget {
                    excluded_cart_line_ids: vec![],
                })],
                value: DiscountValue::Percentage(Percentage { value: percent }),
            }],
            selection_strategy: OrderSelectionStrategy::First,
        })
    }

    /// Delivery discount against one delivery group. The `All` strategy is
    /// part of the wire contract for this operation even though only one
    /// candidate is ever provided.
    pub fn delivery_percentage_off(
        message: String,
        delivery_group_id: String,
        percent: Decimal,
    ) -> Self {
        Self::DeliveryDiscountsAdd(DeliveryDiscountsAdd {
            candidates: vec![DeliveryCandidate {
                message,
                targets: vec![DeliveryTarget::DeliveryGroup(DeliveryGroupTarget {
                    id: delivery_group_id,
                })],
                value: DiscountValue::Percentage(Percentage { value: percent }),
            }],
            selection_strategy: DeliverySelectionStrategy::All,
        })
    }
}
