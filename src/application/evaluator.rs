//! The two discount evaluators the pricing pipeline invokes.
//!
//! Both are pure functions over the invocation input. The cart-lines
//! evaluator degrades every malformed or missing input to an empty
//! operation list; the delivery evaluator has a single fatal precondition.

use crate::domain::cart::{DiscountClass, FunctionInput};
use crate::domain::operations::{Operation, RunResult};
use crate::domain::rules::{normalize_code, RuleConfig, RuleKind};
use crate::error::{PromoError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Computes product/order discount operations from the promo code held in
/// the cart attribute and the merchant rule table.
pub fn generate_cart_discounts(input: &FunctionInput) -> RunResult {
    if input.cart.lines.is_empty() {
        return RunResult::empty();
    }

    let code = normalize_code(input.cart.raw_code());
    if code.is_empty() {
        return RunResult::empty();
    }

    let config = RuleConfig::parse(input.discount.metafield_value());
    let Some(rule) = config.resolve(&code) else {
        return RunResult::empty();
    };

    let percent = rule.clamped_percent();
    if percent <= Decimal::ZERO {
        return RunResult::empty();
    }

    let mut operations = Vec::new();

    if rule.kind == RuleKind::Product && input.discount.allows(DiscountClass::Product) {
        let targets: Vec<String> = input
            .cart
            .lines
            .iter()
            .filter(|line| match &rule.product_ids {
                Some(allowed) => line
                    .product_id()
                    .is_some_and(|id| allowed.iter().any(|a| a == id)),
                None => true,
            })
            .map(|line| line.id.clone())
            .collect();

        // A resolved rule with no matching lines emits nothing; the host
        // rejects candidates with zero targets.
        if !targets.is_empty() {
            operations.push(Operation::product_percentage_off(
                rule.message_or(&code),
                targets,
                percent,
            ));
        }
    }

    if rule.kind == RuleKind::Order && input.discount.allows(DiscountClass::Order) {
        operations.push(Operation::order_percentage_off(
            rule.message_or(&code),
            percent,
        ));
    }

    RunResult { operations }
}

/// Computes the shipping discount operation: 100% off the first delivery
/// group whenever the shipping class is permitted.
///
/// Fails when the cart has no delivery groups at all; unlike every other
/// degenerate input, the host has no fallback for that case.
pub fn generate_delivery_discounts(input: &FunctionInput) -> Result<RunResult> {
    let Some(first_group) = input.cart.delivery_groups.first() else {
        return Err(PromoError::NoDeliveryGroups);
    };

    if !input.discount.allows(DiscountClass::Shipping) {
        return Ok(RunResult::empty());
    }

    Ok(RunResult {
        operations: vec![Operation::delivery_percentage_off(
            "FREE DELIVERY".to_string(),
            first_group.id.clone(),
            dec!(100),
        )],
    })
}
