use checkout_promo::application::evaluator::{
    generate_cart_discounts, generate_delivery_discounts,
};
use checkout_promo::domain::cart::FunctionInput;
use serde_json::json;

fn parse(doc: serde_json::Value) -> FunctionInput {
    serde_json::from_value(doc).unwrap()
}

#[test]
fn test_save10_end_to_end_document() {
    let input = parse(json!({
        "cart": {
            "lines": [
                {"id": "L1", "merchandise": {"product": {"id": "P1"}}},
                {"id": "L2", "merchandise": {"product": {"id": "P2"}}}
            ],
            "attribute": {"value": "save10"}
        },
        "discount": {"discountClasses": ["ORDER", "PRODUCT"]}
    }));

    let result = generate_cart_discounts(&input);

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "operations": [{
                "orderDiscountsAdd": {
                    "candidates": [{
                        "message": "10% off order",
                        "targets": [{"orderSubtotal": {"excludedCartLineIds": []}}],
                        "value": {"percentage": {"value": 10.0}}
                    }],
                    "selectionStrategy": "FIRST"
                }
            }]
        })
    );
}

#[test]
fn test_top20_end_to_end_document() {
    let input = parse(json!({
        "cart": {
            "lines": [
                {"id": "L1", "merchandise": {"product": {"id": "P1"}}},
                {"id": "L2", "merchandise": {"product": {"id": "P2"}}}
            ],
            "attribute": {"value": "TOP20"}
        },
        "discount": {"discountClasses": ["PRODUCT"]}
    }));

    let result = generate_cart_discounts(&input);

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "operations": [{
                "productDiscountsAdd": {
                    "candidates": [{
                        "message": "20% off top item",
                        "targets": [
                            {"cartLine": {"id": "L1"}},
                            {"cartLine": {"id": "L2"}}
                        ],
                        "value": {"percentage": {"value": 20.0}}
                    }],
                    "selectionStrategy": "FIRST"
                }
            }]
        })
    );
}

#[test]
fn test_merchant_table_overrides_and_filters() {
    let metafield = json!({
        "codes": {
            "SHOES20": {
                "type": "product",
                "percent": 20,
                "productIds": ["P1"],
                "message": "20% off selected products"
            }
        }
    })
    .to_string();

    let input = parse(json!({
        "cart": {
            "lines": [
                {"id": "L1", "merchandise": {"product": {"id": "P1"}}},
                {"id": "L2", "merchandise": {"product": {"id": "P2"}}}
            ],
            "attribute": {"value": "shoes20"}
        },
        "discount": {
            "discountClasses": ["PRODUCT"],
            "metafield": {"value": metafield}
        }
    }));

    let result = generate_cart_discounts(&input);

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "operations": [{
                "productDiscountsAdd": {
                    "candidates": [{
                        "message": "20% off selected products",
                        "targets": [{"cartLine": {"id": "L1"}}],
                        "value": {"percentage": {"value": 20.0}}
                    }],
                    "selectionStrategy": "FIRST"
                }
            }]
        })
    );
}

#[test]
fn test_unknown_code_and_empty_cart_yield_empty_documents() {
    let empty_cart = parse(json!({
        "cart": {"lines": [], "attribute": {"value": "SAVE10"}},
        "discount": {"discountClasses": ["ORDER"]}
    }));
    assert_eq!(
        serde_json::to_value(generate_cart_discounts(&empty_cart)).unwrap(),
        json!({"operations": []})
    );

    let unknown_code = parse(json!({
        "cart": {"lines": [{"id": "L1"}], "attribute": {"value": "WHAT"}},
        "discount": {"discountClasses": ["ORDER", "PRODUCT"]}
    }));
    assert_eq!(
        serde_json::to_value(generate_cart_discounts(&unknown_code)).unwrap(),
        json!({"operations": []})
    );
}

#[test]
fn test_delivery_end_to_end_document() {
    let input = parse(json!({
        "cart": {"deliveryGroups": [{"id": "D1"}, {"id": "D2"}]},
        "discount": {"discountClasses": ["SHIPPING"]}
    }));

    let result = generate_delivery_discounts(&input).unwrap();

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "operations": [{
                "deliveryDiscountsAdd": {
                    "candidates": [{
                        "message": "FREE DELIVERY",
                        "targets": [{"deliveryGroup": {"id": "D1"}}],
                        "value": {"percentage": {"value": 100.0}}
                    }],
                    "selectionStrategy": "ALL"
                }
            }]
        })
    );
}

#[test]
fn test_delivery_without_groups_is_fatal() {
    let input = parse(json!({
        "cart": {},
        "discount": {"discountClasses": ["SHIPPING"]}
    }));
    assert!(generate_delivery_discounts(&input).is_err());
}
