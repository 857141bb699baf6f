use serde::{Deserialize, Serialize};

/// Discount classes the host permits for a given invocation.
///
/// A rule only produces an operation when its type is permitted here;
/// rule type and class permission are independent gates.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountClass {
    Order,
    Product,
    Shipping,
}

/// Function input as the pricing pipeline delivers it.
///
/// Every field is defaulted so that a missing subtree degrades to "empty"
/// instead of failing deserialization; the only hard precondition in the
/// whole input is enforced later by the delivery evaluator.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInput {
    #[serde(default)]
    pub cart: Cart,
    #[serde(default)]
    pub discount: DiscountContext,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    pub lines: Vec<CartLine>,
    /// Cart-level attribute carrying the promo code free text.
    #[serde(default)]
    pub attribute: Option<CodeAttribute>,
    #[serde(default)]
    pub delivery_groups: Vec<DeliveryGroup>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: String,
    #[serde(default)]
    pub merchandise: Merchandise,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Merchandise {
    #[serde(default)]
    pub product: Option<ProductRef>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub id: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CodeAttribute {
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryGroup {
    pub id: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DiscountContext {
    #[serde(default)]
    pub discount_classes: Vec<DiscountClass>,
    /// Merchant configuration blob; `value` holds a JSON-encoded rule table.
    #[serde(default)]
    pub metafield: Option<Metafield>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Metafield {
    #[serde(default)]
    pub value: Option<String>,
}

impl Cart {
    /// The promo code as entered, before normalization. Absent attribute or
    /// absent value both read as "no code".
    pub fn raw_code(&self) -> &str {
        self.attribute
            .as_ref()
            .and_then(|a| a.value.as_deref())
            .unwrap_or("")
    }
}

impl DiscountContext {
    pub fn allows(&self, class: DiscountClass) -> bool {
        self.discount_classes.contains(&class)
    }

    pub fn metafield_value(&self) -> Option<&str> {
        self.metafield.as_ref().and_then(|m| m.value.as_deref())
    }
}

impl CartLine {
    /// Product identifier this line resolves to, when the merchandise
    /// carries one.
    pub fn product_id(&self) -> Option<&str> {
        self.merchandise.product.as_ref().map(|p| p.id.as_str())
    }
}
