//! Product Model

use serde::{Deserialize, Serialize};

/// Catalog item — read-mostly from the economy core's perspective
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub name: String,
    /// Points credited when a code for this product is scanned
    pub point_value: i64,
    /// Points debited when this product is redeemed as a reward
    pub point_cost: i64,
    /// When true, scanning a code immediately redeems the product
    pub redeem_on_scan: bool,
    pub is_active: bool,
    pub created_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub sku: String,
    pub name: String,
    pub point_value: i64,
    pub point_cost: i64,
    #[serde(default)]
    pub redeem_on_scan: bool,
}
