//! Response envelope and mall DTOs.
//!
//! # Design
//! Field names follow the backend's camelCase JSON. Payload types are a
//! compile-time contract only: unknown fields are ignored and most fields
//! default when missing, so a partial payload still decodes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decoded `{code, msg, result}` response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub msg: String,
    pub result: T,
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Decode a 2xx response body. An empty body, or an envelope without a
    /// `result` field, decodes as if `result` were `null`.
    pub fn from_body(body: &str) -> Result<Self, serde_json::Error> {
        if body.trim().is_empty() {
            return serde_json::from_value(serde_json::json!({ "result": null }));
        }
        let mut value: Value = serde_json::from_str(body)?;
        if let Value::Object(map) = &mut value {
            map.entry("result").or_insert(Value::Null);
        }
        serde_json::from_value(value)
    }
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub counts: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub page_size: u32,
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub sku_id: String,
    pub name: String,
    #[serde(default)]
    pub attrs_text: String,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub now_price: f64,
    #[serde(default)]
    pub now_original_price: f64,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub is_effective: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartParams {
    pub sku_id: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateCartParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerItem {
    pub id: String,
    pub img_url: String,
    #[serde(default)]
    pub href_url: String,
    #[serde(default, rename = "type")]
    pub kind: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub pictures: Vec<String>,
    #[serde(default)]
    pub target: String,
    #[serde(default, rename = "type")]
    pub kind: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub order_num: u64,
}

// ---------------------------------------------------------------------------
// Hot recommendation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotParams {
    #[serde(flatten)]
    pub page: PageParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTypeItem {
    pub id: String,
    pub title: String,
    pub goods_items: PageResult<GuessItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotResult {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub banner_picture: String,
    #[serde(default)]
    pub sub_types: Vec<SubTypeItem>,
}

// ---------------------------------------------------------------------------
// Category / goods
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryChildItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub goods: Vec<GuessItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTopItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub image_banners: Vec<String>,
    #[serde(default)]
    pub children: Vec<CategoryChildItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuSpecItem {
    pub name: String,
    pub value_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuItem {
    pub id: String,
    #[serde(default)]
    pub inventory: u32,
    #[serde(default)]
    pub old_price: String,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub sku_code: String,
    #[serde(default)]
    pub specs: Vec<SkuSpecItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecValue {
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecItem {
    pub name: String,
    #[serde(default)]
    pub values: Vec<SpecValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailProperty {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GoodsDetails {
    #[serde(default)]
    pub pictures: Vec<String>,
    #[serde(default)]
    pub properties: Vec<DetailProperty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodsResult {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub old_price: String,
    #[serde(default)]
    pub main_pictures: Vec<String>,
    #[serde(default)]
    pub skus: Vec<SkuItem>,
    #[serde(default)]
    pub specs: Vec<SpecItem>,
    #[serde(default)]
    pub details: GoodsDetails,
    #[serde(default)]
    pub similar_products: Vec<GuessItem>,
}

// ---------------------------------------------------------------------------
// Pay
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderParams {
    pub order_id: String,
}

/// Arguments for the mini-program payment call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentParams {
    #[serde(default)]
    pub time_stamp: String,
    #[serde(default)]
    pub nonce_str: String,
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub sign_type: String,
    #[serde(default)]
    pub pay_sign: String,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetail {
    pub id: String,
    pub account: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub full_location: Option<String>,
    #[serde(default)]
    pub profession: Option<String>,
}

/// Editable profile fields. Omitted fields are left unchanged on the server.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county_code: Option<String>,
}

/// Payload of endpoints that return no typed result.
pub type Untyped = Value;
