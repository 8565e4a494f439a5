use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Objects handed back by the purchasing SDK. They are read-only here.

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaserInfo {
  pub original_app_user_id: String,
  #[serde(default)]
  pub active_entitlements: Vec<String>,
  #[serde(default)]
  pub active_subscriptions: Vec<String>,
  #[serde(default)]
  pub all_purchased_skus: Vec<String>,
  pub latest_expiration_date: Option<DateTime<Utc>>,
  #[serde(default)]
  pub all_expiration_dates_by_sku: HashMap<String, Option<DateTime<Utc>>>,
  #[serde(default)]
  pub all_purchase_dates_by_sku: HashMap<String, Option<DateTime<Utc>>>,
  #[serde(default)]
  pub expiration_dates_by_entitlement: HashMap<String, Option<DateTime<Utc>>>,
  #[serde(default)]
  pub purchase_dates_by_entitlement: HashMap<String, Option<DateTime<Utc>>>,
  pub request_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuDetails {
  pub sku: String,
  #[serde(rename = "type")]
  pub sku_type: String,
  pub title: String,
  pub description: String,
  pub price: String,
  pub price_amount_micros: i64,
  pub price_currency_code: String,
  pub introductory_price: Option<String>,
  pub introductory_price_amount_micros: Option<i64>,
  pub introductory_price_period: Option<String>,
  pub introductory_price_cycles: Option<i32>,
  pub subscription_period: Option<String>,
  pub free_trial_period: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Offering {
  pub active_product_identifier: String,
  pub sku_details: Option<SkuDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
  #[serde(default)]
  pub offerings: HashMap<String, Offering>,
}

/// A completed store transaction.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePurchase {
  pub sku: String,
  pub order_id: Option<String>,
  pub purchase_token: String,
  pub purchase_time: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOutcome {
  pub purchase: StorePurchase,
  pub purchaser_info: PurchaserInfo,
}

/// Attribution providers known to the SDK, keyed by their server value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributionNetwork {
  Adjust = 1,
  AppsFlyer = 2,
  Branch = 3,
  Tenjin = 4,
  Facebook = 5,
  MParticle = 6,
}

impl AttributionNetwork {
  pub fn from_server_value(value: i64) -> Option<Self> {
    match value {
      1 => Some(AttributionNetwork::Adjust),
      2 => Some(AttributionNetwork::AppsFlyer),
      3 => Some(AttributionNetwork::Branch),
      4 => Some(AttributionNetwork::Tenjin),
      5 => Some(AttributionNetwork::Facebook),
      6 => Some(AttributionNetwork::MParticle),
      _ => None,
    }
  }

  pub fn server_value(self) -> i64 {
    self as i64
  }
}

impl Serialize for AttributionNetwork {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_i64(self.server_value())
  }
}

impl<'de> Deserialize<'de> for AttributionNetwork {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    let value = i64::deserialize(deserializer)?;
    AttributionNetwork::from_server_value(value).ok_or_else(|| {
      serde::de::Error::custom(format!("Invalid attribution network: {value}"))
    })
  }
}

/// Arguments passed to `configure`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
  pub api_key: String,
  pub app_user_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub observer_mode: Option<bool>,
}

// Call arguments, as sent by the shell.

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupPurchasesRequest {
  pub api_key: String,
  pub app_user_id: Option<String>,
  pub observer_mode: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAllowSharingStoreAccountRequest {
  pub allow_sharing: bool,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAttributionDataRequest {
  pub data: HashMap<String, String>,
  /// Raw server value; anything unknown is ignored.
  #[serde(default = "unknown_network")]
  pub network: i64,
  pub network_user_id: Option<String>,
}

fn unknown_network() -> i64 {
  -1
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProductInfoRequest {
  pub product_identifiers: Vec<String>,
  #[serde(rename = "type")]
  pub product_type: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MakePurchaseRequest {
  pub product_identifier: String,
  #[serde(rename = "oldSKUs", default)]
  pub old_skus: Option<Vec<String>>,
  #[serde(rename = "type")]
  pub product_type: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IdentifyRequest {
  #[serde(rename = "appUserID")]
  pub app_user_id: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateAliasRequest {
  #[serde(rename = "newAppUserID")]
  pub new_app_user_id: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SetDebugLogsEnabledRequest {
  /// Missing and `null` both mean off.
  #[serde(default)]
  pub enabled: Option<bool>,
}

// Plain records returned to the shell.

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaserInfoRecord {
  pub active_entitlements: Vec<String>,
  pub active_subscriptions: Vec<String>,
  pub all_purchased_product_identifiers: Vec<String>,
  pub latest_expiration_date: Option<String>,
  pub all_expiration_dates: BTreeMap<String, Option<String>>,
  pub all_purchase_dates: BTreeMap<String, Option<String>>,
  pub expiration_dates_for_entitlements: BTreeMap<String, Option<String>>,
  pub purchase_dates_for_entitlements: BTreeMap<String, Option<String>>,
  pub request_date: Option<String>,
  pub original_app_user_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProductRecord {
  pub identifier: String,
  pub description: String,
  pub title: String,
  pub price: f64,
  pub price_string: String,
  pub currency_code: String,
  pub intro_price: Option<f64>,
  pub intro_price_string: Option<String>,
  pub intro_price_period: Option<String>,
  pub intro_price_cycles: Option<i32>,
  pub subscription_period: Option<String>,
  pub free_trial_period: Option<String>,
}

/// Entitlement id to offering id to the offering's active product, if the
/// store returned details for it.
pub type EntitlementsRecord = BTreeMap<String, BTreeMap<String, Option<ProductRecord>>>;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MakePurchaseRecord {
  pub product_identifier: String,
  pub purchaser_info: PurchaserInfoRecord,
}
