//! Conversions from SDK objects to the plain records sent to the shell.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::*;

const MICROS_PER_UNIT: f64 = 1_000_000.0;

fn format_date(date: &DateTime<Utc>) -> String {
  date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn map_dates(dates: &HashMap<String, Option<DateTime<Utc>>>) -> BTreeMap<String, Option<String>> {
  dates
    .iter()
    .map(|(key, date)| (key.clone(), date.as_ref().map(format_date)))
    .collect()
}

pub fn map_purchaser_info(info: &PurchaserInfo) -> PurchaserInfoRecord {
  PurchaserInfoRecord {
    active_entitlements: info.active_entitlements.clone(),
    active_subscriptions: info.active_subscriptions.clone(),
    all_purchased_product_identifiers: info.all_purchased_skus.clone(),
    latest_expiration_date: info.latest_expiration_date.as_ref().map(format_date),
    all_expiration_dates: map_dates(&info.all_expiration_dates_by_sku),
    all_purchase_dates: map_dates(&info.all_purchase_dates_by_sku),
    expiration_dates_for_entitlements: map_dates(&info.expiration_dates_by_entitlement),
    purchase_dates_for_entitlements: map_dates(&info.purchase_dates_by_entitlement),
    request_date: info.request_date.as_ref().map(format_date),
    original_app_user_id: info.original_app_user_id.clone(),
  }
}

pub fn map_sku_details(details: &SkuDetails) -> ProductRecord {
  ProductRecord {
    identifier: details.sku.clone(),
    description: details.description.clone(),
    title: details.title.clone(),
    price: details.price_amount_micros as f64 / MICROS_PER_UNIT,
    price_string: details.price.clone(),
    currency_code: details.price_currency_code.clone(),
    intro_price: details
      .introductory_price_amount_micros
      .map(|micros| micros as f64 / MICROS_PER_UNIT),
    intro_price_string: details.introductory_price.clone(),
    intro_price_period: details.introductory_price_period.clone(),
    intro_price_cycles: details.introductory_price_cycles,
    subscription_period: details.subscription_period.clone(),
    free_trial_period: details.free_trial_period.clone(),
  }
}

pub fn map_entitlements(entitlements: &HashMap<String, Entitlement>) -> EntitlementsRecord {
  entitlements
    .iter()
    .map(|(name, entitlement)| {
      let offerings = entitlement
        .offerings
        .iter()
        .map(|(id, offering)| (id.clone(), offering.sku_details.as_ref().map(map_sku_details)))
        .collect();
      (name.clone(), offerings)
    })
    .collect()
}

pub fn map_purchase(outcome: &PurchaseOutcome) -> MakePurchaseRecord {
  MakePurchaseRecord {
    product_identifier: outcome.purchase.sku.clone(),
    purchaser_info: map_purchaser_info(&outcome.purchaser_info),
  }
}
