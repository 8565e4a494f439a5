#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use tauri_plugin_purchases::*;
use tokio::sync::Notify;

/// Holds `configure` open until the test releases it.
#[derive(Default)]
pub struct ConfigureGate {
  pub entered: Notify,
  pub release: Notify,
}

/// In-memory SDK that records every call and answers from fixtures, or with
/// a scripted failure once `fail_with` has been called.
#[derive(Default)]
pub struct StubSdk {
  calls: Mutex<Vec<&'static str>>,
  failure: Mutex<Option<PurchasesError>>,
  listener: Mutex<Option<PurchaserInfoListener>>,
  listener_failure: Mutex<Option<PurchasesError>>,
  configure_gate: Mutex<Option<Arc<ConfigureGate>>>,
  pub configurations: Mutex<Vec<Configuration>>,
  pub attributions: Mutex<Vec<(HashMap<String, String>, AttributionNetwork, Option<String>)>>,
  pub purchases: Mutex<Vec<(String, String, Vec<String>)>>,
  pub identities: Mutex<Vec<String>>,
  pub sharing: Mutex<Vec<bool>>,
  pub debug_logs: Mutex<Vec<bool>>,
}

impl StubSdk {
  pub fn fail_with(&self, error: PurchasesError) {
    *self.failure.lock().unwrap() = Some(error);
  }

  /// Only the listener install fails; every other call still succeeds.
  pub fn fail_listener_install(&self, error: PurchasesError) {
    *self.listener_failure.lock().unwrap() = Some(error);
  }

  pub fn gate_configure(&self) -> Arc<ConfigureGate> {
    let gate = Arc::new(ConfigureGate::default());
    *self.configure_gate.lock().unwrap() = Some(gate.clone());
    gate
  }

  pub fn count(&self, call: &str) -> usize {
    self.calls.lock().unwrap().iter().filter(|c| **c == call).count()
  }

  pub fn total_calls(&self) -> usize {
    self.calls.lock().unwrap().len()
  }

  /// Simulates the SDK pushing fresh purchaser info.
  pub fn push(&self, info: PurchaserInfo) {
    let listener = self.listener.lock().unwrap().clone();
    if let Some(listener) = listener {
      listener(info);
    }
  }

  fn record(&self, call: &'static str) -> SdkResult<()> {
    self.calls.lock().unwrap().push(call);
    match self.failure.lock().unwrap().clone() {
      Some(error) => Err(error),
      None => Ok(()),
    }
  }
}

#[async_trait]
impl PurchasesSdk for StubSdk {
  async fn configure(&self, configuration: Configuration) -> SdkResult<()> {
    self.record("configure")?;
    let gate = self.configure_gate.lock().unwrap().clone();
    if let Some(gate) = gate {
      gate.entered.notify_one();
      gate.release.notified().await;
    }
    self.configurations.lock().unwrap().push(configuration);
    Ok(())
  }

  async fn set_updated_purchaser_info_listener(
    &self,
    listener: PurchaserInfoListener,
  ) -> SdkResult<()> {
    self.record("set_updated_purchaser_info_listener")?;
    if let Some(error) = self.listener_failure.lock().unwrap().clone() {
      return Err(error);
    }
    *self.listener.lock().unwrap() = Some(listener);
    Ok(())
  }

  async fn set_allow_sharing_store_account(&self, allow_sharing: bool) -> SdkResult<()> {
    self.record("set_allow_sharing_store_account")?;
    self.sharing.lock().unwrap().push(allow_sharing);
    Ok(())
  }

  async fn add_attribution_data(
    &self,
    data: HashMap<String, String>,
    network: AttributionNetwork,
    network_user_id: Option<String>,
  ) -> SdkResult<()> {
    self.record("add_attribution_data")?;
    self
      .attributions
      .lock()
      .unwrap()
      .push((data, network, network_user_id));
    Ok(())
  }

  async fn get_entitlements(&self) -> SdkResult<HashMap<String, Entitlement>> {
    self.record("get_entitlements")?;
    Ok(entitlements())
  }

  async fn get_subscription_skus(&self, skus: Vec<String>) -> SdkResult<Vec<SkuDetails>> {
    self.record("get_subscription_skus")?;
    Ok(skus.iter().map(|id| sku(id, 4_990_000)).collect())
  }

  async fn get_non_subscription_skus(&self, skus: Vec<String>) -> SdkResult<Vec<SkuDetails>> {
    self.record("get_non_subscription_skus")?;
    Ok(skus.iter().map(|id| sku(id, 19_990_000)).collect())
  }

  async fn make_purchase(
    &self,
    sku: String,
    sku_type: String,
    old_skus: Vec<String>,
  ) -> SdkResult<PurchaseOutcome> {
    self.record("make_purchase")?;
    self
      .purchases
      .lock()
      .unwrap()
      .push((sku.clone(), sku_type, old_skus));
    Ok(PurchaseOutcome {
      purchase: StorePurchase {
        sku,
        order_id: Some("GPA.1234-5678".into()),
        purchase_token: "token".into(),
        purchase_time: 1_575_158_400_000,
      },
      purchaser_info: purchaser_info(),
    })
  }

  async fn app_user_id(&self) -> SdkResult<String> {
    self.record("app_user_id")?;
    Ok("user_123".into())
  }

  async fn restore_purchases(&self) -> SdkResult<PurchaserInfo> {
    self.record("restore_purchases")?;
    Ok(purchaser_info())
  }

  async fn reset(&self) -> SdkResult<PurchaserInfo> {
    self.record("reset")?;
    Ok(purchaser_info())
  }

  async fn identify(&self, app_user_id: String) -> SdkResult<PurchaserInfo> {
    self.record("identify")?;
    self.identities.lock().unwrap().push(app_user_id);
    Ok(purchaser_info())
  }

  async fn create_alias(&self, new_app_user_id: String) -> SdkResult<PurchaserInfo> {
    self.record("create_alias")?;
    self.identities.lock().unwrap().push(new_app_user_id);
    Ok(purchaser_info())
  }

  async fn set_debug_logs_enabled(&self, enabled: bool) -> SdkResult<()> {
    self.record("set_debug_logs_enabled")?;
    self.debug_logs.lock().unwrap().push(enabled);
    Ok(())
  }

  async fn get_purchaser_info(&self) -> SdkResult<PurchaserInfo> {
    self.record("get_purchaser_info")?;
    Ok(purchaser_info())
  }

  async fn sync_purchases(&self) -> SdkResult<()> {
    self.record("sync_purchases")
  }

  async fn close(&self) -> SdkResult<()> {
    self.record("close")
  }
}

#[derive(Default)]
pub struct RecordingSink {
  events: Mutex<Vec<(String, Value)>>,
}

impl RecordingSink {
  pub fn events(&self) -> Vec<(String, Value)> {
    self.events.lock().unwrap().clone()
  }
}

impl EventSink for RecordingSink {
  fn send_event(&self, event: &str, payload: Value) {
    self.events.lock().unwrap().push((event.to_string(), payload));
  }
}

pub fn router() -> (Router, Arc<StubSdk>, Arc<RecordingSink>) {
  let sdk = Arc::new(StubSdk::default());
  let sink = Arc::new(RecordingSink::default());
  let router = Router::new(sdk.clone(), sink.clone());
  (router, sdk, sink)
}

pub async fn configured_router() -> (Router, Arc<StubSdk>, Arc<RecordingSink>) {
  let (router, sdk, sink) = router();
  let result = router
    .handle(MethodCall::new(
      "setupPurchases",
      json!({ "apiKey": "goog_key", "appUserId": "user_123" }),
    ))
    .await;
  assert_eq!(result, MethodResult::Success(Value::Null));
  (router, sdk, sink)
}

fn date(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

pub fn purchaser_info() -> PurchaserInfo {
  let expires = Some(date(2030, 1, 1, 0));
  let purchased = Some(date(2029, 12, 1, 0));
  PurchaserInfo {
    original_app_user_id: "user_123".into(),
    active_entitlements: vec!["pro".into()],
    active_subscriptions: vec!["pro_monthly".into()],
    all_purchased_skus: vec!["pro_monthly".into(), "lifetime".into()],
    latest_expiration_date: expires,
    all_expiration_dates_by_sku: HashMap::from([("pro_monthly".to_string(), expires)]),
    all_purchase_dates_by_sku: HashMap::from([("pro_monthly".to_string(), purchased)]),
    expiration_dates_by_entitlement: HashMap::from([("pro".to_string(), expires)]),
    purchase_dates_by_entitlement: HashMap::from([("pro".to_string(), purchased)]),
    request_date: Some(date(2029, 12, 15, 8)),
  }
}

pub fn purchaser_info_json() -> Value {
  json!({
    "activeEntitlements": ["pro"],
    "activeSubscriptions": ["pro_monthly"],
    "allPurchasedProductIdentifiers": ["pro_monthly", "lifetime"],
    "latestExpirationDate": "2030-01-01T00:00:00.000Z",
    "allExpirationDates": { "pro_monthly": "2030-01-01T00:00:00.000Z" },
    "allPurchaseDates": { "pro_monthly": "2029-12-01T00:00:00.000Z" },
    "expirationDatesForEntitlements": { "pro": "2030-01-01T00:00:00.000Z" },
    "purchaseDatesForEntitlements": { "pro": "2029-12-01T00:00:00.000Z" },
    "requestDate": "2029-12-15T08:00:00.000Z",
    "originalAppUserId": "user_123"
  })
}

pub fn sku(id: &str, micros: i64) -> SkuDetails {
  SkuDetails {
    sku: id.to_string(),
    sku_type: "subs".into(),
    title: format!("{id} title"),
    description: format!("{id} description"),
    price: format!("${:.2}", micros as f64 / 1_000_000.0),
    price_amount_micros: micros,
    price_currency_code: "USD".into(),
    introductory_price: None,
    introductory_price_amount_micros: None,
    introductory_price_period: None,
    introductory_price_cycles: None,
    subscription_period: Some("P1M".into()),
    free_trial_period: Some("P1W".into()),
  }
}

pub fn entitlements() -> HashMap<String, Entitlement> {
  HashMap::from([(
    "pro".to_string(),
    Entitlement {
      offerings: HashMap::from([
        (
          "monthly".to_string(),
          Offering {
            active_product_identifier: "pro_monthly".into(),
            sku_details: Some(sku("pro_monthly", 4_990_000)),
          },
        ),
        (
          "annual".to_string(),
          Offering {
            active_product_identifier: "pro_annual".into(),
            sku_details: None,
          },
        ),
      ]),
    },
  )])
}
