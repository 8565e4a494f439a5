use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ErrorResponse, PurchasesError, PurchasesErrorCode};
use crate::events::{EventForwarder, EventSink};
use crate::mappers::*;
use crate::models::*;
use crate::sdk::PurchasesSdk;

/// One request from the app shell.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MethodCall {
  pub method: String,
  #[serde(default)]
  pub arguments: Map<String, Value>,
}

impl MethodCall {
  pub fn new(method: impl Into<String>, arguments: Value) -> Self {
    let arguments = match arguments {
      Value::Object(map) => map,
      _ => Map::new(),
    };
    Self {
      method: method.into(),
      arguments,
    }
  }

  fn parse<T: DeserializeOwned>(&self) -> Result<T, ErrorResponse> {
    serde_json::from_value(Value::Object(self.arguments.clone()))
      .map_err(|e| ErrorResponse::invalid_arguments(&self.method, &e))
  }
}

/// Completion of a [`MethodCall`].
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResult {
  Success(Value),
  Error(ErrorResponse),
  NotImplemented,
  /// Fire-and-forget methods never complete.
  NoReply,
}

impl MethodResult {
  fn from_reply<T: Serialize>(reply: Result<T, ErrorResponse>) -> Self {
    match reply.and_then(|value| {
      serde_json::to_value(value).map_err(|e| {
        ErrorResponse::from(PurchasesError::new(
          PurchasesErrorCode::UnknownError,
          format!("failed to encode response: {e}"),
        ))
      })
    }) {
      Ok(value) => MethodResult::Success(value),
      Err(error) => MethodResult::Error(error),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
  Unconfigured,
  Configured,
  Closed,
}

type Reply<T> = Result<T, ErrorResponse>;

#[derive(Debug)]
struct State {
  lifecycle: Lifecycle,
  /// Bumped by every teardown so an in-flight setup can notice it.
  teardowns: u64,
}

/// Dispatches shell calls onto the purchasing SDK and maps the results back.
pub struct Router {
  sdk: Arc<dyn PurchasesSdk>,
  forwarder: EventForwarder,
  state: Mutex<State>,
}

impl Router {
  pub fn new(sdk: Arc<dyn PurchasesSdk>, events: Arc<dyn EventSink>) -> Self {
    Self {
      sdk,
      forwarder: EventForwarder::new(events),
      state: Mutex::new(State {
        lifecycle: Lifecycle::Unconfigured,
        teardowns: 0,
      }),
    }
  }

  fn state(&self) -> MutexGuard<'_, State> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn lifecycle(&self) -> Lifecycle {
    self.state().lifecycle
  }

  fn ensure_configured(&self) -> Reply<()> {
    match self.lifecycle() {
      Lifecycle::Configured => Ok(()),
      _ => Err(ErrorResponse::not_configured()),
    }
  }

  pub async fn handle(&self, call: MethodCall) -> MethodResult {
    log::debug!("purchases call: {}", call.method);
    match call.method.as_str() {
      "setupPurchases" => {
        let reply = match call.parse::<SetupPurchasesRequest>() {
          Ok(args) => {
            self
              .setup_purchases(args.api_key, args.app_user_id, args.observer_mode)
              .await
          }
          Err(e) => Err(e),
        };
        MethodResult::from_reply(reply)
      }
      "setAllowSharingStoreAccount" => {
        let reply = match call.parse::<SetAllowSharingStoreAccountRequest>() {
          Ok(args) => self.set_allow_sharing_store_account(args.allow_sharing).await,
          Err(e) => Err(e),
        };
        MethodResult::from_reply(reply)
      }
      "addAttributionData" => {
        match call.parse::<AddAttributionDataRequest>() {
          Ok(args) => {
            self
              .add_attribution_data(args.data, args.network, args.network_user_id)
              .await
          }
          Err(e) => log::warn!("dropping addAttributionData: {}", e.message),
        }
        MethodResult::NoReply
      }
      "getEntitlements" => MethodResult::from_reply(self.get_entitlements().await),
      "getProductInfo" => {
        let reply = match call.parse::<GetProductInfoRequest>() {
          Ok(args) => {
            self
              .get_product_info(args.product_identifiers, &args.product_type)
              .await
          }
          Err(e) => Err(e),
        };
        MethodResult::from_reply(reply)
      }
      "makePurchase" => {
        let reply = match call.parse::<MakePurchaseRequest>() {
          Ok(args) => {
            self
              .make_purchase(args.product_identifier, args.old_skus, args.product_type)
              .await
          }
          Err(e) => Err(e),
        };
        MethodResult::from_reply(reply)
      }
      "getAppUserID" => MethodResult::from_reply(self.get_app_user_id().await),
      "restoreTransactions" => MethodResult::from_reply(self.restore_transactions().await),
      "reset" => MethodResult::from_reply(self.reset().await),
      "identify" => {
        let reply = match call.parse::<IdentifyRequest>() {
          Ok(args) => self.identify(args.app_user_id).await,
          Err(e) => Err(e),
        };
        MethodResult::from_reply(reply)
      }
      "createAlias" => {
        let reply = match call.parse::<CreateAliasRequest>() {
          Ok(args) => self.create_alias(args.new_app_user_id).await,
          Err(e) => Err(e),
        };
        MethodResult::from_reply(reply)
      }
      "setDebugLogsEnabled" => {
        let reply = match call.parse::<SetDebugLogsEnabledRequest>() {
          Ok(args) => self.set_debug_logs_enabled(args.enabled.unwrap_or(false)).await,
          Err(e) => Err(e),
        };
        MethodResult::from_reply(reply)
      }
      "getPurchaserInfo" => MethodResult::from_reply(self.get_purchaser_info().await),
      "syncPurchases" => MethodResult::from_reply(self.sync_purchases().await),
      "setAutomaticAttributionCollection" => MethodResult::NoReply,
      _ => MethodResult::NotImplemented,
    }
  }

  /// Configures the SDK and starts forwarding purchaser-info updates.
  ///
  /// Forwarding is switched on only once both SDK calls succeed. A teardown
  /// that lands while setup is in flight wins: the SDK is closed again and
  /// the call fails as not configured.
  pub async fn setup_purchases(
    &self,
    api_key: String,
    app_user_id: Option<String>,
    observer_mode: Option<bool>,
  ) -> Reply<()> {
    let teardowns = self.state().teardowns;
    self
      .sdk
      .configure(Configuration {
        api_key,
        app_user_id,
        observer_mode,
      })
      .await?;
    self
      .sdk
      .set_updated_purchaser_info_listener(self.forwarder.listener())
      .await?;

    let torn_down = {
      let mut state = self.state();
      if state.teardowns != teardowns {
        true
      } else {
        state.lifecycle = Lifecycle::Configured;
        self.forwarder.activate();
        false
      }
    };
    if torn_down {
      log::warn!("purchases torn down during setup");
      if let Err(e) = self.sdk.close().await {
        log::warn!("failed to close purchases: {e}");
      }
      return Err(ErrorResponse::not_configured());
    }
    log::info!("purchases configured");
    Ok(())
  }

  pub async fn set_allow_sharing_store_account(&self, allow_sharing: bool) -> Reply<()> {
    self.ensure_configured()?;
    Ok(self.sdk.set_allow_sharing_store_account(allow_sharing).await?)
  }

  /// Unknown network values are dropped without reaching the SDK.
  pub async fn add_attribution_data(
    &self,
    data: HashMap<String, String>,
    network: i64,
    network_user_id: Option<String>,
  ) {
    let Some(network) = AttributionNetwork::from_server_value(network) else {
      log::warn!("ignoring attribution data for unknown network {network}");
      return;
    };
    if let Err(e) = self
      .sdk
      .add_attribution_data(data, network, network_user_id)
      .await
    {
      log::warn!("attribution report failed: {e}");
    }
  }

  pub async fn get_entitlements(&self) -> Reply<EntitlementsRecord> {
    self.ensure_configured()?;
    let entitlements = self.sdk.get_entitlements().await?;
    Ok(map_entitlements(&entitlements))
  }

  /// `product_type` equal to "subs" in any case selects subscriptions;
  /// everything else is a one-time product.
  pub async fn get_product_info(
    &self,
    product_identifiers: Vec<String>,
    product_type: &str,
  ) -> Reply<Vec<ProductRecord>> {
    self.ensure_configured()?;
    let skus = if product_type.eq_ignore_ascii_case("subs") {
      self.sdk.get_subscription_skus(product_identifiers).await?
    } else {
      self.sdk.get_non_subscription_skus(product_identifiers).await?
    };
    Ok(skus.iter().map(map_sku_details).collect())
  }

  pub async fn make_purchase(
    &self,
    product_identifier: String,
    old_skus: Option<Vec<String>>,
    product_type: String,
  ) -> Reply<MakePurchaseRecord> {
    self.ensure_configured()?;
    let outcome = self
      .sdk
      .make_purchase(product_identifier, product_type, old_skus.unwrap_or_default())
      .await
      .inspect_err(|e| {
        if e.user_cancelled {
          log::debug!("purchase cancelled by user");
        }
      })?;
    Ok(map_purchase(&outcome))
  }

  pub async fn get_app_user_id(&self) -> Reply<String> {
    self.ensure_configured()?;
    Ok(self.sdk.app_user_id().await?)
  }

  pub async fn restore_transactions(&self) -> Reply<PurchaserInfoRecord> {
    self.ensure_configured()?;
    let info = self.sdk.restore_purchases().await?;
    Ok(map_purchaser_info(&info))
  }

  pub async fn reset(&self) -> Reply<PurchaserInfoRecord> {
    self.ensure_configured()?;
    let info = self.sdk.reset().await?;
    Ok(map_purchaser_info(&info))
  }

  pub async fn identify(&self, app_user_id: String) -> Reply<PurchaserInfoRecord> {
    self.ensure_configured()?;
    let info = self.sdk.identify(app_user_id).await?;
    Ok(map_purchaser_info(&info))
  }

  pub async fn create_alias(&self, new_app_user_id: String) -> Reply<PurchaserInfoRecord> {
    self.ensure_configured()?;
    let info = self.sdk.create_alias(new_app_user_id).await?;
    Ok(map_purchaser_info(&info))
  }

  pub async fn set_debug_logs_enabled(&self, enabled: bool) -> Reply<()> {
    Ok(self.sdk.set_debug_logs_enabled(enabled).await?)
  }

  pub async fn get_purchaser_info(&self) -> Reply<PurchaserInfoRecord> {
    self.ensure_configured()?;
    let info = self.sdk.get_purchaser_info().await?;
    Ok(map_purchaser_info(&info))
  }

  pub async fn sync_purchases(&self) -> Reply<()> {
    self.ensure_configured()?;
    Ok(self.sdk.sync_purchases().await?)
  }

  /// Stops event forwarding and closes the SDK. Pushes arriving afterwards
  /// are dropped.
  pub async fn teardown(&self) {
    if self.detach() {
      if let Err(e) = self.sdk.close().await {
        log::warn!("failed to close purchases: {e}");
      }
    }
  }

  /// Returns whether the SDK was configured and still needs closing.
  fn detach(&self) -> bool {
    let previous = {
      let mut state = self.state();
      self.forwarder.deactivate();
      state.teardowns += 1;
      std::mem::replace(&mut state.lifecycle, Lifecycle::Closed)
    };
    log::info!("purchases torn down");
    previous == Lifecycle::Configured
  }
}
