use std::collections::HashMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tauri::{plugin::PluginApi, AppHandle, Runtime};

use crate::error::{PurchasesError, PurchasesErrorCode};
use crate::models::*;
use crate::sdk::{PurchaserInfoListener, PurchasesSdk, SdkResult};

pub fn init<R: Runtime, C: DeserializeOwned>(
  _app: &AppHandle<R>,
  _api: PluginApi<R, C>,
) -> crate::Result<UnsupportedPlatform> {
  Ok(UnsupportedPlatform)
}

/// Stand-in SDK for platforms without a store integration.
pub struct UnsupportedPlatform;

fn unsupported<T>() -> SdkResult<T> {
  Err(PurchasesError::new(
    PurchasesErrorCode::StoreProblemError,
    "Purchases is not supported on this platform",
  ))
}

#[async_trait]
impl PurchasesSdk for UnsupportedPlatform {
  async fn configure(&self, _configuration: Configuration) -> SdkResult<()> {
    unsupported()
  }

  async fn set_updated_purchaser_info_listener(
    &self,
    _listener: PurchaserInfoListener,
  ) -> SdkResult<()> {
    unsupported()
  }

  async fn set_allow_sharing_store_account(&self, _allow_sharing: bool) -> SdkResult<()> {
    unsupported()
  }

  async fn add_attribution_data(
    &self,
    _data: HashMap<String, String>,
    _network: AttributionNetwork,
    _network_user_id: Option<String>,
  ) -> SdkResult<()> {
    unsupported()
  }

  async fn get_entitlements(&self) -> SdkResult<HashMap<String, Entitlement>> {
    unsupported()
  }

  async fn get_subscription_skus(&self, _skus: Vec<String>) -> SdkResult<Vec<SkuDetails>> {
    unsupported()
  }

  async fn get_non_subscription_skus(&self, _skus: Vec<String>) -> SdkResult<Vec<SkuDetails>> {
    unsupported()
  }

  async fn make_purchase(
    &self,
    _sku: String,
    _sku_type: String,
    _old_skus: Vec<String>,
  ) -> SdkResult<PurchaseOutcome> {
    unsupported()
  }

  async fn app_user_id(&self) -> SdkResult<String> {
    unsupported()
  }

  async fn restore_purchases(&self) -> SdkResult<PurchaserInfo> {
    unsupported()
  }

  async fn reset(&self) -> SdkResult<PurchaserInfo> {
    unsupported()
  }

  async fn identify(&self, _app_user_id: String) -> SdkResult<PurchaserInfo> {
    unsupported()
  }

  async fn create_alias(&self, _new_app_user_id: String) -> SdkResult<PurchaserInfo> {
    unsupported()
  }

  async fn set_debug_logs_enabled(&self, _enabled: bool) -> SdkResult<()> {
    unsupported()
  }

  async fn get_purchaser_info(&self) -> SdkResult<PurchaserInfo> {
    unsupported()
  }

  async fn sync_purchases(&self) -> SdkResult<()> {
    unsupported()
  }

  async fn close(&self) -> SdkResult<()> {
    Ok(())
  }
}
