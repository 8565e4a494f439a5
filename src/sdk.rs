use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::PurchasesError;
use crate::models::*;

pub type SdkResult<T> = std::result::Result<T, PurchasesError>;

/// Callback the SDK invokes whenever it has fresh purchaser info.
pub type PurchaserInfoListener = Arc<dyn Fn(PurchaserInfo) + Send + Sync>;

/// The purchasing SDK as seen from the bridge.
///
/// Implementations own the SDK instance; the bridge never reaches for a
/// process-wide singleton. `add_attribution_data` and
/// `set_debug_logs_enabled` are static entry points on the SDK and must work
/// before `configure`.
#[async_trait]
pub trait PurchasesSdk: Send + Sync {
  async fn configure(&self, configuration: Configuration) -> SdkResult<()>;

  async fn set_updated_purchaser_info_listener(
    &self,
    listener: PurchaserInfoListener,
  ) -> SdkResult<()>;

  async fn set_allow_sharing_store_account(&self, allow_sharing: bool) -> SdkResult<()>;

  async fn add_attribution_data(
    &self,
    data: HashMap<String, String>,
    network: AttributionNetwork,
    network_user_id: Option<String>,
  ) -> SdkResult<()>;

  async fn get_entitlements(&self) -> SdkResult<HashMap<String, Entitlement>>;

  async fn get_subscription_skus(&self, skus: Vec<String>) -> SdkResult<Vec<SkuDetails>>;

  async fn get_non_subscription_skus(&self, skus: Vec<String>) -> SdkResult<Vec<SkuDetails>>;

  async fn make_purchase(
    &self,
    sku: String,
    sku_type: String,
    old_skus: Vec<String>,
  ) -> SdkResult<PurchaseOutcome>;

  async fn app_user_id(&self) -> SdkResult<String>;

  async fn restore_purchases(&self) -> SdkResult<PurchaserInfo>;

  async fn reset(&self) -> SdkResult<PurchaserInfo>;

  async fn identify(&self, app_user_id: String) -> SdkResult<PurchaserInfo>;

  async fn create_alias(&self, new_app_user_id: String) -> SdkResult<PurchaserInfo>;

  async fn set_debug_logs_enabled(&self, enabled: bool) -> SdkResult<()>;

  async fn get_purchaser_info(&self) -> SdkResult<PurchaserInfo>;

  async fn sync_purchases(&self) -> SdkResult<()>;

  async fn close(&self) -> SdkResult<()>;
}
