use std::collections::HashMap;

use async_trait::async_trait;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tauri::{
  ipc::{Channel, InvokeResponseBody},
  plugin::{PluginApi, PluginHandle},
  AppHandle, Runtime,
};

use crate::error::{NativeReply, PurchasesError, PurchasesErrorCode};
use crate::models::*;
use crate::sdk::{PurchaserInfoListener, PurchasesSdk, SdkResult};

#[cfg(target_os = "android")]
const PLUGIN_IDENTIFIER: &str = "app.tauri.purchases";

#[cfg(target_os = "ios")]
tauri::ios_plugin_binding!(init_plugin_purchases);

// initializes the Kotlin or Swift plugin classes
pub fn init<R: Runtime, C: DeserializeOwned>(
  _app: &AppHandle<R>,
  api: PluginApi<R, C>,
) -> crate::Result<NativePurchases<R>> {
  #[cfg(target_os = "android")]
  let handle = api.register_android_plugin(PLUGIN_IDENTIFIER, "PurchasesPlugin")?;
  #[cfg(target_os = "ios")]
  let handle = api.register_ios_plugin(init_plugin_purchases)?;

  Ok(NativePurchases(handle))
}

/// The native purchasing SDK, reached through the Kotlin or Swift plugin.
pub struct NativePurchases<R: Runtime>(PluginHandle<R>);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AllowSharingArgs {
  allow_sharing: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AttributionArgs {
  data: HashMap<String, String>,
  network: AttributionNetwork,
  network_user_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SkusArgs {
  skus: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MakePurchaseArgs {
  sku: String,
  sku_type: String,
  old_skus: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AppUserIdArgs {
  app_user_id: String,
}

#[derive(Serialize)]
struct DebugLogsArgs {
  enabled: bool,
}

#[derive(Serialize)]
struct ListenerArgs {
  handler: Channel,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppUserIdResponse {
  app_user_id: String,
}

#[derive(Deserialize)]
struct EntitlementsResponse {
  entitlements: HashMap<String, Entitlement>,
}

#[derive(Deserialize)]
struct SkusResponse {
  skus: Vec<SkuDetails>,
}

impl<R: Runtime> NativePurchases<R> {
  /// Native calls block until the store answers, so they run off the async
  /// executor. SDK failures arrive as a resolved `NativeReply::Error`;
  /// rejections only come from the plugin bridge itself.
  async fn run<T, P>(&self, command: &'static str, payload: P) -> SdkResult<T>
  where
    T: DeserializeOwned + Send + 'static,
    P: Serialize + Send + 'static,
  {
    let handle = self.0.clone();
    let reply: NativeReply<T> = tauri::async_runtime::spawn_blocking(move || {
      handle.run_mobile_plugin(command, payload)
    })
    .await
    .map_err(|e| PurchasesError::new(PurchasesErrorCode::UnknownError, e.to_string()))?
    .map_err(PurchasesError::from)?;
    reply.into_result()
  }

  async fn run_unit<P>(&self, command: &'static str, payload: P) -> SdkResult<()>
  where
    P: Serialize + Send + 'static,
  {
    self.run::<IgnoredAny, P>(command, payload).await.map(|_| ())
  }
}

#[async_trait]
impl<R: Runtime> PurchasesSdk for NativePurchases<R> {
  async fn configure(&self, configuration: Configuration) -> SdkResult<()> {
    self.run_unit("configure", configuration).await
  }

  async fn set_updated_purchaser_info_listener(
    &self,
    listener: PurchaserInfoListener,
  ) -> SdkResult<()> {
    let handler = Channel::new(move |body| {
      if let InvokeResponseBody::Json(json) = body {
        match serde_json::from_str::<PurchaserInfo>(&json) {
          Ok(info) => listener(info),
          Err(e) => log::warn!("malformed purchaser info update: {e}"),
        }
      }
      Ok(())
    });
    self
      .run_unit("setUpdatedPurchaserInfoListener", ListenerArgs { handler })
      .await
  }

  async fn set_allow_sharing_store_account(&self, allow_sharing: bool) -> SdkResult<()> {
    self
      .run_unit("setAllowSharingStoreAccount", AllowSharingArgs { allow_sharing })
      .await
  }

  async fn add_attribution_data(
    &self,
    data: HashMap<String, String>,
    network: AttributionNetwork,
    network_user_id: Option<String>,
  ) -> SdkResult<()> {
    self
      .run_unit(
        "addAttributionData",
        AttributionArgs {
          data,
          network,
          network_user_id,
        },
      )
      .await
  }

  async fn get_entitlements(&self) -> SdkResult<HashMap<String, Entitlement>> {
    let response: EntitlementsResponse = self.run("getEntitlements", ()).await?;
    Ok(response.entitlements)
  }

  async fn get_subscription_skus(&self, skus: Vec<String>) -> SdkResult<Vec<SkuDetails>> {
    let response: SkusResponse = self.run("getSubscriptionSkus", SkusArgs { skus }).await?;
    Ok(response.skus)
  }

  async fn get_non_subscription_skus(&self, skus: Vec<String>) -> SdkResult<Vec<SkuDetails>> {
    let response: SkusResponse = self
      .run("getNonSubscriptionSkus", SkusArgs { skus })
      .await?;
    Ok(response.skus)
  }

  async fn make_purchase(
    &self,
    sku: String,
    sku_type: String,
    old_skus: Vec<String>,
  ) -> SdkResult<PurchaseOutcome> {
    self
      .run(
        "makePurchase",
        MakePurchaseArgs {
          sku,
          sku_type,
          old_skus,
        },
      )
      .await
  }

  async fn app_user_id(&self) -> SdkResult<String> {
    let response: AppUserIdResponse = self.run("getAppUserId", ()).await?;
    Ok(response.app_user_id)
  }

  async fn restore_purchases(&self) -> SdkResult<PurchaserInfo> {
    self.run("restorePurchases", ()).await
  }

  async fn reset(&self) -> SdkResult<PurchaserInfo> {
    self.run("reset", ()).await
  }

  async fn identify(&self, app_user_id: String) -> SdkResult<PurchaserInfo> {
    self.run("identify", AppUserIdArgs { app_user_id }).await
  }

  async fn create_alias(&self, new_app_user_id: String) -> SdkResult<PurchaserInfo> {
    self
      .run(
        "createAlias",
        AppUserIdArgs {
          app_user_id: new_app_user_id,
        },
      )
      .await
  }

  async fn set_debug_logs_enabled(&self, enabled: bool) -> SdkResult<()> {
    self.run_unit("setDebugLogsEnabled", DebugLogsArgs { enabled }).await
  }

  async fn get_purchaser_info(&self) -> SdkResult<PurchaserInfo> {
    self.run("getPurchaserInfo", ()).await
  }

  async fn sync_purchases(&self) -> SdkResult<()> {
    self.run_unit("syncPurchases", ()).await
  }

  async fn close(&self) -> SdkResult<()> {
    self.run_unit("close", ()).await
  }
}
