//! Bridges the Purchases in-app purchase SDK to the app shell.
//!
//! Shell calls arrive as a method name plus an argument mapping, are
//! forwarded to the SDK by [`Router`], and come back as plain records.
//! Purchaser-info pushes from the SDK are emitted as the
//! `Purchases-PurchaserInfoUpdated` event.

#[cfg(feature = "plugin")]
use std::sync::Arc;

#[cfg(feature = "plugin")]
use tauri::{
  plugin::{Builder, TauriPlugin},
  Manager, Runtime,
};

pub use error::{
  native_error, ErrorDetails, ErrorResponse, LocalErrorKind, NativeError, NativeReply,
  PurchasesError, PurchasesErrorCode,
};
pub use events::{EventForwarder, EventSink, PURCHASER_INFO_UPDATED};
pub use models::*;
pub use router::{Lifecycle, MethodCall, MethodResult, Router};
pub use sdk::{PurchaserInfoListener, PurchasesSdk, SdkResult};

#[cfg(all(feature = "plugin", desktop))]
mod desktop;
#[cfg(all(feature = "plugin", mobile))]
mod mobile;

#[cfg(feature = "plugin")]
mod commands;
mod config;
mod error;
mod events;
pub mod mappers;
mod models;
mod router;
mod sdk;

pub use config::Config;
pub use error::{Error, Result};

/// Extensions to [`tauri::App`], [`tauri::AppHandle`] and [`tauri::Window`] to access the purchases APIs.
#[cfg(feature = "plugin")]
pub trait PurchasesExt<R: Runtime> {
  fn purchases(&self) -> &Router;
}

#[cfg(feature = "plugin")]
impl<R: Runtime, T: Manager<R>> crate::PurchasesExt<R> for T {
  fn purchases(&self) -> &Router {
    self.state::<Router>().inner()
  }
}

/// Applies the static configuration from `tauri.conf.json`.
pub async fn apply_config(router: &Router, config: Config) {
  if config.debug_logs_enabled {
    if let Err(e) = router.set_debug_logs_enabled(true).await {
      log::warn!("failed to enable purchases debug logs: {}", e.message);
    }
  }
  if let Some(api_key) = config.api_key {
    if let Err(e) = router
      .setup_purchases(api_key, config.app_user_id, config.observer_mode)
      .await
    {
      log::warn!("failed to configure purchases: {}", e.message);
    }
  }
}

/// Initializes the plugin.
#[cfg(feature = "plugin")]
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<Config>> {
  Builder::<R, Option<Config>>::new("purchases")
    .invoke_handler(tauri::generate_handler![commands::invoke])
    .setup(|app, api| {
      let config = api.config().clone().unwrap_or_default();
      #[cfg(mobile)]
      let sdk = mobile::init(app, api)?;
      #[cfg(desktop)]
      let sdk = desktop::init(app, api)?;
      app.manage(Router::new(Arc::new(sdk), Arc::new(app.clone())));

      if config.api_key.is_some() || config.debug_logs_enabled {
        let app = app.clone();
        tauri::async_runtime::spawn(async move {
          apply_config(app.purchases(), config).await;
        });
      }
      Ok(())
    })
    .on_drop(|app| {
      if let Some(router) = app.try_state::<Router>() {
        tauri::async_runtime::block_on(router.teardown());
      }
    })
    .build()
}
