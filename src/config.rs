use serde::Deserialize;

/// `plugins.purchases` in `tauri.conf.json`.
///
/// With an `apiKey` present the SDK is configured while the plugin sets up,
/// the same way a `setupPurchases` call would.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
  pub api_key: Option<String>,
  pub app_user_id: Option<String>,
  pub observer_mode: Option<bool>,
  #[serde(default)]
  pub debug_logs_enabled: bool,
}
