use serde_json::Value;
use tauri::{command, AppHandle, Runtime};

use crate::router::{MethodCall, MethodResult};
use crate::{Error, PurchasesExt, Result};

/// Single entry point for every Purchases method.
#[command]
pub(crate) async fn invoke<R: Runtime>(app: AppHandle<R>, payload: MethodCall) -> Result<Value> {
  let method = payload.method.clone();
  match app.purchases().handle(payload).await {
    MethodResult::Success(value) => Ok(value),
    MethodResult::Error(error) => Err(Error::Purchases(error)),
    MethodResult::NotImplemented => Err(Error::NotImplemented(method)),
    MethodResult::NoReply => Ok(Value::Null),
  }
}
