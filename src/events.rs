use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;

use crate::mappers::map_purchaser_info;
use crate::models::PurchaserInfo;
use crate::sdk::PurchaserInfoListener;

pub const PURCHASER_INFO_UPDATED: &str = "Purchases-PurchaserInfoUpdated";

/// Push channel towards the app shell. Delivery is fire-and-forget.
pub trait EventSink: Send + Sync {
  fn send_event(&self, event: &str, payload: Value);
}

#[cfg(feature = "plugin")]
impl<R: tauri::Runtime> EventSink for tauri::AppHandle<R> {
  fn send_event(&self, event: &str, payload: Value) {
    use tauri::Emitter;

    if let Err(e) = self.emit(event, payload) {
      log::warn!("failed to emit {event}: {e}");
    }
  }
}

/// Maps SDK purchaser-info pushes to events while the bridge is live.
pub struct EventForwarder {
  sink: Arc<dyn EventSink>,
  active: Arc<AtomicBool>,
}

impl EventForwarder {
  pub fn new(sink: Arc<dyn EventSink>) -> Self {
    Self {
      sink,
      active: Arc::new(AtomicBool::new(false)),
    }
  }

  /// Builds the listener handed to the SDK. It stays silent until
  /// [`EventForwarder::activate`].
  pub fn listener(&self) -> PurchaserInfoListener {
    let sink = self.sink.clone();
    let active = self.active.clone();
    Arc::new(move |info: PurchaserInfo| {
      if !active.load(Ordering::SeqCst) {
        log::debug!("dropping purchaser info update while not configured");
        return;
      }
      match serde_json::to_value(map_purchaser_info(&info)) {
        Ok(payload) => sink.send_event(PURCHASER_INFO_UPDATED, payload),
        Err(e) => log::warn!("failed to map purchaser info update: {e}"),
      }
    })
  }

  pub fn activate(&self) {
    self.active.store(true, Ordering::SeqCst);
  }

  /// Any listener already handed out becomes a no-op.
  pub fn deactivate(&self) {
    self.active.store(false, Ordering::SeqCst);
  }
}
