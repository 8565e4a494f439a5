use serde::{ser::Serializer, Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("{}", .0.message)]
  Purchases(ErrorResponse),
  #[error("method `{0}` is not implemented")]
  NotImplemented(String),
  #[cfg(all(feature = "plugin", mobile))]
  #[error(transparent)]
  PluginInvoke(#[from] tauri::plugin::mobile::PluginInvokeError),
}

impl Serialize for Error {
  fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    match self {
      Error::Purchases(response) => response.serialize(serializer),
      other => serializer.serialize_str(other.to_string().as_ref()),
    }
  }
}

/// Error enumeration reported by the purchasing SDK.
///
/// Variant order is part of the wire contract: the error identifier sent to
/// the shell is the variant's ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PurchasesErrorCode {
  UnknownError,
  PurchaseCancelledError,
  StoreProblemError,
  PurchaseNotAllowedError,
  PurchaseInvalidError,
  ProductNotAvailableForPurchaseError,
  ProductAlreadyPurchasedError,
  ReceiptAlreadyInUseError,
  InvalidReceiptError,
  MissingReceiptFileError,
  NetworkError,
  InvalidCredentialsError,
  UnexpectedBackendResponseError,
  ReceiptInUseByOtherSubscriberError,
  InvalidAppUserIdError,
  OperationAlreadyInProgressError,
  UnknownBackendError,
}

impl PurchasesErrorCode {
  pub const ALL: [PurchasesErrorCode; 17] = [
    PurchasesErrorCode::UnknownError,
    PurchasesErrorCode::PurchaseCancelledError,
    PurchasesErrorCode::StoreProblemError,
    PurchasesErrorCode::PurchaseNotAllowedError,
    PurchasesErrorCode::PurchaseInvalidError,
    PurchasesErrorCode::ProductNotAvailableForPurchaseError,
    PurchasesErrorCode::ProductAlreadyPurchasedError,
    PurchasesErrorCode::ReceiptAlreadyInUseError,
    PurchasesErrorCode::InvalidReceiptError,
    PurchasesErrorCode::MissingReceiptFileError,
    PurchasesErrorCode::NetworkError,
    PurchasesErrorCode::InvalidCredentialsError,
    PurchasesErrorCode::UnexpectedBackendResponseError,
    PurchasesErrorCode::ReceiptInUseByOtherSubscriberError,
    PurchasesErrorCode::InvalidAppUserIdError,
    PurchasesErrorCode::OperationAlreadyInProgressError,
    PurchasesErrorCode::UnknownBackendError,
  ];

  /// Symbolic name, sent to the shell as `readable_error_code`.
  pub fn name(self) -> &'static str {
    match self {
      PurchasesErrorCode::UnknownError => "UnknownError",
      PurchasesErrorCode::PurchaseCancelledError => "PurchaseCancelledError",
      PurchasesErrorCode::StoreProblemError => "StoreProblemError",
      PurchasesErrorCode::PurchaseNotAllowedError => "PurchaseNotAllowedError",
      PurchasesErrorCode::PurchaseInvalidError => "PurchaseInvalidError",
      PurchasesErrorCode::ProductNotAvailableForPurchaseError => {
        "ProductNotAvailableForPurchaseError"
      }
      PurchasesErrorCode::ProductAlreadyPurchasedError => "ProductAlreadyPurchasedError",
      PurchasesErrorCode::ReceiptAlreadyInUseError => "ReceiptAlreadyInUseError",
      PurchasesErrorCode::InvalidReceiptError => "InvalidReceiptError",
      PurchasesErrorCode::MissingReceiptFileError => "MissingReceiptFileError",
      PurchasesErrorCode::NetworkError => "NetworkError",
      PurchasesErrorCode::InvalidCredentialsError => "InvalidCredentialsError",
      PurchasesErrorCode::UnexpectedBackendResponseError => "UnexpectedBackendResponseError",
      PurchasesErrorCode::ReceiptInUseByOtherSubscriberError => {
        "ReceiptInUseByOtherSubscriberError"
      }
      PurchasesErrorCode::InvalidAppUserIdError => "InvalidAppUserIdError",
      PurchasesErrorCode::OperationAlreadyInProgressError => "OperationAlreadyInProgressError",
      PurchasesErrorCode::UnknownBackendError => "UnknownBackendError",
    }
  }

  pub fn ordinal(self) -> usize {
    self as usize
  }

  pub fn from_name(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|code| code.name() == name)
  }
}

impl Serialize for PurchasesErrorCode {
  fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(self.name())
  }
}

impl<'de> Deserialize<'de> for PurchasesErrorCode {
  fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    let name = String::deserialize(deserializer)?;
    PurchasesErrorCode::from_name(&name)
      .ok_or_else(|| serde::de::Error::custom(format!("Invalid purchases error code: {name}")))
  }
}

/// An operational failure reported by the purchasing SDK.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct PurchasesError {
  pub code: PurchasesErrorCode,
  pub message: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub underlying_error_message: Option<String>,
  /// Set by the purchase flow when the user backed out of the store sheet.
  #[serde(default)]
  pub user_cancelled: bool,
}

impl PurchasesError {
  pub fn new(code: PurchasesErrorCode, message: impl Into<String>) -> Self {
    Self {
      code,
      message: message.into(),
      underlying_error_message: None,
      user_cancelled: false,
    }
  }

  pub fn with_underlying(mut self, underlying: impl Into<String>) -> Self {
    self.underlying_error_message = Some(underlying.into());
    self
  }

  pub fn cancelled(message: impl Into<String>) -> Self {
    Self {
      user_cancelled: true,
      ..Self::new(PurchasesErrorCode::PurchaseCancelledError, message)
    }
  }
}

/// Failure payload the native plugin sends back in place of a result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeError {
  pub code: Option<String>,
  pub message: Option<String>,
  pub underlying_error_message: Option<String>,
  pub user_cancelled: Option<bool>,
}

/// Envelope every native plugin command resolves with: `{"result": ..}` or
/// `{"error": ..}`. Resolving instead of rejecting keeps the diagnostic
/// fields that a rejection would drop.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NativeReply<T> {
  Result(T),
  Error(NativeError),
}

impl<T> NativeReply<T> {
  pub fn into_result(self) -> std::result::Result<T, PurchasesError> {
    match self {
      NativeReply::Result(value) => Ok(value),
      NativeReply::Error(error) => Err(native_error(
        error.code.as_deref(),
        error.message,
        error.underlying_error_message,
        error.user_cancelled,
      )),
    }
  }
}

/// Rebuilds an SDK error from the fields the native side reports. Unknown
/// codes become `UnknownError`; without an explicit flag, cancellation is
/// read from the code.
pub fn native_error(
  code: Option<&str>,
  message: Option<String>,
  underlying_error_message: Option<String>,
  user_cancelled: Option<bool>,
) -> PurchasesError {
  let code = code
    .and_then(PurchasesErrorCode::from_name)
    .unwrap_or(PurchasesErrorCode::UnknownError);
  PurchasesError {
    code,
    message: message.unwrap_or_else(|| code.name().to_string()),
    underlying_error_message: underlying_error_message.filter(|m| !m.is_empty()),
    user_cancelled: user_cancelled.unwrap_or(code == PurchasesErrorCode::PurchaseCancelledError),
  }
}

#[cfg(all(feature = "plugin", mobile))]
impl From<tauri::plugin::mobile::PluginInvokeError> for PurchasesError {
  fn from(error: tauri::plugin::mobile::PluginInvokeError) -> Self {
    use tauri::plugin::mobile::PluginInvokeError;

    match error {
      PluginInvokeError::InvokeRejected(rejected) => {
        native_error(rejected.code.as_deref(), rejected.message, None, None)
      }
      other => PurchasesError::new(PurchasesErrorCode::UnknownError, other.to_string()),
    }
  }
}

/// Locally raised failures that never reach the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalErrorKind {
  InvalidArguments,
  NotConfigured,
}

impl LocalErrorKind {
  fn code(self) -> &'static str {
    match self {
      LocalErrorKind::InvalidArguments => "-1",
      LocalErrorKind::NotConfigured => "-2",
    }
  }

  fn name(self) -> &'static str {
    match self {
      LocalErrorKind::InvalidArguments => "InvalidArgumentsError",
      LocalErrorKind::NotConfigured => "NotConfiguredError",
    }
  }
}

/// Diagnostic payload of an error completion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorDetails {
  pub message: String,
  pub readable_error_code: String,
  #[serde(
    rename = "underlyingErrorMessage",
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub underlying_error_message: Option<String>,
}

/// Error completion sent back to the shell: a numeric code string, the
/// message, and the details mapping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorResponse {
  pub code: String,
  pub message: String,
  pub details: ErrorDetails,
}

impl ErrorResponse {
  pub fn local(kind: LocalErrorKind, message: impl Into<String>) -> Self {
    let message = message.into();
    Self {
      code: kind.code().to_string(),
      message: message.clone(),
      details: ErrorDetails {
        message,
        readable_error_code: kind.name().to_string(),
        underlying_error_message: None,
      },
    }
  }

  pub fn invalid_arguments(method: &str, error: &serde_json::Error) -> Self {
    Self::local(
      LocalErrorKind::InvalidArguments,
      format!("Invalid arguments for `{method}`: {error}"),
    )
  }

  pub fn not_configured() -> Self {
    Self::local(
      LocalErrorKind::NotConfigured,
      "Purchases has not been configured. Call setupPurchases first.",
    )
  }
}

impl From<PurchasesError> for ErrorResponse {
  fn from(error: PurchasesError) -> Self {
    let underlying_error_message = error
      .underlying_error_message
      .filter(|message| !message.is_empty());
    Self {
      code: error.code.ordinal().to_string(),
      message: error.message.clone(),
      details: ErrorDetails {
        message: error.message,
        readable_error_code: error.code.name().to_string(),
        underlying_error_message,
      },
    }
  }
}

impl From<ErrorResponse> for Error {
  fn from(response: ErrorResponse) -> Self {
    Error::Purchases(response)
  }
}
