//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use yotei_domain::YoteiError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub YoteiError);

impl From<InfraError> for YoteiError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<YoteiError> for InfraError {
    fn from(value: YoteiError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoYoteiError {
    fn into_yotei(self) -> YoteiError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → YoteiError */
/* -------------------------------------------------------------------------- */

impl IntoYoteiError for HttpError {
    fn into_yotei(self) -> YoteiError {
        if self.is_timeout() {
            return YoteiError::Timeout("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return YoteiError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return YoteiError::Llm(format!("HTTP response body could not be decoded: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => YoteiError::Auth(message),
                408 => YoteiError::Timeout(message),
                429 => YoteiError::Network(message),
                400..=499 => YoteiError::InvalidInput(message),
                _ => YoteiError::Network(message),
            };
        }

        YoteiError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_yotei())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → YoteiError */
/* -------------------------------------------------------------------------- */

impl IntoYoteiError for JsonError {
    fn into_yotei(self) -> YoteiError {
        YoteiError::Llm(format!(
            "malformed JSON at line {} column {}: {self}",
            self.line(),
            self.column()
        ))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_yotei())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
