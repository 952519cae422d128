//! Remote-access shim.
//!
//! Every backend call goes through [`Remote::call`], which turns transport
//! errors, non-2xx statuses and unparseable bodies into a [`RemoteFailure`]
//! and announces the fallback to the user. Callers never see a panic or a
//! propagated crash from here; they decide how to degrade.

pub mod protocol;
mod transport;

use thiserror::Error;
use tracing::warn;

use crate::notice::Notifier;
use crate::remote::protocol::Endpoint;

pub use transport::{HttpTransport, Transport};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RemoteFailure {
    #[error("Server error: {status}")]
    Status { status: u16, body: Option<String> },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    Malformed(String),
}

pub struct Remote<T> {
    transport: T,
}

impl<T: Transport> Remote<T> {
    pub fn new(transport: T) -> Self {
        Remote { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Call a typed endpoint. Failures are logged and announced through
    /// `notifier` before being returned.
    pub async fn call<E: Endpoint>(
        &self,
        endpoint: &E,
        notifier: &dyn Notifier,
    ) -> Result<E::Response, RemoteFailure> {
        let result = self.call_quiet(endpoint).await;

        if let Err(failure) = &result {
            let request_method = endpoint.method().as_str();
            warn!(method = request_method, path = %endpoint.path(), %failure, "Backend call failed");
            notifier.notify(&self.failure_message(failure));
        }

        result
    }

    async fn call_quiet<E: Endpoint>(&self, endpoint: &E) -> Result<E::Response, RemoteFailure> {
        let request = endpoint
            .request()
            .map_err(|e| RemoteFailure::Malformed(e.to_string()))?;

        let value = self.transport.send(&request).await?;

        serde_json::from_value(value).map_err(|e| RemoteFailure::Malformed(e.to_string()))
    }

    fn failure_message(&self, failure: &RemoteFailure) -> String {
        match failure {
            RemoteFailure::Status { status, .. } => {
                format!("Server error: {status}. Using local fallback.")
            }
            RemoteFailure::Network(reason) => format!(
                "Network error contacting API ({}). Using local fallback. ({reason})",
                self.transport.base_url()
            ),
            RemoteFailure::Malformed(reason) => {
                format!("Unexpected response from API ({reason}). Using local fallback.")
            }
        }
    }
}
