//! The retrying, reconnecting RPC client.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;
use tonic::Code;
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint};

use crate::error::TransportError;

/// Tuning knobs for one transport. All externally supplied (env config);
/// the defaults mirror the deployment defaults.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub max_retries: u32,
    pub backoff_base: Duration,
    /// PEM bundle for validating the server certificate. `None` = plaintext.
    pub ca_pem: Option<Vec<u8>>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base: Duration::from_millis(500),
            ca_pem: None,
        }
    }
}

/// One logical connection to a named host:port.
///
/// The channel is built lazily and rebuilt wholesale on every retry of a
/// transient failure — a full reconnect, not a resend on the same socket.
/// There is deliberately no circuit breaker: each call carries its own
/// retry budget and no backoff state is shared between calls.
pub struct RpcTransport {
    endpoint: Endpoint,
    channel: Mutex<Channel>,
    options: TransportOptions,
    reconnects: AtomicUsize,
}

impl RpcTransport {
    pub fn new(host: &str, port: u16, options: TransportOptions) -> Result<Self, TransportError> {
        let scheme = if options.ca_pem.is_some() { "https" } else { "http" };
        let url = format!("{scheme}://{host}:{port}");

        let mut endpoint = Endpoint::from_shared(url)
            .map_err(|e| TransportError::InvalidEndpoint(e.to_string()))?;

        if let Some(pem) = &options.ca_pem {
            let tls = ClientTlsConfig::new().ca_certificate(Certificate::from_pem(pem));
            endpoint = endpoint
                .tls_config(tls)
                .map_err(|e| TransportError::InvalidEndpoint(e.to_string()))?;
        }

        let channel = endpoint.connect_lazy();

        Ok(Self {
            endpoint,
            channel: Mutex::new(channel),
            options,
            reconnects: AtomicUsize::new(0),
        })
    }

    /// Current channel handle; cheap to clone per call.
    pub async fn channel(&self) -> Channel {
        self.channel.lock().await.clone()
    }

    /// How many times the channel has been rebuilt since construction.
    pub fn reconnect_count(&self) -> usize {
        self.reconnects.load(Ordering::Relaxed)
    }

    async fn reconnect(&self) {
        let mut channel = self.channel.lock().await;
        *channel = self.endpoint.connect_lazy();
        self.reconnects.fetch_add(1, Ordering::Relaxed);
    }

    /// Run one RPC through the classify/retry/reconnect loop.
    ///
    /// `op` receives a fresh channel clone per attempt and performs the
    /// actual call. Retryable statuses (UNAVAILABLE, INTERNAL,
    /// DEADLINE_EXCEEDED) sleep `backoff_base * 2^attempt` plus up to 100 ms
    /// of jitter, rebuild the channel, and try again while the budget lasts.
    /// Everything else maps immediately to a [`TransportError`].
    pub async fn call<T, F, Fut>(&self, method: &str, mut op: F) -> Result<T, TransportError>
    where
        F: FnMut(Channel) -> Fut,
        Fut: Future<Output = Result<T, tonic::Status>>,
    {
        let max_retries = self.options.max_retries.max(1);

        for attempt in 0..max_retries {
            let channel = self.channel().await;

            let status = match op(channel).await {
                Ok(response) => return Ok(response),
                Err(status) => status,
            };

            match classify(status.code()) {
                Classified::Retryable(terminal) => {
                    if attempt + 1 < max_retries {
                        let backoff = self
                            .options
                            .backoff_base
                            .mul_f64(f64::powi(2.0, attempt as i32));
                        let jitter =
                            Duration::from_secs_f64(rand::rng().random_range(0.0..0.1));
                        tracing::warn!(
                            method,
                            code = %status.code(),
                            attempt,
                            backoff_ms = backoff.as_millis() as u64,
                            "retryable rpc failure, reconnecting"
                        );
                        tokio::time::sleep(backoff + jitter).await;
                        self.reconnect().await;
                    } else {
                        tracing::error!(method, code = %status.code(), "retry budget exhausted");
                        return Err(terminal);
                    }
                }
                Classified::Terminal(error) => {
                    tracing::warn!(method, code = %status.code(), kind = error.kind(), "rpc failed");
                    return Err(error);
                }
            }
        }

        // Unreachable: the loop always returns on its final attempt.
        Err(TransportError::Internal)
    }
}

enum Classified {
    /// Eligible for backoff-and-reconnect; carries the terminal error to
    /// report once the budget runs out.
    Retryable(TransportError),
    Terminal(TransportError),
}

fn classify(code: Code) -> Classified {
    match code {
        Code::Unavailable => Classified::Retryable(TransportError::Unavailable),
        Code::Internal => Classified::Retryable(TransportError::RemoteInternal),
        Code::DeadlineExceeded => Classified::Retryable(TransportError::DeadlineExceeded),
        Code::Unauthenticated => Classified::Terminal(TransportError::Unauthenticated),
        Code::InvalidArgument => Classified::Terminal(TransportError::MalformedInput),
        Code::Unimplemented => Classified::Terminal(TransportError::UnknownMethod),
        Code::ResourceExhausted => Classified::Terminal(TransportError::PayloadTooLarge),
        _ => Classified::Terminal(TransportError::Internal),
    }
}
