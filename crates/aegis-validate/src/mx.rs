//! MX-record resolution port used by the email verifier.

#![allow(async_fn_in_trait)]

use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;

/// Result of resolving a domain's MX records. Resolver-level failures fold
/// into [`MxOutcome::NoRecords`]: an unverifiable address is a data problem
/// for the caller either way, never a transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MxOutcome {
    /// At least one MX record exists.
    Found,
    /// The domain exists but advertises no mail exchanger, or resolution
    /// failed outright.
    NoRecords,
    /// The domain itself does not exist.
    NxDomain,
}

pub trait MxResolver: Send + Sync {
    async fn lookup_mx(&self, domain: &str) -> MxOutcome;
}

/// Live DNS adapter over the system resolver configuration.
#[derive(Clone)]
pub struct DnsMxResolver {
    resolver: TokioAsyncResolver,
}

impl DnsMxResolver {
    pub fn from_system_conf() -> Result<Self, ResolveError> {
        Ok(Self {
            resolver: TokioAsyncResolver::tokio_from_system_conf()?,
        })
    }
}

impl MxResolver for DnsMxResolver {
    async fn lookup_mx(&self, domain: &str) -> MxOutcome {
        match self.resolver.mx_lookup(domain).await {
            Ok(lookup) => {
                if lookup.iter().next().is_some() {
                    MxOutcome::Found
                } else {
                    MxOutcome::NoRecords
                }
            }
            Err(err) => classify_resolve_error(&err),
        }
    }
}

fn classify_resolve_error(err: &ResolveError) -> MxOutcome {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. }
            if *response_code == ResponseCode::NXDomain =>
        {
            MxOutcome::NxDomain
        }
        ResolveErrorKind::NoRecordsFound { .. } => MxOutcome::NoRecords,
        _ => {
            tracing::debug!(error = %err, "mx lookup failed");
            MxOutcome::NoRecords
        }
    }
}
