//! Canned MX resolvers so tests never touch live DNS.

use aegis_validate::{MxOutcome, MxResolver};

/// Answers every lookup with one fixed outcome.
#[derive(Clone, Copy)]
pub struct StaticMxResolver(pub MxOutcome);

impl StaticMxResolver {
    pub fn found() -> Self {
        Self(MxOutcome::Found)
    }

    pub fn nx_domain() -> Self {
        Self(MxOutcome::NxDomain)
    }
}

impl MxResolver for StaticMxResolver {
    async fn lookup_mx(&self, _domain: &str) -> MxOutcome {
        self.0
    }
}
