/// Account service error variants.
///
/// Business denials (wrong password, inaccessible account, expired code) are
/// not errors here — they are workflow outcomes rendered into the response
/// envelope. This type covers the failures underneath: a broken adapter, a
/// corrupt cache entry, an unusable hash.
#[derive(Debug, thiserror::Error)]
pub enum AccountServiceError {
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AccountServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Internal(_) => "INTERNAL",
        }
    }
}
