//! One-time-passcode issue and verification.
//!
//! A ticket is a random 128-bit identifier cached per email address; the
//! 6-digit code is an HOTP-style derivation — HMAC-SHA256 of the identifier
//! under the shared secret, dynamically truncated modulo 10^6 — so the
//! service stores no codes, only tickets. Issuing replaces any live ticket
//! for that address.
//!
//! A successful verification does NOT consume the ticket: repeat
//! submissions inside the TTL keep succeeding. See DESIGN.md before
//! changing this to single-use.

use anyhow::Context as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::domain::repository::KvCache;
use crate::error::AccountServiceError;

/// Default ticket lifetime in seconds.
pub const OTP_TTL_SECS: u64 = 600;

fn otp_key(email: &str) -> String {
    format!("verification:otp:{email}")
}

/// Derive the 6-digit code for a ticket under the shared secret.
fn derive_code(secret: &[u8], ticket: u128) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).expect("hmac accepts any key length");
    mac.update(&ticket.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    // RFC 4226 dynamic truncation over the wider digest.
    let offset = (digest[digest.len() - 1] & 0xf) as usize;
    let binary = u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);

    format!("{:06}", binary % 1_000_000)
}

/// Verification outcome. `Expired` is distinguished so callers can trigger
/// a resend instead of telling the user their code was wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpOutcome {
    Valid,
    Invalid,
    Expired,
}

#[derive(Clone)]
pub struct OtpService<C: KvCache> {
    cache: C,
    secret: Vec<u8>,
    ttl_secs: u64,
}

impl<C: KvCache> OtpService<C> {
    pub fn new(cache: C, secret: impl Into<Vec<u8>>, ttl_secs: u64) -> Self {
        Self {
            cache,
            secret: secret.into(),
            ttl_secs,
        }
    }

    /// Mint a fresh ticket for `email`, cache it, and return the code to
    /// dispatch. Any previous ticket for the address is silently replaced.
    pub async fn issue(&self, email: &str) -> Result<String, AccountServiceError> {
        let ticket = Uuid::new_v4().as_u128();
        let code = derive_code(&self.secret, ticket);
        self.cache
            .set_ex(&otp_key(email), &ticket.to_string(), self.ttl_secs)
            .await?;
        Ok(code)
    }

    pub async fn verify(&self, email: &str, code: &str) -> Result<OtpOutcome, AccountServiceError> {
        let Some(stored) = self.cache.get(&otp_key(email)).await? else {
            return Ok(OtpOutcome::Expired);
        };

        let ticket: u128 = stored
            .parse()
            .context("corrupt otp ticket in cache")
            .map_err(AccountServiceError::Internal)?;

        if derive_code(&self.secret, ticket) == code {
            Ok(OtpOutcome::Valid)
        } else {
            Ok(OtpOutcome::Invalid)
        }
    }
}
