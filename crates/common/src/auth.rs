//! Bearer token issuance and verification.
//!
//! Tenant and admin sessions use HMAC-signed bearer tokens. A tenant token
//! keeps the historical wire shape (`company_` prefix with the tenant id
//! embedded) and appends a signature: `company_{id}.{hex_mac}`. Tokens carry
//! no expiry.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

/// Prefix shared by all tenant bearer tokens.
const TENANT_PREFIX: &str = "company_";

/// Payload of an admin bearer token.
const ADMIN_PAYLOAD: &str = "admin";

/// The principal a verified bearer token resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScope {
    /// Administrative access.
    Admin,
    /// Access scoped to one tenant, identified by its company id.
    Tenant(String),
}

/// Issues and verifies bearer tokens.
pub trait Authenticator: Send + Sync {
    /// Issue a bearer token for the given scope.
    fn issue(&self, scope: &AuthScope) -> AppResult<String>;

    /// Verify a bearer token, returning the scope it grants.
    fn verify(&self, token: &str) -> AppResult<AuthScope>;
}

/// HMAC-SHA256 authenticator over a shared secret.
#[derive(Clone)]
pub struct HmacAuthenticator {
    key: Vec<u8>,
}

impl std::fmt::Debug for HmacAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacAuthenticator").finish_non_exhaustive()
    }
}

impl HmacAuthenticator {
    /// Create an authenticator from the configured secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
        }
    }

    fn mac(&self, payload: &str) -> AppResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| AppError::Internal(format!("Invalid HMAC key: {e}")))?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }

    fn payload_for(scope: &AuthScope) -> AppResult<String> {
        match scope {
            AuthScope::Admin => Ok(ADMIN_PAYLOAD.to_string()),
            AuthScope::Tenant(company_id) => {
                // The payload/signature separator must not occur in the id.
                if company_id.is_empty() || company_id.contains('.') {
                    return Err(AppError::BadRequest("Invalid company id".to_string()));
                }
                Ok(format!("{TENANT_PREFIX}{company_id}"))
            }
        }
    }
}

impl Authenticator for HmacAuthenticator {
    fn issue(&self, scope: &AuthScope) -> AppResult<String> {
        let payload = Self::payload_for(scope)?;
        let mac = self.mac(&payload)?.finalize();
        Ok(format!("{payload}.{}", hex::encode(mac.into_bytes())))
    }

    fn verify(&self, token: &str) -> AppResult<AuthScope> {
        let (payload, signature) = token.split_once('.').ok_or(AppError::Unauthorized)?;
        let signature = hex::decode(signature).map_err(|_| AppError::Unauthorized)?;

        self.mac(payload)?
            .verify_slice(&signature)
            .map_err(|_| AppError::Unauthorized)?;

        if payload == ADMIN_PAYLOAD {
            return Ok(AuthScope::Admin);
        }

        match payload.strip_prefix(TENANT_PREFIX) {
            Some(company_id) if !company_id.is_empty() => {
                Ok(AuthScope::Tenant(company_id.to_string()))
            }
            _ => Err(AppError::Unauthorized),
        }
    }
}
