/*
[INPUT]:  Session user claims, Ed25519 signer, token lifetime
[OUTPUT]: Compact EdDSA-signed JWT session tokens and verified claims
[POS]:    Auth layer - session token issuance and verification
[UPDATE]: When token claims or signing algorithm change
*/

use base64::{
    Engine as _,
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::http::{CarpoolError, Result};
use crate::types::SessionUser;

use super::Ed25519Signer;

/// Seven days, matching the `auth-token` cookie lifetime
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

const ALGORITHM: &str = "EdDSA";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kid: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    user: SessionUser,
    iat: i64,
    exp: i64,
}

/// Issues and verifies session tokens with a single signing key
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    signer: Ed25519Signer,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(signer: Ed25519Signer, ttl_seconds: u64) -> Self {
        Self {
            signer,
            ttl: Duration::seconds(ttl_seconds as i64),
        }
    }

    pub fn key_id(&self) -> String {
        self.signer.key_id()
    }

    /// Sign a token for `user`, valid from now for the configured lifetime
    pub fn issue(&self, user: &SessionUser) -> Result<(String, DateTime<Utc>)> {
        self.issue_at(user, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        user: &SessionUser,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>)> {
        let expires_at = now + self.ttl;
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: "JWT".to_string(),
            kid: Some(self.signer.key_id()),
        };
        let claims = Claims {
            user: user.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?)
        );
        let signature = self.signer.sign(signing_input.as_bytes());
        let token = format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature));
        Ok((token, expires_at))
    }

    /// Check signature then expiry, returning the session claims
    pub fn verify(&self, token: &str) -> Result<SessionUser> {
        self.verify_at(token, Utc::now())
    }

    pub(crate) fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionUser> {
        let token = token.trim();
        let mut parts = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(CarpoolError::MalformedToken(
                "expected three dot-separated segments".to_string(),
            ));
        };

        let header: Header = serde_json::from_slice(&decode_segment(header_b64, "header")?)
            .map_err(|e| CarpoolError::MalformedToken(format!("header: {e}")))?;
        if header.alg != ALGORITHM {
            return Err(CarpoolError::MalformedToken(format!(
                "unsupported algorithm {}",
                header.alg
            )));
        }

        let signature = decode_segment(signature_b64, "signature")?;
        let signing_input = &token[..header_b64.len() + 1 + claims_b64.len()];
        if !self.signer.verify(signing_input.as_bytes(), &signature) {
            return Err(CarpoolError::InvalidSignature);
        }

        let claims: Claims = serde_json::from_slice(&decode_segment(claims_b64, "claims")?)
            .map_err(|e| CarpoolError::MalformedToken(format!("claims: {e}")))?;
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or_else(|| CarpoolError::MalformedToken("exp out of range".to_string()))?;
        if now >= expires_at {
            return Err(CarpoolError::TokenExpired);
        }

        Ok(claims.user)
    }
}

fn decode_segment(segment: &str, what: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .or_else(|_| URL_SAFE.decode(segment))
        .map_err(|e| CarpoolError::MalformedToken(format!("invalid {what} base64: {e}")))
}
