//! Signed URLs for the local backend.
//!
//! Query: `expires={unix secs}&disposition=..&type=..&signature=hex(HMAC-SHA256(secret, payload))`
//! where payload = `key \n expires \n disposition \n type`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::traits::{SignedUrlOptions, StorageError, StorageResult};

type HmacSha256 = Hmac<Sha256>;

/// Parameters carried by a signed local URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedParams {
    pub expires: u64,
    pub disposition: String,
    pub content_type: String,
    pub signature: String,
}

#[derive(Clone)]
pub struct UrlSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner").finish_non_exhaustive()
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

impl UrlSigner {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Signer with a random per-process secret; its URLs stop verifying after a restart.
    pub fn ephemeral() -> Self {
        Self::new(rand::random::<[u8; 32]>().to_vec())
    }

    fn mac(&self, key: &str, expires: u64, disposition: &str, content_type: &str) -> StorageResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| StorageError::SigningFailed(e.to_string()))?;
        mac.update(key.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        mac.update(b"\n");
        mac.update(disposition.as_bytes());
        mac.update(b"\n");
        mac.update(content_type.as_bytes());
        Ok(mac)
    }

    /// Sign `key` for `expires_in` from now.
    pub fn sign(
        &self,
        key: &str,
        expires_in: Duration,
        options: &SignedUrlOptions,
    ) -> StorageResult<SignedParams> {
        let expires = now_secs().saturating_add(expires_in.as_secs());
        let tag = self
            .mac(key, expires, &options.content_disposition, &options.content_type)?
            .finalize()
            .into_bytes();

        Ok(SignedParams {
            expires,
            disposition: options.content_disposition.clone(),
            content_type: options.content_type.clone(),
            signature: hex::encode(tag),
        })
    }

    /// Check signature and expiry.
    pub fn verify(&self, key: &str, params: &SignedParams) -> StorageResult<()> {
        let tag = hex::decode(&params.signature)
            .map_err(|_| StorageError::SigningFailed("Malformed signature".to_string()))?;
        self.mac(key, params.expires, &params.disposition, &params.content_type)?
            .verify_slice(&tag)
            .map_err(|_| StorageError::SigningFailed("Signature mismatch".to_string()))?;

        if now_secs() > params.expires {
            return Err(StorageError::SigningFailed("Signed URL has expired".to_string()));
        }
        Ok(())
    }
}

impl SignedParams {
    pub fn to_query(&self) -> String {
        format!(
            "expires={}&disposition={}&type={}&signature={}",
            self.expires,
            urlencoding::encode(&self.disposition),
            urlencoding::encode(&self.content_type),
            self.signature
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_then_verify() {
        let signer = UrlSigner::new("secret");
        let params = signer
            .sign("videos/1-a.mp4", Duration::from_secs(60), &SignedUrlOptions::inline_video())
            .unwrap();
        assert!(signer.verify("videos/1-a.mp4", &params).is_ok());
        assert!(params.to_query().contains("type=video%2Fmp4"));
    }

    #[test]
    fn test_signature_is_bound_to_key_and_hints() {
        let signer = UrlSigner::new("secret");
        let params = signer
            .sign("videos/1-a.mp4", Duration::from_secs(60), &SignedUrlOptions::inline_video())
            .unwrap();
        assert!(signer.verify("videos/2-b.mp4", &params).is_err());

        let mut tampered = params.clone();
        tampered.disposition = "attachment".to_string();
        assert!(signer.verify("videos/1-a.mp4", &tampered).is_err());

        let other = UrlSigner::new("other-secret");
        assert!(other.verify("videos/1-a.mp4", &params).is_err());
    }

    #[test]
    fn test_expired_signature_rejected() {
        let signer = UrlSigner::new("secret");
        let mut params = signer
            .sign("k", Duration::from_secs(0), &SignedUrlOptions::inline_video())
            .unwrap();
        params.expires = 1;
        // Re-sign with the past expiry so only the expiry check can fail.
        let tag = signer
            .mac("k", 1, &params.disposition, &params.content_type)
            .unwrap()
            .finalize()
            .into_bytes();
        params.signature = hex::encode(tag);
        let err = signer.verify("k", &params).unwrap_err();
        assert!(err.to_string().contains("expired"));
    }
}
