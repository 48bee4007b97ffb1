//! AWS Signature Version 4 for S3-compatible GET requests.
//!
//! Only what object retrieval needs: an empty payload and the three
//! signed headers `host`, `x-amz-content-sha256` and `x-amz-date`.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::{Digest, Sha256};

use crate::ports::StorageError;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";
const SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";

/// Headers to attach to a signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub authorization: String,
    pub amz_date: String,
    pub content_sha256: String,
}

/// Signs requests with a static access key pair.
#[derive(Clone)]
pub struct SigV4Signer {
    access_key_id: String,
    secret_access_key: Secret<String>,
    region: String,
}

impl std::fmt::Debug for SigV4Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigV4Signer")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("region", &self.region)
            .finish()
    }
}

impl SigV4Signer {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: Secret<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key,
            region: region.into(),
        }
    }

    /// Signs a GET of `path` (already URI-encoded) on `host` at `now`.
    pub fn sign_get(
        &self,
        host: &str,
        path: &str,
        now: DateTime<Utc>,
    ) -> Result<SignedHeaders, StorageError> {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();
        let content_sha256 = hex::encode(Sha256::digest(b""));

        let canonical_request = format!(
            "GET\n{path}\n\nhost:{host}\nx-amz-content-sha256:{content_sha256}\nx-amz-date:{amz_date}\n\n{SIGNED_HEADERS}\n{content_sha256}"
        );

        let scope = format!("{}/{}/{}/aws4_request", date, self.region, SERVICE);
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let secret = format!("AWS4{}", self.secret_access_key.expose_secret());
        let k_date = hmac_sha256(secret.as_bytes(), &date)?;
        let k_region = hmac_sha256(&k_date, &self.region)?;
        let k_service = hmac_sha256(&k_region, SERVICE)?;
        let k_signing = hmac_sha256(&k_service, "aws4_request")?;
        let signature = hex::encode(hmac_sha256(&k_signing, &string_to_sign)?);

        Ok(SignedHeaders {
            authorization: format!(
                "{ALGORITHM} Credential={}/{scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
                self.access_key_id
            ),
            amz_date,
            content_sha256,
        })
    }
}

fn hmac_sha256(key: &[u8], data: &str) -> Result<Vec<u8>, StorageError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| StorageError::InvalidConfig(format!("signing key rejected: {}", e)))?;
    mac.update(data.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// URI-encodes an object path, keeping `/` separators.
pub fn encode_path(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn signer() -> SigV4Signer {
        SigV4Signer::new(
            "AKIDEXAMPLE",
            Secret::new("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string()),
            "fra1",
        )
    }

    #[test]
    fn signature_is_deterministic_for_fixed_inputs() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let headers = signer()
            .sign_get(
                "fra1.digitaloceanspaces.com",
                "/biegacz/halfmarathon_model.json",
                now,
            )
            .unwrap();

        assert_eq!(headers.amz_date, "20240501T120000Z");
        assert_eq!(
            headers.content_sha256,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            headers.authorization,
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240501/fra1/s3/aws4_request, \
             SignedHeaders=host;x-amz-content-sha256;x-amz-date, \
             Signature=5787a163adbf13ae6c91eea03c79a4ff665502601897e4f81438634b3db08d67"
        );
    }

    #[test]
    fn signature_changes_with_time() {
        let a = signer()
            .sign_get("h", "/b/k", Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
            .unwrap();
        let b = signer()
            .sign_get("h", "/b/k", Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 1).unwrap())
            .unwrap();
        assert_ne!(a.authorization, b.authorization);
    }

    #[test]
    fn debug_redacts_secret() {
        let debug = format!("{:?}", signer());
        assert!(!debug.contains("EXAMPLEKEY"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn encode_path_escapes_reserved_bytes() {
        assert_eq!(encode_path("/biegacz/model v1.json"), "/biegacz/model%20v1.json");
        assert_eq!(encode_path("/b/ł.json"), "/b/%C5%82.json");
        assert_eq!(encode_path("/b/a-b_c~d.json"), "/b/a-b_c~d.json");
    }
}
