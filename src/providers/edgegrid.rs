//! EdgeGrid request signing (EG1-HMAC-SHA256)
//!
//! Every Akamai OPEN API request carries an `Authorization` header derived
//! from the client credentials, a timestamp and a one-time nonce.
//!
//! Only bodiless requests are signed here; the content hash field is always
//! empty and no headers are canonicalized.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::models::EdgeRc;

type HmacSha256 = Hmac<Sha256>;

/// Signing algorithm identifier
const ALGORITHM: &str = "EG1-HMAC-SHA256";

/// Signs requests for one set of credentials
#[derive(Debug, Clone)]
pub struct EdgeGridSigner {
    credentials: EdgeRc,
}

impl EdgeGridSigner {
    pub fn new(credentials: EdgeRc) -> Self {
        Self { credentials }
    }

    pub fn credentials(&self) -> &EdgeRc {
        &self.credentials
    }

    /// Build the `Authorization` header value with a fresh timestamp and nonce
    pub fn sign(&self, method: &str, scheme: &str, host: &str, path_and_query: &str) -> String {
        let timestamp = format_timestamp(Utc::now());
        let nonce = Uuid::new_v4().to_string();
        self.sign_with(method, scheme, host, path_and_query, &timestamp, &nonce)
    }

    /// Deterministic signing for a given timestamp and nonce
    pub fn sign_with(
        &self,
        method: &str,
        scheme: &str,
        host: &str,
        path_and_query: &str,
        timestamp: &str,
        nonce: &str,
    ) -> String {
        let auth_prefix = format!(
            "{} client_token={};access_token={};timestamp={};nonce={};",
            ALGORITHM, self.credentials.client_token, self.credentials.access_token, timestamp, nonce
        );

        let data_to_sign = [
            method.to_ascii_uppercase().as_str(),
            scheme,
            host,
            path_and_query,
            "", // canonicalized headers
            "", // content hash (GET)
            auth_prefix.as_str(),
        ]
        .join("\t");

        let signing_key = hmac_base64(self.credentials.client_secret.as_bytes(), timestamp);
        let signature = hmac_base64(signing_key.as_bytes(), &data_to_sign);

        format!("{}signature={}", auth_prefix, signature)
    }
}

/// `YYYYMMDDTHH:MM:SS+0000`
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H:%M:%S+0000").to_string()
}

fn hmac_base64(key: &[u8], data: &str) -> String {
    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn signer() -> EdgeGridSigner {
        EdgeGridSigner::new(EdgeRc {
            host: "akab-abc.luna.akamaiapis.net".to_string(),
            client_token: "akab-client".to_string(),
            client_secret: "secret".to_string(),
            access_token: "akab-access".to_string(),
            max_body: 131_072,
        })
    }

    #[test]
    fn test_timestamp_format() {
        let ts = Utc.with_ymd_and_hms(2021, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(format_timestamp(ts), "20210305T07:08:09+0000");
    }

    #[test]
    fn test_header_layout() {
        let header = signer().sign_with(
            "get",
            "https",
            "akab-abc.luna.akamaiapis.net",
            "/appsec/v1/configs?accountSwitchKey=1-ABC%3A1-2RBL",
            "20210305T07:08:09+0000",
            "nonce-1",
        );
        assert!(header.starts_with(
            "EG1-HMAC-SHA256 client_token=akab-client;access_token=akab-access;timestamp=20210305T07:08:09+0000;nonce=nonce-1;signature="
        ));
        let signature = header.rsplit("signature=").next().unwrap();
        // base64 of a 32-byte digest
        assert_eq!(signature.len(), 44);
        assert!(BASE64.decode(signature).is_ok());
    }

    #[test]
    fn test_signature_is_deterministic() {
        let s = signer();
        let a = s.sign_with("GET", "https", "h", "/p?q=1", "20210305T07:08:09+0000", "n");
        let b = s.sign_with("GET", "https", "h", "/p?q=1", "20210305T07:08:09+0000", "n");
        assert_eq!(a, b);
    }

    #[test]
    fn test_signature_covers_path() {
        let s = signer();
        let a = s.sign_with("GET", "https", "h", "/p?q=1", "20210305T07:08:09+0000", "n");
        let b = s.sign_with("GET", "https", "h", "/p?q=2", "20210305T07:08:09+0000", "n");
        assert_ne!(a, b);
    }

    #[test]
    fn test_signature_matches_manual_computation() {
        let s = signer();
        let ts = "20210305T07:08:09+0000";
        let header = s.sign_with("GET", "https", "h", "/p", ts, "n");

        let prefix = format!(
            "EG1-HMAC-SHA256 client_token=akab-client;access_token=akab-access;timestamp={};nonce=n;",
            ts
        );
        let key = hmac_base64(b"secret", ts);
        let expected = hmac_base64(
            key.as_bytes(),
            &format!("GET\thttps\th\t/p\t\t\t{}", prefix),
        );
        assert_eq!(header, format!("{}signature={}", prefix, expected));
    }

    #[test]
    fn test_fresh_nonce_per_request() {
        let s = signer();
        assert_ne!(s.sign("GET", "https", "h", "/p"), s.sign("GET", "https", "h", "/p"));
    }
}
