//! Portrait URL resolution.

use std::fmt;
use std::time::Duration;

use hmac::{Hmac, Mac};
use identikit_core::{Gender, Picture, PictureSize};
use sha2::Sha256;

use crate::clock::ReferenceClock;
use crate::errors::LocatorError;

type HmacSha256 = Hmac<Sha256>;

/// Maps a stored object to a time-limited retrieval URL.
pub trait AssetLocator: Send + Sync {
    fn locate(&self, bucket: &str, object_key: &str, ttl: Duration) -> Result<String, LocatorError>;
}

/// Locator used when no storage endpoint is configured; always fails, so
/// every record gets placeholder pictures.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredLocator;

impl AssetLocator for UnconfiguredLocator {
    fn locate(&self, _bucket: &str, _object_key: &str, _ttl: Duration) -> Result<String, LocatorError> {
        Err(LocatorError::Unconfigured)
    }
}

/// Issues HMAC-SHA256 signed URLs of the form
/// `<endpoint>/<bucket>/<key>?expires=<unix>&key_id=<id>&signature=<hex>`.
///
/// The signed payload is `GET\n<bucket>\n<key>\n<expires>` with the key in
/// its unencoded form.
#[derive(Clone)]
pub struct SignedUrlLocator {
    endpoint: String,
    key_id: String,
    secret: Vec<u8>,
    clock: ReferenceClock,
}

impl SignedUrlLocator {
    pub fn new(endpoint: &str, key_id: &str, secret: &[u8]) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            key_id: key_id.to_string(),
            secret: secret.to_vec(),
            clock: ReferenceClock::System,
        }
    }

    pub fn with_clock(mut self, clock: ReferenceClock) -> Self {
        self.clock = clock;
        self
    }

    fn signature(&self, bucket: &str, object_key: &str, expires: i64) -> Result<String, LocatorError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|err| LocatorError::Signing(err.to_string()))?;
        mac.update(format!("GET\n{bucket}\n{object_key}\n{expires}").as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl fmt::Debug for SignedUrlLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedUrlLocator")
            .field("endpoint", &self.endpoint)
            .field("key_id", &self.key_id)
            .field("secret", &"***")
            .finish()
    }
}

impl AssetLocator for SignedUrlLocator {
    fn locate(&self, bucket: &str, object_key: &str, ttl: Duration) -> Result<String, LocatorError> {
        if bucket.is_empty() || bucket.contains('/') {
            return Err(LocatorError::InvalidKey(format!("bad bucket '{bucket}'")));
        }
        if object_key.is_empty() || object_key.split('/').any(|segment| segment == "..") {
            return Err(LocatorError::InvalidKey(object_key.to_string()));
        }

        let ttl_secs = i64::try_from(ttl.as_secs())
            .map_err(|_| LocatorError::Signing("ttl out of range".to_string()))?;
        let expires = window_expiry(self.clock.now().timestamp(), ttl_secs);
        let signature = self.signature(bucket, object_key, expires)?;

        Ok(format!(
            "{}/{}/{}?expires={}&key_id={}&signature={}",
            self.endpoint,
            bucket,
            encode_path(object_key),
            expires,
            encode_path(&self.key_id),
            signature
        ))
    }
}

/// `now + ttl` rounded up to a multiple of `ttl`, so every URL issued within
/// one window is identical and still valid for at least `ttl`.
fn window_expiry(now: i64, ttl_secs: i64) -> i64 {
    let earliest = now.saturating_add(ttl_secs);
    if ttl_secs <= 0 {
        return earliest;
    }
    match earliest % ttl_secs {
        0 => earliest,
        rem => earliest.saturating_add(ttl_secs - rem),
    }
}

/// Placeholder used for `size` when the locator cannot produce a URL.
pub fn placeholder_url(gender: Gender, size: PictureSize) -> String {
    format!(
        "https://example.com/placeholder/{}/{}.png",
        gender.as_str(),
        size.as_str()
    )
}

pub fn placeholder_picture(gender: Gender) -> Picture {
    let [large, medium, thumbnail] = PictureSize::ALL.map(|size| placeholder_url(gender, size));
    Picture {
        large,
        medium,
        thumbnail,
    }
}

/// Percent-encode everything except RFC 3986 unreserved characters and `/`.
fn encode_path(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                encoded.push(char::from(byte));
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
