//! Credentials and request signing.
//!
//! UpYun authenticates every request with
//! `Authorization: UpYun <operator>:<md5(method&uri&date&length&md5(password))>`.
//! The password is hashed once when the [`Credential`] is built and only the
//! digest is kept.

use std::fmt;

use serde::Serialize;

/// Signature scheme name used in the `Authorization` header.
pub const AUTH_SCHEME: &str = "UpYun";

/// Lowercase hex MD5 digest of `data`.
pub fn md5_hex(data: &[u8]) -> String {
    format!("{:x}", md5::compute(data))
}

/// Bucket-scoped operator credentials.
///
/// # Example
/// ```
/// use upyunlib::Credential;
///
/// let credential = Credential::new("demo", "operator", "secret");
/// assert_eq!(credential.bucket(), "demo");
/// // The password itself is never kept around.
/// assert!(!format!("{:?}", credential).contains("secret"));
/// ```
#[derive(Clone, Serialize)]
pub struct Credential {
    bucket: String,
    username: String,
    #[serde(skip)]
    password_digest: String,
}

impl Credential {
    /// Build credentials, hashing `password` immediately.
    pub fn new(
        bucket: impl Into<String>,
        username: impl Into<String>,
        password: impl AsRef<str>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            username: username.into(),
            password_digest: md5_hex(password.as_ref().as_bytes()),
        }
    }

    /// Bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Operator name.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Compute the `Authorization` header value.
    ///
    /// # Arguments
    /// * `method` - HTTP method, e.g. `PUT`
    /// * `full_uri` - bucket-qualified URI, e.g. `/demo/dir/a.txt`
    /// * `date` - the exact `Date` header value sent with the request
    /// * `length` - body length in bytes
    pub fn sign(&self, method: &str, full_uri: &str, date: &str, length: usize) -> String {
        let value = format!(
            "{}&{}&{}&{}&{}",
            method, full_uri, date, length, self.password_digest
        );
        format!(
            "{} {}:{}",
            AUTH_SCHEME,
            self.username,
            md5_hex(value.as_bytes())
        )
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("bucket", &self.bucket)
            .field("username", &self.username)
            .field("password_digest", &"<redacted>")
            .finish()
    }
}
