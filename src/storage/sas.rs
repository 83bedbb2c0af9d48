//! Shared access signatures signed locally with the storage account key.

use crate::error::{Error, Result};
use crate::storage::{ContainerAccess, TokenIssuer};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Storage service version the signatures are produced for.
pub const SIGNED_VERSION: &str = "2018-03-28";

const EXPIRY_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Resource a signature grants access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resource<'a> {
    Blob { container: &'a str, blob: &'a str },
    Container { container: &'a str },
}

impl Resource<'_> {
    fn code(self) -> &'static str {
        match self {
            Self::Blob { .. } => "b",
            Self::Container { .. } => "c",
        }
    }

    fn canonical(self, account: &str) -> String {
        match self {
            Self::Blob { container, blob } => format!("/blob/{account}/{container}/{blob}"),
            Self::Container { container } => format!("/blob/{account}/{container}"),
        }
    }
}

/// Issues service SAS tokens by signing them with the account key.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountKeySigner;

impl AccountKeySigner {
    /// Create a signer.
    pub fn new() -> Self {
        Self
    }

    fn sign(
        account: &str,
        key: &str,
        resource: Resource<'_>,
        permissions: &str,
        expiry: DateTime<Utc>,
    ) -> Result<String> {
        let key = STANDARD.decode(key.trim()).map_err(|e| Error::Storage {
            reason: format!("account key for '{account}' is not valid base64: {e}"),
        })?;
        let expiry = expiry.format(EXPIRY_FORMAT).to_string();
        let canonical = resource.canonical(account);

        // permissions, start, expiry, resource, identifier, ip, protocol,
        // version, then five empty response header overrides
        let string_to_sign = [
            permissions,
            "",
            expiry.as_str(),
            canonical.as_str(),
            "",
            "",
            "",
            SIGNED_VERSION,
            "",
            "",
            "",
            "",
            "",
        ]
        .join("\n");

        let mut mac = HmacSha256::new_from_slice(&key).map_err(|e| Error::Storage {
            reason: format!("cannot use account key for '{account}': {e}"),
        })?;
        mac.update(string_to_sign.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        Ok(url::form_urlencoded::Serializer::new(String::new())
            .append_pair("sv", SIGNED_VERSION)
            .append_pair("se", &expiry)
            .append_pair("sr", resource.code())
            .append_pair("sp", permissions)
            .append_pair("sig", &signature)
            .finish())
    }

    fn expiry(hours: u32) -> Result<DateTime<Utc>> {
        Utc::now()
            .checked_add_signed(Duration::hours(i64::from(hours)))
            .ok_or_else(|| Error::Storage {
                reason: format!("token lifetime of {hours} hours is out of range"),
            })
    }
}

impl TokenIssuer for AccountKeySigner {
    fn blob_read_token(
        &self,
        account: &str,
        key: &str,
        container: &str,
        blob: &str,
        hours: u32,
    ) -> Result<String> {
        Self::sign(
            account,
            key,
            Resource::Blob { container, blob },
            "r",
            Self::expiry(hours)?,
        )
    }

    fn container_token(
        &self,
        account: &str,
        key: &str,
        container: &str,
        hours: u32,
        access: ContainerAccess,
    ) -> Result<String> {
        Self::sign(
            account,
            key,
            Resource::Container { container },
            &access.permissions(),
            Self::expiry(hours)?,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const KEY: &str = "d2ZjdGwtdGVzdC1hY2NvdW50LWtleQ==";

    fn fixed_expiry() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 2, 8, 0, 57, 16).unwrap()
    }

    #[test]
    fn test_blob_signature() {
        let token = AccountKeySigner::sign(
            "acct",
            KEY,
            Resource::Blob {
                container: "input",
                blob: "a_1.fq",
            },
            "r",
            fixed_expiry(),
        )
        .unwrap();
        assert_eq!(
            token,
            "sv=2018-03-28&se=2017-02-08T00%3A57%3A16Z&sr=b&sp=r\
             &sig=03LXKZy9vuCAADS%2BcKxNRiLS4uayY14iXsAAyjJlOas%3D"
        );
    }

    #[test]
    fn test_container_signature() {
        let token = AccountKeySigner::sign(
            "acct",
            KEY,
            Resource::Container {
                container: "output",
            },
            "rwd",
            fixed_expiry(),
        )
        .unwrap();
        assert_eq!(
            token,
            "sv=2018-03-28&se=2017-02-08T00%3A57%3A16Z&sr=c&sp=rwd\
             &sig=LjhBVh3Kd0PdqeB5cxco5db9HerHCF7DJIM9j37hhUw%3D"
        );
    }

    #[test]
    fn test_invalid_key_is_storage_error() {
        let err = AccountKeySigner::new()
            .blob_read_token("acct", "not base64!", "input", "a.bam", 48)
            .unwrap_err();
        assert!(matches!(err, Error::Storage { .. }));
        assert_eq!(err.exit_code(), 200);
    }

    #[test]
    fn test_container_token_uses_requested_permissions() {
        let token = AccountKeySigner::new()
            .container_token(
                "acct",
                KEY,
                "output",
                1,
                ContainerAccess {
                    write: true,
                    list: false,
                },
            )
            .unwrap();
        assert!(token.contains("&sr=c&sp=rwd&"));
    }
}
