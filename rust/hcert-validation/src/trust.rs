// Licensed under the MIT License.

//! Signer-certificate lookup by key id.
//!
//! Fetching and refreshing a trust list is the caller's business. The verifier
//! only asks a [`TrustResolver`] for the certificates registered under a kid and
//! insists on exactly one answer.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hcert_common::{HcertError, Result};

/// A document signer certificate as supplied by a trust list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerCertificate {
    /// PEM text or bare base64 DER.
    pub raw: String,
    pub kid: Vec<u8>,
}

impl SignerCertificate {
    pub fn new(raw: impl Into<String>, kid: impl Into<Vec<u8>>) -> Self {
        Self {
            raw: raw.into(),
            kid: kid.into(),
        }
    }

    /// Key id in the base64 form trust lists publish it in.
    pub fn kid_base64(&self) -> String {
        STANDARD.encode(&self.kid)
    }
}

pub trait TrustResolver {
    /// All certificates registered under `kid`. Zero or several results are
    /// both treated as a trust failure by the verifier.
    fn find_by_kid(&self, kid: &[u8]) -> Vec<SignerCertificate>;
}

impl<T: TrustResolver + ?Sized> TrustResolver for &T {
    fn find_by_kid(&self, kid: &[u8]) -> Vec<SignerCertificate> {
        (**self).find_by_kid(kid)
    }
}

/// A trust list held in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTrustList {
    entries: Vec<SignerCertificate>,
}

impl InMemoryTrustList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = SignerCertificate>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, cert: SignerCertificate) {
        self.entries.push(cert);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TrustResolver for InMemoryTrustList {
    fn find_by_kid(&self, kid: &[u8]) -> Vec<SignerCertificate> {
        self.entries.iter().filter(|c| c.kid == kid).cloned().collect()
    }
}

/// Resolve exactly one signer certificate for `kid`.
pub fn resolve_signer(resolver: &dyn TrustResolver, kid: &[u8]) -> Result<SignerCertificate> {
    let mut found = resolver.find_by_kid(kid);
    match found.len() {
        1 => Ok(found.remove(0)),
        0 => Err(HcertError::Trust(format!(
            "no signer certificate for kid {}",
            STANDARD.encode(kid)
        ))),
        n => {
            tracing::warn!(kid = %STANDARD.encode(kid), matches = n, "ambiguous trust list lookup");
            Err(HcertError::Trust(format!(
                "{n} signer certificates match kid {}",
                STANDARD.encode(kid)
            )))
        }
    }
}
