//! On-disk shape of the record store.

use serde::{Deserialize, Serialize};

use crate::inquiry::Inquiry;

/// The whole persisted document: `{ "inquiries": [ ... ] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiryDocument {
    /// Every stored inquiry, in insertion order.
    #[serde(default)]
    pub inquiries: Vec<Inquiry>,
}

impl InquiryDocument {
    /// Wrap a collection for serialization.
    #[must_use]
    pub fn new(inquiries: Vec<Inquiry>) -> Self {
        Self { inquiries }
    }

    /// Parse a document from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid inquiry document.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Serialize pretty-printed, with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_pretty_vec(&self) -> serde_json::Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}
