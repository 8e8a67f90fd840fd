//! KYC document payloads

use serde::{Deserialize, Serialize};

/// An opaque document attached to a user under a type tag.
///
/// `(user_id, document_type)` is unique; the user does not have to own a
/// profile yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycDocument {
    #[serde(rename = "USER_ID")]
    pub user_id: String,
    #[serde(rename = "DOCUMENT_TYPE")]
    pub document_type: String,
    #[serde(rename = "DOCUMENT_BLOB")]
    pub document_blob: String,
}

impl KycDocument {
    pub fn new(
        user_id: impl Into<String>,
        document_type: impl Into<String>,
        document_blob: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            document_type: document_type.into(),
            document_blob: document_blob.into(),
        }
    }
}
