use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ObjectKey, UploadId};

/// Handle on a multipart upload.
///
/// A plain value: the gateway rebuilds it from the client-supplied key and
/// upload id on every request and never keeps it between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    pub key: ObjectKey,
    pub upload_id: UploadId,
}

impl UploadSession {
    /// Resume an upload previously started by the store
    pub fn resume(key: ObjectKey, upload_id: UploadId) -> Self {
        Self { key, upload_id }
    }
}

/// Receipt for one uploaded part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartResult {
    pub part_number: u32,
    #[serde(alias = "token")]
    pub etag: String,
}
