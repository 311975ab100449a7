use serde::{Deserialize, Serialize};

use crate::domain::models::UploadSession;

/// Response body of the multipart init call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSessionDto {
    pub key: String,
    pub upload_id: String,
}

impl From<UploadSession> for UploadSessionDto {
    fn from(session: UploadSession) -> Self {
        UploadSessionDto {
            key: session.key.into_inner(),
            upload_id: session.upload_id.to_string(),
        }
    }
}

/// Query string of the part upload call.
///
/// The part number is kept as text so that a missing value and an
/// unparseable one can be told apart.
#[derive(Debug, Clone, Deserialize)]
pub struct PartNumberQuery {
    #[serde(rename = "partNumber")]
    pub part_number: Option<String>,
}

impl PartNumberQuery {
    pub fn parse(&self) -> Option<Result<u32, std::num::ParseIntError>> {
        self.part_number.as_deref().map(|raw| raw.trim().parse())
    }
}
