use crate::domain::{
    errors::StorageResult,
    models::{ByteStream, ObjectMeta, PartResult, UploadSession},
    value_objects::{ObjectKey, UploadId},
};
use async_trait::async_trait;

/// Port for the three-phase multipart upload protocol.
///
/// Every call after `init_upload` names its session explicitly, so any
/// instance can serve any phase of any upload.
#[async_trait]
pub trait MultipartService: Send + Sync + 'static {
    async fn init_upload(&self, key: &ObjectKey) -> StorageResult<UploadSession>;

    async fn upload_part(
        &self,
        key: &ObjectKey,
        upload_id: &UploadId,
        part_number: u32,
        body: ByteStream,
    ) -> StorageResult<PartResult>;

    async fn finish_upload(
        &self,
        key: &ObjectKey,
        upload_id: &UploadId,
        parts: Vec<PartResult>,
    ) -> StorageResult<ObjectMeta>;
}
