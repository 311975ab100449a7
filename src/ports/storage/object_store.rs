use crate::domain::{
    errors::StorageResult,
    models::{ByteStream, GetOutcome, GetRequest, HttpMetadata, ObjectMeta, PartResult, UploadSession},
    value_objects::ObjectKey,
};
use async_trait::async_trait;

/// Port for the object store behind the gateway.
///
/// Range arithmetic and conditional matching happen behind this trait. The
/// gateway never re-evaluates them.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Evaluate a read, honouring the raw range and conditional values
    async fn get(&self, key: &ObjectKey, request: &GetRequest) -> StorageResult<GetOutcome>;

    /// Store a whole object from a byte stream
    async fn put(
        &self,
        key: &ObjectKey,
        metadata: HttpMetadata,
        body: ByteStream,
    ) -> StorageResult<ObjectMeta>;

    /// Start a multipart upload
    async fn create_multipart_upload(&self, key: &ObjectKey) -> StorageResult<UploadSession>;

    /// Upload one part of a multipart upload.
    ///
    /// Part numbers start at 1. Uploading the same number again replaces the
    /// earlier part.
    async fn upload_part(
        &self,
        session: &UploadSession,
        part_number: u32,
        body: ByteStream,
    ) -> StorageResult<PartResult>;

    /// Assemble the uploaded parts into the final object
    async fn complete_multipart_upload(
        &self,
        session: &UploadSession,
        parts: Vec<PartResult>,
    ) -> StorageResult<ObjectMeta>;
}
