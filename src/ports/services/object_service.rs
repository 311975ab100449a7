use crate::domain::{
    errors::StorageResult,
    models::{ByteStream, GetOutcome, GetRequest, HttpMetadata, ObjectMeta},
    value_objects::ObjectKey,
};
use async_trait::async_trait;

/// Port for whole-object reads and writes
#[async_trait]
pub trait ObjectService: Send + Sync + 'static {
    /// Read an object with range and conditional semantics
    async fn get_object(&self, key: &ObjectKey, request: GetRequest) -> StorageResult<GetOutcome>;

    /// Write an object in a single request
    async fn put_object(
        &self,
        key: &ObjectKey,
        metadata: HttpMetadata,
        body: ByteStream,
    ) -> StorageResult<ObjectMeta>;
}
