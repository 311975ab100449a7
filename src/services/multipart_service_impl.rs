use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    domain::{
        errors::StorageResult,
        models::{ByteStream, ObjectMeta, PartResult, UploadSession},
        value_objects::{ObjectKey, UploadId},
    },
    ports::{services::MultipartService, storage::ObjectStore},
};

/// Coordinates multipart uploads without holding any session state.
///
/// Sessions are resumed from the key and upload id the client sends, and all
/// validation of part numbers and part lists is left to the store.
#[derive(Clone)]
pub struct MultipartServiceImpl {
    store: Arc<dyn ObjectStore>,
}

impl MultipartServiceImpl {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MultipartService for MultipartServiceImpl {
    async fn init_upload(&self, key: &ObjectKey) -> StorageResult<UploadSession> {
        let session = self.store.create_multipart_upload(key).await.map_err(|e| {
            warn!(key = %key, error = %e, "failed to start multipart upload");
            e
        })?;

        info!(key = %session.key, upload_id = %session.upload_id, "multipart upload started");
        Ok(session)
    }

    async fn upload_part(
        &self,
        key: &ObjectKey,
        upload_id: &UploadId,
        part_number: u32,
        body: ByteStream,
    ) -> StorageResult<PartResult> {
        let session = UploadSession::resume(key.clone(), upload_id.clone());

        let part = self
            .store
            .upload_part(&session, part_number, body)
            .await
            .map_err(|e| {
                warn!(key = %key, upload_id = %upload_id, part_number, error = %e, "part upload failed");
                e
            })?;

        debug!(key = %key, upload_id = %upload_id, part_number, etag = %part.etag, "part uploaded");
        Ok(part)
    }

    async fn finish_upload(
        &self,
        key: &ObjectKey,
        upload_id: &UploadId,
        parts: Vec<PartResult>,
    ) -> StorageResult<ObjectMeta> {
        let session = UploadSession::resume(key.clone(), upload_id.clone());
        let part_count = parts.len();

        let meta = self
            .store
            .complete_multipart_upload(&session, parts)
            .await
            .map_err(|e| {
                warn!(key = %key, upload_id = %upload_id, error = %e, "failed to complete multipart upload");
                e
            })?;

        info!(
            key = %meta.key,
            upload_id = %upload_id,
            parts = part_count,
            size = meta.size,
            "multipart upload completed"
        );
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::outbound::storage::ApacheObjectStoreAdapter,
        domain::{
            errors::StorageError,
            models::{GetOutcome, GetRequest},
        },
    };
    use bytes::Bytes;
    use futures::{StreamExt, TryStreamExt, stream};

    fn setup() -> (Arc<dyn ObjectStore>, MultipartServiceImpl) {
        let store: Arc<dyn ObjectStore> = Arc::new(ApacheObjectStoreAdapter::in_memory());
        (store.clone(), MultipartServiceImpl::new(store))
    }

    fn body(data: &'static [u8]) -> ByteStream {
        stream::once(async move { Ok(Bytes::from_static(data)) }).boxed()
    }

    async fn read(store: &Arc<dyn ObjectStore>, key: &ObjectKey) -> Vec<u8> {
        match store.get(key, &GetRequest::default()).await.unwrap() {
            GetOutcome::Full { body, .. } => {
                let chunks: Vec<Bytes> = body.try_collect().await.unwrap();
                chunks.concat()
            }
            other => panic!("expected full object, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_parts_uploaded_out_of_order() {
        let (store, service) = setup();
        let key = ObjectKey::new("big.bin").unwrap();

        let session = service.init_upload(&key).await.unwrap();
        assert_eq!(session.key, key);

        let second = service
            .upload_part(&key, &session.upload_id, 2, body(b"world"))
            .await
            .unwrap();
        let first = service
            .upload_part(&key, &session.upload_id, 1, body(b"hello "))
            .await
            .unwrap();
        assert_eq!(first.part_number, 1);
        assert_eq!(second.part_number, 2);

        let meta = service
            .finish_upload(&key, &session.upload_id, vec![second, first])
            .await
            .unwrap();
        assert_eq!(meta.size, 11);
        assert_eq!(read(&store, &key).await, b"hello world");
    }

    #[tokio::test]
    async fn test_retried_part_uses_latest_upload() {
        let (store, service) = setup();
        let key = ObjectKey::new("retry.bin").unwrap();
        let session = service.init_upload(&key).await.unwrap();

        service
            .upload_part(&key, &session.upload_id, 1, body(b"abcd"))
            .await
            .unwrap();
        let latest = service
            .upload_part(&key, &session.upload_id, 1, body(b"abcd"))
            .await
            .unwrap();

        service
            .finish_upload(&key, &session.upload_id, vec![latest])
            .await
            .unwrap();
        assert_eq!(read(&store, &key).await, b"abcd");
    }

    #[tokio::test]
    async fn test_part_number_zero_rejected_by_store() {
        let (_, service) = setup();
        let key = ObjectKey::new("zero.bin").unwrap();
        let session = service.init_upload(&key).await.unwrap();

        let err = service
            .upload_part(&key, &session.upload_id, 0, body(b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidPartNumber { part_number: 0 }));
    }

    #[tokio::test]
    async fn test_finish_unknown_upload_fails() {
        let (_, service) = setup();
        let key = ObjectKey::new("ghost.bin").unwrap();
        let upload_id = UploadId::new("does-not-exist").unwrap();

        let result = service
            .finish_upload(
                &key,
                &upload_id,
                vec![PartResult {
                    part_number: 1,
                    etag: String::new(),
                }],
            )
            .await;
        assert!(result.is_err());
    }
}
