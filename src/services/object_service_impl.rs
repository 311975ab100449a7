use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    domain::{
        errors::StorageResult,
        models::{ByteStream, GetOutcome, GetRequest, HttpMetadata, ObjectMeta},
        value_objects::ObjectKey,
    },
    ports::{services::ObjectService, storage::ObjectStore},
};

/// Implementation of ObjectService on top of the store port
#[derive(Clone)]
pub struct ObjectServiceImpl {
    store: Arc<dyn ObjectStore>,
}

impl ObjectServiceImpl {
    /// Create a new ObjectServiceImpl instance
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ObjectService for ObjectServiceImpl {
    async fn get_object(&self, key: &ObjectKey, request: GetRequest) -> StorageResult<GetOutcome> {
        debug!(
            key = %key,
            range = ?request.range,
            conditional = request.is_conditional(),
            "evaluating object read"
        );

        let outcome = self.store.get(key, &request).await.map_err(|e| {
            warn!(key = %key, error = %e, "object read failed");
            e
        })?;

        match &outcome {
            GetOutcome::NotFound => debug!(key = %key, "object not found"),
            GetOutcome::NotModified(_) => debug!(key = %key, "object not modified"),
            GetOutcome::Partial { meta, range, .. } => {
                debug!(key = %key, size = meta.size, offset = range.offset, end = ?range.end, "serving partial object")
            }
            GetOutcome::Full { meta, .. } => {
                debug!(key = %key, size = meta.size, "serving full object")
            }
        }

        Ok(outcome)
    }

    async fn put_object(
        &self,
        key: &ObjectKey,
        metadata: HttpMetadata,
        body: ByteStream,
    ) -> StorageResult<ObjectMeta> {
        let meta = self.store.put(key, metadata, body).await.map_err(|e| {
            warn!(key = %key, error = %e, "object upload failed");
            e
        })?;

        info!(key = %meta.key, size = meta.size, etag = %meta.etag, "object stored");
        Ok(meta)
    }
}
