use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use object_store::{
    Attribute, Attributes, GetOptions, GetResult, MultipartId, ObjectStore as ApacheObjectStore,
    PutPayload, WriteMultipart,
    memory::InMemory,
    multipart::{MultipartStore, PartId},
    path::Path as ObjectPath,
};
use std::sync::Arc;
use tracing::{debug, warn};

use super::{get_options::build_get_options, staged_multipart::StagedMultipartStore};
use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        models::{
            ByteRange, ByteStream, GetOutcome, GetRequest, HttpMetadata, ObjectMeta, PartResult,
            UploadSession,
        },
        value_objects::{ObjectKey, UploadId},
    },
    ports::storage::ObjectStore,
};

/// Default size of the chunks a streamed upload is cut into
pub const DEFAULT_CHUNK_SIZE: usize = 5 * 1024 * 1024;

/// Chunk uploads allowed in flight for one streamed object
const MAX_CONCURRENT_CHUNKS: usize = 8;

/// Adapter that implements our ObjectStore port using Apache object_store.
///
/// Multipart uploads go through a `MultipartStore`: the cloud stores are their
/// own, while in-memory objects are paired with a [`StagedMultipartStore`].
pub struct ApacheObjectStoreAdapter {
    inner: Arc<dyn ApacheObjectStore>,
    multipart: Arc<dyn MultipartStore>,
    chunk_size: usize,
}

impl ApacheObjectStoreAdapter {
    pub fn new<S>(store: Arc<S>) -> Self
    where
        S: ApacheObjectStore + MultipartStore,
    {
        Self {
            inner: store.clone(),
            multipart: store,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Pair an object store with a separate multipart backend
    pub fn from_stores(
        store: Arc<dyn ApacheObjectStore>,
        multipart: Arc<dyn MultipartStore>,
    ) -> Self {
        Self {
            inner: store,
            multipart,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// In-memory objects with staged multipart uploads
    pub fn in_memory() -> Self {
        let objects: Arc<dyn ApacheObjectStore> = Arc::new(InMemory::new());
        let multipart = Arc::new(StagedMultipartStore::new(objects.clone()));
        Self::from_stores(objects, multipart)
    }

    /// Objects smaller than `chunk_size` are written in one request; larger
    /// ones are streamed in chunks of this size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    fn path(key: &ObjectKey) -> ObjectPath {
        ObjectPath::from(key.as_str())
    }

    /// Metadata of an object without its body
    async fn head(&self, key: &ObjectKey) -> StorageResult<Option<ObjectMeta>> {
        let options = GetOptions {
            head: true,
            ..Default::default()
        };

        match self.inner.get_opts(&Self::path(key), options).await {
            Ok(result) => Ok(Some(object_meta(key, &result))),
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Drain the request body into a multipart writer, returning bytes written
    async fn stream_into(writer: &mut WriteMultipart, mut body: ByteStream) -> StorageResult<u64> {
        let mut written = 0u64;
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            written += chunk.len() as u64;
            writer.wait_for_capacity(MAX_CONCURRENT_CHUNKS).await?;
            writer.put(chunk);
        }
        Ok(written)
    }
}

fn object_meta(key: &ObjectKey, result: &GetResult) -> ObjectMeta {
    ObjectMeta {
        key: key.clone(),
        size: result.meta.size,
        etag: result.meta.e_tag.clone().unwrap_or_default(),
        last_modified: Some(result.meta.last_modified),
        http_metadata: http_metadata(&result.attributes),
    }
}

fn http_metadata(attributes: &Attributes) -> HttpMetadata {
    let value = |attribute: &Attribute| {
        attributes.get(attribute).map(|v| {
            let v: &str = v.as_ref();
            v.to_string()
        })
    };

    HttpMetadata {
        content_type: value(&Attribute::ContentType),
        content_language: value(&Attribute::ContentLanguage),
        content_disposition: value(&Attribute::ContentDisposition),
        content_encoding: value(&Attribute::ContentEncoding),
        cache_control: value(&Attribute::CacheControl),
    }
}

fn attributes(metadata: &HttpMetadata) -> Attributes {
    let mut attributes = Attributes::new();
    let fields = [
        (Attribute::ContentType, &metadata.content_type),
        (Attribute::ContentLanguage, &metadata.content_language),
        (Attribute::ContentDisposition, &metadata.content_disposition),
        (Attribute::ContentEncoding, &metadata.content_encoding),
        (Attribute::CacheControl, &metadata.cache_control),
    ];
    for (attribute, value) in fields {
        if let Some(value) = value {
            attributes.insert(attribute, value.clone().into());
        }
    }
    attributes
}

#[async_trait]
impl ObjectStore for ApacheObjectStoreAdapter {
    async fn get(&self, key: &ObjectKey, request: &GetRequest) -> StorageResult<GetOutcome> {
        let (options, requested_range) = build_get_options(request);

        let result = match self.inner.get_opts(&Self::path(key), options).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => return Ok(GetOutcome::NotFound),
            Err(
                e @ (object_store::Error::NotModified { .. }
                | object_store::Error::Precondition { .. }),
            ) => {
                debug!(key = %key, reason = %e, "conditional read returned no body");
                return Ok(match self.head(key).await? {
                    Some(meta) => GetOutcome::NotModified(meta),
                    None => GetOutcome::NotFound,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let meta = object_meta(key, &result);
        let resolved = result.range.clone();
        let body = result.into_stream().map_err(StorageError::from).boxed();

        if requested_range.is_some() && resolved.end > resolved.start {
            Ok(GetOutcome::Partial {
                meta,
                range: ByteRange::new(resolved.start, Some(resolved.end - 1)),
                body,
            })
        } else {
            Ok(GetOutcome::Full { meta, body })
        }
    }

    async fn put(
        &self,
        key: &ObjectKey,
        metadata: HttpMetadata,
        mut body: ByteStream,
    ) -> StorageResult<ObjectMeta> {
        let path = Self::path(key);
        let attributes = attributes(&metadata);

        // Buffer up to one chunk; anything that fits is written in one put.
        let mut head: Vec<Bytes> = Vec::new();
        let mut buffered = 0usize;
        let mut exhausted = false;
        while buffered < self.chunk_size {
            match body.next().await {
                Some(chunk) => {
                    let chunk = chunk?;
                    buffered += chunk.len();
                    head.push(chunk);
                }
                None => {
                    exhausted = true;
                    break;
                }
            }
        }

        let (result, size) = if exhausted {
            let payload: PutPayload = head.into_iter().collect();
            let result = self.inner.put_opts(&path, payload, attributes.into()).await?;
            (result, buffered as u64)
        } else {
            let upload = self.inner.put_multipart_opts(&path, attributes.into()).await?;
            let mut writer = WriteMultipart::new_with_chunk_size(upload, self.chunk_size);
            for chunk in head {
                writer.put(chunk);
            }

            let streamed = match Self::stream_into(&mut writer, body).await {
                Ok(streamed) => streamed,
                Err(e) => {
                    if let Err(abort_err) = writer.abort().await {
                        warn!(key = %key, error = %abort_err, "failed to abort streamed upload");
                    }
                    return Err(e);
                }
            };
            (writer.finish().await?, buffered as u64 + streamed)
        };

        Ok(ObjectMeta {
            key: key.clone(),
            size,
            etag: result.e_tag.unwrap_or_default(),
            last_modified: None,
            http_metadata: metadata,
        })
    }

    async fn create_multipart_upload(&self, key: &ObjectKey) -> StorageResult<UploadSession> {
        let id = self.multipart.create_multipart(&Self::path(key)).await?;
        let upload_id = UploadId::new(id).map_err(|e| StorageError::InfrastructureError {
            message: "Store issued an unusable upload id".to_string(),
            source: Some(e.to_string()),
        })?;

        Ok(UploadSession {
            key: key.clone(),
            upload_id,
        })
    }

    async fn upload_part(
        &self,
        session: &UploadSession,
        part_number: u32,
        body: ByteStream,
    ) -> StorageResult<PartResult> {
        // object_store addresses parts by zero-based index
        let part_idx = part_number
            .checked_sub(1)
            .ok_or(StorageError::InvalidPartNumber { part_number })? as usize;

        // put_part takes one payload; chunks are kept as received, not copied.
        let chunks: Vec<Bytes> = body.try_collect().await?;
        let payload: PutPayload = chunks.into_iter().collect();

        let id: MultipartId = session.upload_id.to_string();
        let part = self
            .multipart
            .put_part(&Self::path(&session.key), &id, part_idx, payload)
            .await
            .map_err(|e| match e {
                object_store::Error::NotFound { .. } => StorageError::UploadNotFound {
                    key: session.key.clone(),
                    upload_id: session.upload_id.clone(),
                },
                e => e.into(),
            })?;

        Ok(PartResult {
            part_number,
            etag: part.content_id,
        })
    }

    async fn complete_multipart_upload(
        &self,
        session: &UploadSession,
        mut parts: Vec<PartResult>,
    ) -> StorageResult<ObjectMeta> {
        // object_store numbers completed parts by their position in the list
        parts.sort_by_key(|part| part.part_number);
        if parts.is_empty() {
            return Err(StorageError::InvalidPartList {
                message: "at least one part is required".to_string(),
            });
        }
        for (idx, part) in parts.iter().enumerate() {
            let expected = idx as u64 + 1;
            if u64::from(part.part_number) != expected {
                return Err(StorageError::InvalidPartList {
                    message: format!(
                        "expected part {} but found part {}",
                        expected, part.part_number
                    ),
                });
            }
        }

        let path = Self::path(&session.key);
        let id: MultipartId = session.upload_id.to_string();
        let part_ids = parts
            .into_iter()
            .map(|part| PartId {
                content_id: part.etag,
            })
            .collect();

        let result = self
            .multipart
            .complete_multipart(&path, &id, part_ids)
            .await
            .map_err(|e| match e {
                object_store::Error::NotFound { .. } => StorageError::UploadNotFound {
                    key: session.key.clone(),
                    upload_id: session.upload_id.clone(),
                },
                e => e.into(),
            })?;

        let mut meta = self
            .head(&session.key)
            .await?
            .ok_or_else(|| StorageError::ObjectNotFound {
                key: session.key.clone(),
            })?;
        if let Some(etag) = result.e_tag {
            meta.etag = etag;
        }
        Ok(meta)
    }
}
