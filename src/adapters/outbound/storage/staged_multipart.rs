use async_trait::async_trait;
use bytes::Bytes;
use object_store::{
    Error, MultipartId, ObjectStore as ApacheObjectStore, PutPayload, PutResult, Result,
    multipart::{MultipartStore, PartId},
    path::Path,
};
use sha1::{Digest, Sha1};
use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tokio::sync::Mutex;
use tracing::debug;

const STORE: &str = "StagedMultipartStore";

/// Multipart uploads staged in memory and committed to a target store.
///
/// Completion assembles exactly the listed parts, in list order, and each
/// listed content id must match the one issued when that part was uploaded.
/// Parts left out of the list are discarded with the upload.
pub struct StagedMultipartStore {
    target: Arc<dyn ApacheObjectStore>,
    uploads: Mutex<HashMap<MultipartId, StagedUpload>>,
    next_id: AtomicU64,
}

struct StagedUpload {
    path: Path,
    parts: BTreeMap<usize, StagedPart>,
}

struct StagedPart {
    content_id: String,
    chunks: Vec<Bytes>,
}

impl StagedMultipartStore {
    pub fn new(target: Arc<dyn ApacheObjectStore>) -> Self {
        Self {
            target,
            uploads: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl std::fmt::Debug for StagedMultipartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(STORE)
            .field("target", &self.target.to_string())
            .finish_non_exhaustive()
    }
}

fn upload_not_found(id: &MultipartId) -> Error {
    Error::NotFound {
        path: id.clone(),
        source: format!("no multipart upload with id {}", id).into(),
    }
}

fn rejected(message: String) -> Error {
    Error::Generic {
        store: STORE,
        source: message.into(),
    }
}

fn content_id(chunks: &[Bytes]) -> String {
    let mut hasher = Sha1::new();
    for chunk in chunks {
        hasher.update(chunk);
    }
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MultipartStore for StagedMultipartStore {
    async fn create_multipart(&self, path: &Path) -> Result<MultipartId> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
        self.uploads.lock().await.insert(
            id.clone(),
            StagedUpload {
                path: path.clone(),
                parts: BTreeMap::new(),
            },
        );
        Ok(id)
    }

    async fn put_part(
        &self,
        path: &Path,
        id: &MultipartId,
        part_idx: usize,
        data: PutPayload,
    ) -> Result<PartId> {
        let chunks: &[Bytes] = data.as_ref();
        let chunks = chunks.to_vec();
        let content_id = content_id(&chunks);

        let mut uploads = self.uploads.lock().await;
        let upload = uploads
            .get_mut(id)
            .filter(|upload| upload.path == *path)
            .ok_or_else(|| upload_not_found(id))?;

        // A repeated part index replaces the earlier upload
        upload.parts.insert(
            part_idx,
            StagedPart {
                content_id: content_id.clone(),
                chunks,
            },
        );

        Ok(PartId { content_id })
    }

    async fn complete_multipart(
        &self,
        path: &Path,
        id: &MultipartId,
        parts: Vec<PartId>,
    ) -> Result<PutResult> {
        let payload: PutPayload = {
            let uploads = self.uploads.lock().await;
            let upload = uploads
                .get(id)
                .filter(|upload| upload.path == *path)
                .ok_or_else(|| upload_not_found(id))?;

            let mut chunks = Vec::new();
            for (idx, part) in parts.iter().enumerate() {
                let staged = upload
                    .parts
                    .get(&idx)
                    .ok_or_else(|| rejected(format!("part {} was never uploaded", idx + 1)))?;
                if staged.content_id != part.content_id {
                    return Err(rejected(format!(
                        "part {} does not match its upload receipt",
                        idx + 1
                    )));
                }
                chunks.extend(staged.chunks.iter().cloned());
            }
            chunks.into_iter().collect()
        };

        let result = self.target.put(path, payload).await?;

        if let Some(upload) = self.uploads.lock().await.remove(id) {
            let discarded = upload.parts.len().saturating_sub(parts.len());
            debug!(upload_id = %id, parts = parts.len(), discarded, "staged upload committed");
        }
        Ok(result)
    }

    async fn abort_multipart(&self, _path: &Path, id: &MultipartId) -> Result<()> {
        self.uploads.lock().await.remove(id);
        Ok(())
    }
}
