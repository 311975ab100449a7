mod object_key;
mod upload_id;

pub use object_key::ObjectKey;
pub use upload_id::UploadId;
