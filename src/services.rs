pub mod upload;

pub use upload::{StoredUpload, UploadService};
