mod upload_spool;

pub use upload_spool::{SpoolError, UploadSpool};
