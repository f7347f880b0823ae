//! vidcat processing library
//!
//! Media metadata probing and the upload allow-list. No transcoding happens here;
//! the catalog only needs the container and the playtime of an upload.

pub mod container;
pub mod probe;
pub mod validator;

pub use container::Container;
pub use probe::{parse_probe_output, FfprobeProber, MediaProbe, MediaProber, ProbeError};
pub use validator::{UploadValidationError, UploadValidator};
