pub mod error;
pub mod image;
pub mod request;

pub use error::StudioError;
pub use image::{ImagePayload, MAX_UPLOAD_BYTES};
pub use request::{EditRequest, GenerateRequest, ImageSize};
