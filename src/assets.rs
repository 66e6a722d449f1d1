pub mod cache;
pub mod decode;
pub mod photo;
pub mod source;
