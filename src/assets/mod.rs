/// Byte-level decode and encode.
pub mod codec;
