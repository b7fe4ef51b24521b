/// Owned 8-bit RGB/RGBA pixel storage.
pub mod buffer;
/// Resize onto the output canvas.
pub mod normalize;
