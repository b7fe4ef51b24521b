/// Built-in 5x7 bitmap face used when no outline font is available.
pub mod builtin;
/// Centered, auto-fit and tiled placement.
pub mod layout;
/// Outline fonts shaped with parley and rasterized with vello_cpu.
pub mod outline;
/// Font lookup and fallback.
pub mod provider;
/// The face abstraction shared by all text code.
pub mod typeface;
