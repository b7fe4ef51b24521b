/// Separable Gaussian blur and the original/blurred mix.
pub mod blur;
/// Porter-Duff "over" and layer stacking.
pub mod composite;
/// Per-pixel tone transforms.
pub mod tone;
