use std::path::{Path, PathBuf};

use crate::foundation::error::{BannerError, BannerResult};
use crate::text::builtin::BuiltinTypeface;
use crate::text::outline::OutlineTypeface;
use crate::text::typeface::Typeface;

/// Source of typefaces by logical name (usually a font file name such as `DejaVuSans-Bold.ttf`).
pub trait FontProvider {
    /// Load `name`, or fail with [`BannerError::FontUnavailable`].
    fn load(&self, name: &str) -> BannerResult<Box<dyn Typeface>>;
}

/// Looks the font file up in a fixed list of directories. Absolute names are read directly.
#[derive(Clone, Debug, Default)]
pub struct DirFontProvider {
    dirs: Vec<PathBuf>,
}

impl DirFontProvider {
    /// Search only `dirs`, in order.
    pub fn new(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            dirs: dirs.into_iter().collect(),
        }
    }

    /// `dirs` first, then the usual per-OS font directories.
    pub fn with_system_dirs(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut out = Self::new(dirs);
        out.dirs.extend(
            [
                "/usr/share/fonts/truetype/dejavu",
                "/usr/share/fonts/TTF",
                "/usr/share/fonts/dejavu",
                "/usr/share/fonts",
                "/Library/Fonts",
                "C:\\Windows\\Fonts",
            ]
            .into_iter()
            .map(PathBuf::from),
        );
        out
    }

    /// Directories searched, in order.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// First existing file for `name`, if any.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        let direct = Path::new(name);
        if direct.is_absolute() {
            return direct.is_file().then(|| direct.to_path_buf());
        }
        self.dirs
            .iter()
            .map(|d| d.join(name))
            .find(|p| p.is_file())
    }
}

impl FontProvider for DirFontProvider {
    fn load(&self, name: &str) -> BannerResult<Box<dyn Typeface>> {
        let path = self.locate(name).ok_or_else(|| {
            BannerError::font_unavailable(name, format!("not found in {} dirs", self.dirs.len()))
        })?;
        let bytes = std::fs::read(&path).map_err(|e| {
            BannerError::font_unavailable(name, format!("read '{}': {e}", path.display()))
        })?;
        Ok(Box::new(OutlineTypeface::from_bytes(name, bytes)?))
    }
}

/// Serves the embedded bitmap face for every name.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinFontProvider;

impl FontProvider for BuiltinFontProvider {
    fn load(&self, _name: &str) -> BannerResult<Box<dyn Typeface>> {
        Ok(Box::new(BuiltinTypeface))
    }
}

/// Load `name`, substituting [`BuiltinTypeface`] when it is unavailable.
///
/// The second element carries the [`BannerError::FontUnavailable`] that triggered the fallback.
/// Other errors from the provider are treated the same way: a missing face never aborts a banner.
pub fn resolve_typeface(
    provider: &dyn FontProvider,
    name: &str,
) -> (Box<dyn Typeface>, Option<BannerError>) {
    match provider.load(name) {
        Ok(face) => (face, None),
        Err(err) => {
            let err = match err {
                e @ BannerError::FontUnavailable { .. } => e,
                other => BannerError::font_unavailable(name, other.to_string()),
            };
            tracing::warn!(font = name, error = %err, "falling back to builtin font");
            (Box::new(BuiltinTypeface), Some(err))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/provider.rs"]
mod tests;
