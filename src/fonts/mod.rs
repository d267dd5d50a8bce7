//! Font loading for the PNG charts.
//!
//! `plotters` draws text through `ab_glyph`, which needs the raw bytes of a
//! TrueType font registered under a family name before anything is drawn. The
//! bundled font is searched for in this order:
//!
//! 1. the directory named by `SALES_DASHBOARD_FONTS_DIR`,
//! 2. `assets/fonts` next to the running executable,
//! 3. `assets/fonts` inside the crate manifest directory.
//!
//! When none of them holds the bundled font, well-known system fonts are
//! tried instead and a warning is logged.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{debug, warn};
use plotters::style::{register_font, FontStyle};

use crate::error::{ReportError, Result};

/// Family name every chart uses for its text.
pub const FONT_FAMILY: &str = "sans-serif";

/// Environment variable pointing at a directory holding the bundled font.
pub const FONTS_DIR_ENV: &str = "SALES_DASHBOARD_FONTS_DIR";

const BUNDLED_FONT_FILE: &str = "Roboto-Regular.ttf";

const SYSTEM_FALLBACK_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

static REGISTERED: OnceLock<std::result::Result<PathBuf, String>> = OnceLock::new();

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env_path(FONTS_DIR_ENV) {
        candidates.push(path);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            let candidate = bin_dir.join("assets/fonts");
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }

    let manifest_candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts");
    if !candidates.contains(&manifest_candidate) {
        candidates.push(manifest_candidate);
    }

    candidates
}

fn windows_fallback_font() -> Option<PathBuf> {
    ["WINDIR", "SystemRoot"]
        .iter()
        .filter_map(|var| env_path(var))
        .map(|root| root.join("Fonts").join("arial.ttf"))
        .find(|path| path.is_file())
}

fn system_fallback_font() -> Option<PathBuf> {
    SYSTEM_FALLBACK_FONTS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
        .or_else(windows_fallback_font)
}

fn bundled_font() -> std::result::Result<PathBuf, String> {
    let mut attempts = Vec::new();
    for directory in font_directory_candidates() {
        let candidate = directory.join(BUNDLED_FONT_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
        attempts.push(candidate.display().to_string());
    }
    Err(format!("checked {}", attempts.join(", ")))
}

/// Resolves the font file that will be registered, without loading it.
pub fn resolve_font_path() -> Result<PathBuf> {
    match bundled_font() {
        Ok(path) => Ok(path),
        Err(attempts) => match system_fallback_font() {
            Some(fallback) => {
                warn!(
                    "Bundled font {} unavailable ({}); falling back to {}",
                    BUNDLED_FONT_FILE,
                    attempts,
                    fallback.display()
                );
                Ok(fallback)
            }
            None => Err(ReportError::FontLoad(format!(
                "Unable to locate {} ({}) and no system fallback font was found. \
                 Copy the font into assets/fonts or set {}.",
                BUNDLED_FONT_FILE, attempts, FONTS_DIR_ENV
            ))),
        },
    }
}

fn load_and_register(path: &Path) -> std::result::Result<(), String> {
    let bytes = fs::read(path).map_err(|err| format!("{}: {}", path.display(), err))?;
    // `register_font` keeps the bytes for the rest of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font(FONT_FAMILY, FontStyle::Normal, bytes)
        .map_err(|_| format!("{} is not a usable TrueType font", path.display()))?;
    Ok(())
}

/// Registers the chart font with `plotters`. Later calls reuse the first outcome.
pub fn ensure_registered() -> Result<()> {
    let outcome = REGISTERED.get_or_init(|| {
        let path = resolve_font_path().map_err(|err| match err {
            ReportError::FontLoad(message) => message,
            other => other.to_string(),
        })?;
        load_and_register(&path)?;
        debug!("registered chart font {}", path.display());
        Ok(path)
    });
    outcome
        .as_ref()
        .map(|_| ())
        .map_err(|err| ReportError::FontLoad(err.clone()))
}

/// Indicates whether a font for the static charts can be found.
pub fn default_fonts_available() -> bool {
    bundled_font().is_ok() || system_fallback_font().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_directory_is_always_a_candidate() {
        let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts");
        let candidates = font_directory_candidates();
        assert_eq!(
            candidates.iter().filter(|c| **c == manifest).count(),
            1,
            "manifest fonts directory should appear exactly once"
        );
    }

    #[test]
    fn availability_agrees_with_resolution() {
        assert_eq!(default_fonts_available(), resolve_font_path().is_ok());
    }
}
