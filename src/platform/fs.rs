// LogView - platform/fs.rs
//
// Filesystem helpers: system font directory resolution and font file lookup.

use crate::util::constants::FONT_SEARCH_MAX_DEPTH;
use crate::util::error::FontError;
use directories::BaseDirs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use walkdir::WalkDir;

/// Directories searched for installed fonts on this platform, user
/// directories first. Missing directories are filtered out.
pub fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    let base = BaseDirs::new();

    #[cfg(target_os = "windows")]
    {
        if let Some(ref b) = base {
            dirs.push(
                b.data_local_dir()
                    .join("Microsoft")
                    .join("Windows")
                    .join("Fonts"),
            );
        }
        let windir = std::env::var_os("WINDIR").unwrap_or_else(|| r"C:\Windows".into());
        dirs.push(PathBuf::from(windir).join("Fonts"));
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(ref b) = base {
            dirs.push(b.home_dir().join("Library").join("Fonts"));
        }
        dirs.push(PathBuf::from("/Library/Fonts"));
        dirs.push(PathBuf::from("/System/Library/Fonts"));
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(ref b) = base {
            dirs.push(b.data_dir().join("fonts"));
            dirs.push(b.home_dir().join(".fonts"));
        }
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        dirs.push(PathBuf::from("/usr/share/fonts"));
    }

    dirs.retain(|d| d.is_dir());
    dirs
}

/// Conventional style name for a CSS-style numeric weight.
pub fn weight_name(weight: u16) -> &'static str {
    match weight {
        0..=149 => "thin",
        150..=249 => "extralight",
        250..=349 => "light",
        350..=449 => "regular",
        450..=549 => "medium",
        550..=649 => "semibold",
        650..=749 => "bold",
        750..=849 => "extrabold",
        _ => "black",
    }
}

/// Lowercase ASCII alphanumerics only: "Fira Code" -> "firacode".
fn normalise(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// How well a file stem matches the requested family and weight.
/// `None` when the family does not match at all.
fn match_score(stem: &str, family: &str, weight: &str) -> Option<u8> {
    let stem = normalise(stem);
    let rest = stem.strip_prefix(family)?;
    let score = if rest == weight {
        4
    } else if rest.contains("wght") || rest.contains("variable") || rest == "vf" {
        3
    } else if rest.is_empty() || rest == "regular" {
        2
    } else if rest.contains(weight) {
        1
    } else {
        0
    };
    Some(score)
}

/// Find the best font file for `family` at `weight` under `dirs`.
///
/// Exact style matches win over variable fonts, which win over the regular
/// face. The walk aborts early when `cancel` is raised.
pub fn find_font_file(
    dirs: &[PathBuf],
    family: &str,
    weight: u16,
    cancel: &AtomicBool,
) -> Result<PathBuf, FontError> {
    let family_key = normalise(family);
    let weight_key = weight_name(weight);
    let mut best: Option<(u8, PathBuf)> = None;

    'dirs: for dir in dirs {
        for entry in WalkDir::new(dir)
            .max_depth(FONT_SEARCH_MAX_DEPTH)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if cancel.load(Ordering::SeqCst) {
                break 'dirs;
            }
            let path = entry.path();
            if !entry.file_type().is_file() || !is_font_file(path) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some(score) = match_score(stem, &family_key, weight_key) else {
                continue;
            };
            if best.as_ref().map_or(true, |(s, _)| score > *s) {
                tracing::debug!(font = %path.display(), score, "Font candidate");
                best = Some((score, path.to_path_buf()));
                if score == 4 {
                    break 'dirs;
                }
            }
        }
    }

    best.map(|(_, p)| p).ok_or_else(|| FontError::NotFound {
        family: family.to_string(),
        weight,
    })
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf"))
        .unwrap_or(false)
}
