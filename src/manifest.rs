//! Web app manifest `icons` fragment
//!
//! Mirrors the `icons` member of the W3C web app manifest so the generated
//! PNGs can be pasted into (or merged with) a site's `manifest.webmanifest`.

use crate::icon_gen::IconSpec;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILENAME: &str = "manifest-icons.json";

/// Root object holding the `icons` array
#[derive(Serialize, Debug, Clone)]
pub struct ManifestIcons {
    pub icons: Vec<ManifestIcon>,
}

/// One image resource of the manifest `icons` member
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ManifestIcon {
    /// URL of the icon, rooted at the site's public directory (e.g. "/icon-192.png")
    pub src: String,

    /// Space separated pixel sizes (e.g. "192x192")
    pub sizes: String,

    /// MIME type of the image
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl ManifestIcon {
    pub fn from_spec(spec: &IconSpec) -> Self {
        Self {
            src: format!("/{}", spec.filename),
            sizes: format!("{0}x{0}", spec.size),
            mime_type: "image/png".to_string(),
        }
    }
}

impl ManifestIcons {
    /// Collect the entries flagged for the manifest, keeping their order
    pub fn from_specs(specs: &[IconSpec]) -> Self {
        Self {
            icons: specs
                .iter()
                .filter(|spec| spec.in_manifest)
                .map(ManifestIcon::from_spec)
                .collect(),
        }
    }
}

/// Writes `manifest-icons.json` into `dir` and returns its path
pub fn write_manifest_icons(dir: &Path, specs: &[IconSpec]) -> Result<PathBuf> {
    let manifest = ManifestIcons::from_specs(specs);
    let json =
        serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest icons")?;

    let path = dir.join(MANIFEST_FILENAME);
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
