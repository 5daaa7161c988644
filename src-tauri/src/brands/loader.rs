//! Brand table loading.
//!
//! Two embedded sheets ship in the binary; additional brands are discovered
//! as TOML files in the user's config directory. Lookup by id never fails:
//! an unknown id or a broken user file logs a warning and falls back to the
//! default brand, so a calculation always has a table to search.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::warn;

use super::types::{BrandInfo, BrandTable};

/// Default sheet embedded in the binary at compile time.
const VISIONCRAFT_SHEET: &str = include_str!("../../config/brands/visioncraft.toml");
const LENSORA_SHEET: &str = include_str!("../../config/brands/lensora.toml");

/// The brand every lookup falls back to.
///
/// # Panics
/// Panics if the embedded TOML is invalid (a compile-time bug).
pub fn default_brand() -> BrandTable {
    toml::from_str(VISIONCRAFT_SHEET).expect("embedded visioncraft.toml must be valid TOML")
}

fn embedded_brands() -> Vec<BrandTable> {
    vec![
        default_brand(),
        toml::from_str(LENSORA_SHEET).expect("embedded lensora.toml must be valid TOML"),
    ]
}

/// Every brand the selector can offer: embedded sheets first, then user
/// sheets (which cannot shadow an embedded id).
pub fn available_brands() -> Vec<BrandInfo> {
    let mut brands: Vec<BrandInfo> = embedded_brands()
        .iter()
        .map(|table| BrandInfo {
            id: table.id.clone(),
            name: table.name.clone(),
        })
        .collect();
    for table in user_brands() {
        if !brands.iter().any(|b| b.id == table.id) {
            brands.push(BrandInfo {
                id: table.id.clone(),
                name: table.name.clone(),
            });
        }
    }
    brands
}

/// Load a brand table by id, falling back to the default brand on any
/// failure rather than propagating it into the matching engine.
pub fn load_brand_data(brand_id: &str) -> BrandTable {
    if let Some(table) = embedded_brands().into_iter().find(|b| b.id == brand_id) {
        return table;
    }
    if let Some(table) = user_brands().into_iter().find(|b| b.id == brand_id) {
        return table;
    }
    warn!(
        "Unknown brand id '{}', falling back to '{}'",
        brand_id,
        default_brand().id
    );
    default_brand()
}

/// Parse one brand sheet from a file path.
pub fn load_brand_file(path: &Path) -> Result<BrandTable> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading brand file {}", path.display()))?;
    let table: BrandTable =
        toml::from_str(&content).with_context(|| format!("parsing brand file {}", path.display()))?;
    Ok(table)
}

/// Directory scanned for user-supplied brand sheets
/// (`<config>/lensquote/brands/*.toml`).
pub fn user_brands_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lensquote").join("brands"))
}

fn user_brands() -> Vec<BrandTable> {
    let dir = match user_brands_dir() {
        Some(dir) => dir,
        None => return Vec::new(),
    };
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };
    let mut tables = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
            continue;
        }
        match load_brand_file(&path) {
            Ok(table) => tables.push(table),
            Err(err) => warn!("Skipping brand file {}: {:#}", path.display(), err),
        }
    }
    tables.sort_by(|a, b| a.id.cmp(&b.id));
    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_brand_loads() {
        let brand = default_brand();
        assert_eq!(brand.id, "visioncraft");
        assert_eq!(brand.name, "VisionCraft");
        assert_eq!(brand.single_vision.minus_comp.len(), 3);
        assert!(!brand.bifocal_kt.is_empty());
        assert!(!brand.cyl_kt.is_empty());
        assert!(!brand.comp_kt.is_empty());
        assert!(!brand.progressive_sph.is_empty());
    }

    #[test]
    fn test_second_embedded_brand_is_partial() {
        let brand = load_brand_data("lensora");
        assert_eq!(brand.name, "Lensora");
        assert!(!brand.single_vision.minus_comp.is_empty());
        assert!(brand.cyl_kt.is_empty(), "not on the dealer card");
        assert!(brand.progressive_sph.is_empty());
    }

    #[test]
    fn test_available_brands_lists_embedded_sheets() {
        let brands = available_brands();
        assert!(brands.iter().any(|b| b.id == "visioncraft"));
        assert!(brands.iter().any(|b| b.id == "lensora"));
    }

    #[test]
    fn test_unknown_id_falls_back_to_default() {
        let brand = load_brand_data("no-such-brand");
        assert_eq!(brand.id, "visioncraft");
    }

    #[test]
    fn test_load_brand_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
            id = "custom"
            name = "Custom Brand"

            [[single_vision.minus_comp]]
            range = "-6.0 to -2.0"
            prices = { HC = 640 }
            "#,
        )
        .expect("write sheet");

        let table = load_brand_file(&path).expect("should parse");
        assert_eq!(table.id, "custom");
        assert_eq!(table.single_vision.minus_comp[0].prices["HC"], 640);
    }

    #[test]
    fn test_load_brand_file_reports_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "id = ").expect("write sheet");

        let err = load_brand_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing brand file"));
    }
}
