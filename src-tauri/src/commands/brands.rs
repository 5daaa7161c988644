//! Tauri commands for brand table access.

use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::brands;
use crate::brands::types::{BrandInfo, BrandTable};

/// Per-table record counts for a brand file, for the settings page's
/// "check file" diagnostics.
#[derive(Debug, Serialize)]
pub struct BrandCheck {
    pub id: String,
    pub name: String,
    pub single_vision_records: usize,
    pub bifocal_records: usize,
    pub cylinder_records: usize,
    pub compound_records: usize,
    pub progressive_records: usize,
}

/// List every available brand, embedded sheets first, then user files.
#[tauri::command]
pub async fn list_brands() -> Result<Vec<BrandInfo>, String> {
    let listed = brands::available_brands();
    info!("Listed {} brand sheet(s)", listed.len());
    Ok(listed)
}

/// Where user brand TOML files are picked up from.
#[tauri::command]
pub async fn get_user_brands_dir() -> Result<String, String> {
    let dir = brands::user_brands_dir().ok_or("No config directory on this platform")?;
    Ok(dir.to_string_lossy().to_string())
}

/// Parse a brand TOML without installing it and report what it contains.
/// Errors carry the file/parse context so a broken sheet is diagnosable
/// from the UI.
#[tauri::command]
pub async fn check_brand_file(path: String) -> Result<BrandCheck, String> {
    let brand = brands::load_brand_file(&PathBuf::from(&path)).map_err(|err| format!("{err:#}"))?;
    info!("Checked brand file {}: id={}", path, brand.id);
    Ok(summarize(&brand))
}

fn summarize(brand: &BrandTable) -> BrandCheck {
    BrandCheck {
        id: brand.id.clone(),
        name: brand.name.clone(),
        single_vision_records: brand.single_vision.minus_comp.len()
            + brand.single_vision.plus_comp.len()
            + brand.single_vision.sv_cross_comp.len(),
        bifocal_records: brand.bifocal_kt.len(),
        cylinder_records: brand.cyl_kt.len(),
        compound_records: brand.comp_kt.len(),
        progressive_records: brand.progressive_sph.len()
            + brand.progressive_cyl.len()
            + brand.progressive_comp.len(),
    }
}
