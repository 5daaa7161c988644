//! Tauri commands for price calculations.
//!
//! Each command takes the raw form fields as strings, runs them through
//! boundary validation, and hands typed values to the match engine for the
//! selected brand. Validation failures come back as plain user-facing
//! messages.

use serde::Deserialize;
use tracing::info;

use crate::brands;
use crate::matching::{validate, AddPowerInput, MatchEngine, MatchResult};

/// Raw single-vision form fields. Empty power fields count as zero; an
/// empty axis means "not supplied".
#[derive(Debug, Deserialize)]
pub struct SingleVisionRequest {
    pub sphere: String,
    pub cylinder: String,
    pub axis: String,
}

/// Raw form fields for the ADD-bearing modes (bifocal and progressive).
/// `near_sphere` and `add_power` stay optional; the engine derives one from
/// the other when only one is given.
#[derive(Debug, Deserialize)]
pub struct AddPowerRequest {
    pub sphere: String,
    pub cylinder: String,
    pub axis: String,
    pub near_sphere: String,
    pub add_power: String,
}

impl AddPowerRequest {
    fn parse(&self) -> Result<AddPowerInput, String> {
        Ok(AddPowerInput {
            sphere: validate::parse_power("Sphere", &self.sphere)?,
            cylinder: validate::parse_power("Cylinder", &self.cylinder)?,
            axis: validate::parse_axis(&self.axis)?,
            near_sphere: validate::parse_optional_power("Near Vision sphere", &self.near_sphere)?,
            add_power: validate::parse_optional_power("ADD Power", &self.add_power)?,
        })
    }
}

/// Run a single-vision search against the selected brand's tables.
#[tauri::command]
pub async fn calculate_single_vision(
    brand_id: String,
    request: SingleVisionRequest,
) -> Result<MatchResult, String> {
    let sphere = validate::parse_power("Sphere", &request.sphere)?;
    let cylinder = validate::parse_power("Cylinder", &request.cylinder)?;
    let axis = validate::parse_axis(&request.axis)?;

    let engine = MatchEngine::new(brands::load_brand_data(&brand_id));
    let result = engine.single_vision(sphere, cylinder, axis);
    info!(
        "Single-vision search in {}: {} match(es)",
        brand_id,
        result.matches.len()
    );
    Ok(result)
}

/// Run a bifocal KT search (ADD, cylinder-only, or compound, by field
/// presence) against the selected brand's tables.
#[tauri::command]
pub async fn calculate_bifocal(
    brand_id: String,
    request: AddPowerRequest,
) -> Result<MatchResult, String> {
    let input = request.parse()?;
    let engine = MatchEngine::new(brands::load_brand_data(&brand_id));
    let result = engine.bifocal(input)?;
    info!(
        "Bifocal search in {}: {} match(es)",
        brand_id,
        result.matches.len()
    );
    Ok(result)
}

/// Run a progressive search, same dispatch as bifocal but over the
/// progressive tables.
#[tauri::command]
pub async fn calculate_progressive(
    brand_id: String,
    request: AddPowerRequest,
) -> Result<MatchResult, String> {
    let input = request.parse()?;
    let engine = MatchEngine::new(brands::load_brand_data(&brand_id));
    let result = engine.progressive(input)?;
    info!(
        "Progressive search in {}: {} match(es)",
        brand_id,
        result.matches.len()
    );
    Ok(result)
}
