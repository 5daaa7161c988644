//! Brand pricing-table types.
//!
//! These deserialize from the TOML brand files (embedded or user-supplied)
//! and serialize as JSON to the frontend. Field aliases accept the table
//! names used by the upstream price sheets (`"Bifocal KT"`, `"CYL_KT"`,
//! `"PROGRESSIVE__CYL"` with its double underscore, and the spaced
//! single-vision category names), so a sheet transcribed verbatim still
//! loads.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A priced entry, valid for prescriptions falling inside its encoded range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRangeRecord {
    /// Range string in one of the grammars of `matching::range`
    pub range: String,
    /// Lens option code -> price in the smallest currency unit, in sheet
    /// order
    #[serde(default)]
    pub prices: IndexMap<String, u32>,
}

/// The three single-vision category tables. A missing category is an empty
/// list, never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SingleVisionTables {
    #[serde(default, alias = "Minus Comp")]
    pub minus_comp: Vec<PriceRangeRecord>,
    #[serde(default, alias = "Plus Comp")]
    pub plus_comp: Vec<PriceRangeRecord>,
    #[serde(default, alias = "SV Cross Comp")]
    pub sv_cross_comp: Vec<PriceRangeRecord>,
}

/// One brand's complete pricing data. Every sub-table is optional; absence
/// means "this brand does not price that lens type" and searches against it
/// degrade to "no match".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandTable {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub single_vision: SingleVisionTables,
    #[serde(default, alias = "Bifocal KT")]
    pub bifocal_kt: Vec<PriceRangeRecord>,
    #[serde(default, alias = "CYL_KT")]
    pub cyl_kt: Vec<PriceRangeRecord>,
    #[serde(default, alias = "COMP_KT")]
    pub comp_kt: Vec<PriceRangeRecord>,
    #[serde(default, alias = "PROGRESSIVE_SPH")]
    pub progressive_sph: Vec<PriceRangeRecord>,
    #[serde(default, alias = "PROGRESSIVE__CYL")]
    pub progressive_cyl: Vec<PriceRangeRecord>,
    #[serde(default, alias = "PROGRESSIVE_COMP")]
    pub progressive_comp: Vec<PriceRangeRecord>,
}

/// Brand id and display name, for the selector UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandInfo {
    pub id: String,
    pub name: String,
}
