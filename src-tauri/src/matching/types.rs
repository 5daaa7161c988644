//! Type definitions for the prescription matching engine.
//!
//! These types support JSON serialization for frontend communication; the
//! brand-table types they reference live in `crate::brands::types`.

use serde::{Deserialize, Serialize};

use crate::brands::types::PriceRangeRecord;

/// Re-snap a power to the quarter-diopter grid after arithmetic.
///
/// Transposition adds sphere and cylinder; the addition of two quarter
/// multiples is exact in binary floating point, but derived values passed
/// back in from the UI may carry drift, so every computed power goes through
/// this before it is compared or returned.
pub fn round_quarter(value: f64) -> f64 {
    (value * 4.0).round() / 4.0
}

// =============================================================================
// PRESCRIPTION
// =============================================================================

/// One eye's prescription as entered (or as derived by transposition).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    /// Base lens power in diopters, quarter-quantized
    pub sphere: f64,
    /// Astigmatism correction power in diopters, quarter-quantized
    pub cylinder: f64,
    /// Cylinder orientation, 1-180 degrees; 0 means "not supplied"
    pub axis: u16,
}

impl Prescription {
    pub fn new(sphere: f64, cylinder: f64, axis: u16) -> Self {
        Self {
            sphere,
            cylinder,
            axis,
        }
    }

    /// The optically equivalent cross-cylinder form.
    ///
    /// `sphere' = sphere + cylinder`, `cylinder' = -cylinder`, and the axis
    /// flips by exactly 90 degrees (`<=90` gains 90, otherwise loses 90), so
    /// it stays within 1-180. An unsupplied axis (0) behaves as 90 here and
    /// therefore transposes to 180. Powers re-snap to the quarter grid.
    pub fn transposed(&self) -> Prescription {
        let axis = if self.axis == 0 { 90 } else { self.axis };
        Prescription {
            sphere: round_quarter(self.sphere + self.cylinder),
            cylinder: round_quarter(-self.cylinder),
            axis: if axis <= 90 { axis + 90 } else { axis - 90 },
        }
    }
}

// =============================================================================
// CATEGORY CLASSIFICATION
// =============================================================================

/// Single-vision pricing category, determined by the sign pattern of the
/// prescription. The three categories are a closed set matching the brand
/// table keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LensCategory {
    MinusComp,
    PlusComp,
    SvCrossComp,
}

impl LensCategory {
    /// Classify a prescription by sign pattern.
    ///
    /// Zero cylinder short-circuits to the sphere's sign. Otherwise a
    /// same-sign pair (zero counts as compatible with either sign) goes to
    /// Minus or Plus by the sphere's sign, and a crossed pair goes to
    /// SV Cross.
    pub fn classify(sphere: f64, cylinder: f64) -> LensCategory {
        if cylinder == 0.0 {
            return if sphere < 0.0 {
                LensCategory::MinusComp
            } else {
                LensCategory::PlusComp
            };
        }
        let same_sign = (sphere >= 0.0 && cylinder >= 0.0) || (sphere <= 0.0 && cylinder <= 0.0);
        if same_sign {
            if sphere < 0.0 {
                LensCategory::MinusComp
            } else {
                LensCategory::PlusComp
            }
        } else {
            LensCategory::SvCrossComp
        }
    }

    /// Display label, identical to the brand-table category key.
    pub fn label(&self) -> &'static str {
        match self {
            LensCategory::MinusComp => "Minus Comp",
            LensCategory::PlusComp => "Plus Comp",
            LensCategory::SvCrossComp => "SV Cross Comp",
        }
    }

    /// Search priority tier: same-sign categories outrank crossed signs.
    pub fn priority(&self) -> u8 {
        match self {
            LensCategory::MinusComp => 1,
            LensCategory::PlusComp => 2,
            LensCategory::SvCrossComp => 3,
        }
    }
}

/// Which form of the prescription a search step uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Original,
    Transposed,
}

impl Representation {
    pub fn label(&self) -> &'static str {
        match self {
            Representation::Original => "original",
            Representation::Transposed => "transposed",
        }
    }

    pub fn is_transposed(&self) -> bool {
        matches!(self, Representation::Transposed)
    }
}

/// The single-vision search policy as one declarative artifact.
///
/// Same-sign categories are tried before the crossed category, and within
/// each category the untransposed reading is tried before the transposed
/// one. The first pair that yields any record match wins.
pub const SINGLE_VISION_SEARCH_ORDER: [(LensCategory, Representation); 6] = [
    (LensCategory::MinusComp, Representation::Original),
    (LensCategory::MinusComp, Representation::Transposed),
    (LensCategory::PlusComp, Representation::Original),
    (LensCategory::PlusComp, Representation::Transposed),
    (LensCategory::SvCrossComp, Representation::Original),
    (LensCategory::SvCrossComp, Representation::Transposed),
];

// =============================================================================
// MATCH RESULTS (serialized to frontend)
// =============================================================================

/// A price range that matched, tagged with the representation that hit it.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedRecord {
    pub record: PriceRangeRecord,
    /// True when the transposed form of the prescription produced this match
    pub is_transposed: bool,
}

/// Which category and representation produced a single-vision match.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    /// Category label, e.g. "Minus Comp"
    pub category: String,
    /// "original" or "transposed"
    pub representation: String,
    /// Priority tier that fired (1 = Minus, 2 = Plus, 3 = SV Cross)
    pub priority: u8,
}

/// Full result of one calculation request.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    /// The prescription as entered
    pub original: Prescription,
    /// Transposed form, where the search computed one
    pub transposed: Option<Prescription>,
    /// Bucketed axis used against axis-bearing tables
    pub mapped_axis: Option<u16>,
    /// Every record that matched, best first
    pub matches: Vec<MatchedRecord>,
    /// The winning record; None when no range covers the prescription
    pub best_match: Option<MatchedRecord>,
    /// Populated for single-vision searches
    pub category_info: Option<CategoryInfo>,
    /// ADD power derived from near - distance, when the engine derived it
    pub calculated_add: Option<f64>,
    /// Near-vision sphere derived from distance + ADD, when derived
    pub calculated_near_sphere: Option<f64>,
    /// Human-readable account of which rule fired (or what was tried)
    pub search_strategy: String,
}

impl MatchResult {
    /// A result skeleton for searches that never computed a transposition.
    pub fn for_original(original: Prescription) -> Self {
        Self {
            original,
            transposed: None,
            mapped_axis: None,
            matches: Vec::new(),
            best_match: None,
            category_info: None,
            calculated_add: None,
            calculated_near_sphere: None,
            search_strategy: String::new(),
        }
    }
}
