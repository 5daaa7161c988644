//! Classification and priority search over one brand's tables.
//!
//! `MatchEngine` wraps an immutable brand table and answers calculation
//! requests: single vision, bifocal KT, and progressive. All searches are
//! pure, synchronous walks over the small per-category record lists; the
//! engine never mutates the table and holds no state between calls.

use crate::brands::types::{BrandTable, PriceRangeRecord};
use crate::error::LensQuoteError;

use super::range::{map_axis, RangeSpec};
use super::types::{
    round_quarter, CategoryInfo, LensCategory, MatchResult, MatchedRecord, Prescription,
    SINGLE_VISION_SEARCH_ORDER,
};
use super::validate;

/// Typed inputs for the ADD-bearing calculation modes.
///
/// `near_sphere` and `add_power` are `None` when the field was left empty;
/// the engine derives the missing one before validating the ADD window.
#[derive(Debug, Clone, Copy)]
pub struct AddPowerInput {
    /// Distance-vision sphere
    pub sphere: f64,
    /// Distance-vision cylinder; non-zero reroutes to the cylinder/compound
    /// tables
    pub cylinder: f64,
    pub axis: u16,
    pub near_sphere: Option<f64>,
    pub add_power: Option<f64>,
}

/// The three tables an ADD-bearing mode can land in, with their sheet names
/// for narratives and error messages.
struct DesignTables<'a> {
    add_table: &'a [PriceRangeRecord],
    add_label: &'a str,
    cyl_table: &'a [PriceRangeRecord],
    cyl_label: &'a str,
    comp_table: &'a [PriceRangeRecord],
    comp_label: &'a str,
}

/// The prescription matching engine.
pub struct MatchEngine {
    brand: BrandTable,
}

impl MatchEngine {
    /// Create an engine over a loaded brand table (typically from
    /// `brands::load_brand_data`).
    pub fn new(brand: BrandTable) -> Self {
        Self { brand }
    }

    pub fn brand_name(&self) -> &str {
        &self.brand.name
    }

    /// Single-vision search.
    ///
    /// Walks `SINGLE_VISION_SEARCH_ORDER`: same-sign categories before the
    /// crossed one, original reading before transposed within each. The
    /// first (category, representation) pair with any hit wins; every hit in
    /// that pair is returned, first one as `best_match`. No hit anywhere is
    /// a valid result, not an error.
    pub fn single_vision(&self, sphere: f64, cylinder: f64, axis: u16) -> MatchResult {
        let original = Prescription::new(sphere, cylinder, axis);
        let transposed = original.transposed();

        for (category, representation) in SINGLE_VISION_SEARCH_ORDER {
            let candidate = if representation.is_transposed() {
                transposed
            } else {
                original
            };
            let hits = collect_power_matches(
                self.single_vision_records(category),
                candidate,
                representation.is_transposed(),
            );
            if !hits.is_empty() {
                let mut result = MatchResult::for_original(original);
                result.transposed = Some(transposed);
                result.best_match = Some(hits[0].clone());
                result.matches = hits;
                result.category_info = Some(CategoryInfo {
                    category: category.label().to_string(),
                    representation: representation.label().to_string(),
                    priority: category.priority(),
                });
                result.search_strategy = format!(
                    "Matched {} using {} values (priority {})",
                    category.label(),
                    representation.label(),
                    category.priority()
                );
                return result;
            }
        }

        let classified = LensCategory::classify(sphere, cylinder);
        let mut result = MatchResult::for_original(original);
        result.transposed = Some(transposed);
        result.search_strategy = format!(
            "No {} single-vision range covers sphere {:+.2} / cylinder {:+.2} \
             (classified {}; tried Minus, Plus and SV Cross with original and transposed values)",
            self.brand.name,
            sphere,
            cylinder,
            classified.label()
        );
        result
    }

    /// Bifocal KT calculation: ADD search over `bifocal_kt`, rerouted to
    /// `cyl_kt`/`comp_kt` when a cylinder is present.
    pub fn bifocal(&self, input: AddPowerInput) -> Result<MatchResult, LensQuoteError> {
        self.add_design_search(
            input,
            DesignTables {
                add_table: &self.brand.bifocal_kt,
                add_label: "Bifocal KT",
                cyl_table: &self.brand.cyl_kt,
                cyl_label: "CYL_KT",
                comp_table: &self.brand.comp_kt,
                comp_label: "COMP_KT",
            },
        )
    }

    /// Progressive calculation: same dispatch as bifocal, against the
    /// progressive tables.
    pub fn progressive(&self, input: AddPowerInput) -> Result<MatchResult, LensQuoteError> {
        self.add_design_search(
            input,
            DesignTables {
                add_table: &self.brand.progressive_sph,
                add_label: "PROGRESSIVE_SPH",
                cyl_table: &self.brand.progressive_cyl,
                cyl_label: "PROGRESSIVE__CYL",
                comp_table: &self.brand.progressive_comp,
                comp_label: "PROGRESSIVE_COMP",
            },
        )
    }

    /// Field-presence dispatch shared by bifocal and progressive: cylinder
    /// plus sphere goes to the compound table, cylinder alone to the
    /// cylinder table, otherwise the ADD-encoded table.
    fn add_design_search(
        &self,
        input: AddPowerInput,
        tables: DesignTables,
    ) -> Result<MatchResult, LensQuoteError> {
        if input.cylinder != 0.0 {
            if input.sphere != 0.0 {
                self.compound_search(
                    tables.comp_table,
                    tables.comp_label,
                    input.sphere,
                    input.cylinder,
                    input.axis,
                )
            } else {
                self.cylinder_search(tables.cyl_table, tables.cyl_label, input.cylinder, input.axis)
            }
        } else {
            self.add_power_search(tables.add_table, tables.add_label, input)
        }
    }

    /// ADD-encoded table search against the distance sphere.
    ///
    /// Derives the missing one of (ADD, near sphere) first, then validates
    /// the ADD window before touching the table. Among hits, the record
    /// whose encoded base is closest to the sphere wins; ties go to the
    /// higher base.
    fn add_power_search(
        &self,
        table: &[PriceRangeRecord],
        label: &str,
        input: AddPowerInput,
    ) -> Result<MatchResult, LensQuoteError> {
        let sphere = input.sphere;
        let (add_power, calculated_add, calculated_near) =
            match (input.add_power, input.near_sphere) {
                (Some(add), Some(_)) => (add, None, None),
                (Some(add), None) => (add, None, Some(round_quarter(sphere + add))),
                (None, Some(near)) => {
                    let add = round_quarter(near - sphere);
                    (add, Some(add), None)
                }
                (None, None) => {
                    return Err(LensQuoteError::Validation(
                        validate::ADD_INPUT_REQUIRED_MESSAGE.to_string(),
                    ))
                }
            };
        validate::validate_add_power(add_power)?;

        let mut hits: Vec<(f64, MatchedRecord)> = table
            .iter()
            .filter_map(|record| {
                let spec = RangeSpec::parse(&record.range)?;
                if spec.matches_power(sphere, 0.0) {
                    Some((
                        spec.add_base().unwrap_or(0.0),
                        MatchedRecord {
                            record: record.clone(),
                            is_transposed: false,
                        },
                    ))
                } else {
                    None
                }
            })
            .collect();
        hits.sort_by(|a, b| {
            let da = (sphere - a.0).abs();
            let db = (sphere - b.0).abs();
            da.total_cmp(&db).then(b.0.total_cmp(&a.0))
        });
        let matches: Vec<MatchedRecord> = hits.into_iter().map(|(_, hit)| hit).collect();

        let mut result = MatchResult::for_original(Prescription::new(sphere, 0.0, 0));
        result.search_strategy = if matches.is_empty() {
            format!(
                "No {} range covers sphere {:+.2} with ADD {:+.2}",
                label, sphere, add_power
            )
        } else {
            format!(
                "Matched {} on sphere {:+.2} with ADD {:+.2} (closest base wins)",
                label, sphere, add_power
            )
        };
        result.best_match = matches.first().cloned();
        result.matches = matches;
        result.calculated_add = calculated_add;
        result.calculated_near_sphere = calculated_near;
        Ok(result)
    }

    /// Cylinder-only table search. Requires non-zero cylinder and an axis;
    /// the bucketed axis must equal each record's encoded axis exactly.
    fn cylinder_search(
        &self,
        table: &[PriceRangeRecord],
        label: &str,
        cylinder: f64,
        axis: u16,
    ) -> Result<MatchResult, LensQuoteError> {
        if cylinder == 0.0 {
            return Err(LensQuoteError::Validation(
                validate::cylinder_required_message(label),
            ));
        }
        if axis == 0 {
            return Err(LensQuoteError::Validation(
                validate::AXIS_REQUIRED_MESSAGE.to_string(),
            ));
        }

        let original = Prescription::new(0.0, cylinder, axis);
        let mapped = map_axis(axis);
        let matches = collect_axis_matches(table, original, false);

        let mut result = MatchResult::for_original(original);
        result.mapped_axis = Some(mapped);
        result.search_strategy = if matches.is_empty() {
            format!(
                "No {} range covers cylinder {:+.2} at axis {} (bucketed to {})",
                label, cylinder, axis, mapped
            )
        } else {
            format!(
                "Matched {} on cylinder {:+.2} at axis {} (bucketed to {})",
                label, cylinder, axis, mapped
            )
        };
        result.best_match = matches.first().cloned();
        result.matches = matches;
        Ok(result)
    }

    /// Compound table search: original representation, then transposed
    /// (whose transposition also flips the axis by 90). When both
    /// representations hit, the merged list is ranked both-positive, then
    /// both-negative, then mixed signs.
    fn compound_search(
        &self,
        table: &[PriceRangeRecord],
        label: &str,
        sphere: f64,
        cylinder: f64,
        axis: u16,
    ) -> Result<MatchResult, LensQuoteError> {
        if axis == 0 {
            return Err(LensQuoteError::Validation(
                validate::AXIS_REQUIRED_MESSAGE.to_string(),
            ));
        }

        let original = Prescription::new(sphere, cylinder, axis);
        let transposed = original.transposed();

        let mut matches = collect_axis_matches(table, original, false);
        let from_transposed = collect_axis_matches(table, transposed, true);
        let original_hit = !matches.is_empty();
        let transposed_hit = !from_transposed.is_empty();
        matches.extend(from_transposed);

        let original_rank = sign_rank(original);
        let transposed_rank = sign_rank(transposed);
        matches.sort_by_key(|hit| {
            if hit.is_transposed {
                transposed_rank
            } else {
                original_rank
            }
        });

        let mut result = MatchResult::for_original(original);
        result.transposed = Some(transposed);
        result.mapped_axis = Some(map_axis(axis));
        result.search_strategy = match (original_hit, transposed_hit) {
            (true, true) => format!(
                "{}: matches from original and transposed values; \
                 ranked both-positive, then both-negative, then mixed signs",
                label
            ),
            (true, false) => format!("Matched {} using original values", label),
            (false, true) => {
                format!("Matched {} using transposed values (original had no match)", label)
            }
            (false, false) => format!(
                "No {} range covers this prescription (tried original and transposed values)",
                label
            ),
        };
        result.best_match = matches.first().cloned();
        result.matches = matches;
        Ok(result)
    }

    fn single_vision_records(&self, category: LensCategory) -> &[PriceRangeRecord] {
        match category {
            LensCategory::MinusComp => &self.brand.single_vision.minus_comp,
            LensCategory::PlusComp => &self.brand.single_vision.plus_comp,
            LensCategory::SvCrossComp => &self.brand.single_vision.sv_cross_comp,
        }
    }
}

fn collect_power_matches(
    records: &[PriceRangeRecord],
    candidate: Prescription,
    is_transposed: bool,
) -> Vec<MatchedRecord> {
    records
        .iter()
        .filter(|record| {
            RangeSpec::parse(&record.range)
                .map_or(false, |spec| spec.matches_power(candidate.sphere, candidate.cylinder))
        })
        .map(|record| MatchedRecord {
            record: record.clone(),
            is_transposed,
        })
        .collect()
}

fn collect_axis_matches(
    records: &[PriceRangeRecord],
    candidate: Prescription,
    is_transposed: bool,
) -> Vec<MatchedRecord> {
    records
        .iter()
        .filter(|record| {
            RangeSpec::parse(&record.range).map_or(false, |spec| {
                spec.matches_with_axis(candidate.sphere, candidate.cylinder, candidate.axis)
            })
        })
        .map(|record| MatchedRecord {
            record: record.clone(),
            is_transposed,
        })
        .collect()
}

/// Sign-priority rank for compound matches: both-positive outranks
/// both-negative outranks mixed.
fn sign_rank(rx: Prescription) -> u8 {
    if rx.sphere > 0.0 && rx.cylinder > 0.0 {
        0
    } else if rx.sphere < 0.0 && rx.cylinder < 0.0 {
        1
    } else {
        2
    }
}
