//! Range-string parsing and matching.
//!
//! Brand tables encode their pricing windows as short strings in one of four
//! grammars, auto-detected by content:
//!
//! - bounded pair: `"-6.0 to -2.0"` (sphere limit, then cylinder limit)
//! - single sphere: `"-25.0 sph"`
//! - ADD-encoded base: `"+3/+ ADD"` or `"-3/ADD"`
//! - power/axis combination: `"+2/+1 180°"` (COMP) or `"-2, 90"` (CYL)
//!
//! Parsing and matching are pure; a malformed range string simply never
//! matches. The tolerance and bucket tables below are policy constants, kept
//! as data so they can be retuned without touching the predicates.

/// Matching window for the `"<V> sph"` grammar, in diopters. The sphere must
/// be within this distance of the encoded value and the cylinder within the
/// same distance of zero. Deliberately coarse; carried from the source data.
pub const SPHERE_MATCH_WINDOW: f64 = 1.0;

/// Largest ADD-grammar base whose window is anchored at zero. Beyond it,
/// each base covers a one-diopter tile ending at the base.
const ADD_FIRST_STEP_LIMIT: f64 = 2.0;

/// Span of an ADD-grammar tile beyond the first step: the window is
/// `[B - 0.75, B]` (mirrored for negative bases), leaving a 0.25 gap after
/// the previous tile's boundary.
const ADD_STEP_SPAN: f64 = 0.75;

/// Cylinder magnitude buckets for the power/axis grammar: `(lo, hi, label)`,
/// inclusive on both ends. The encoded cylinder's magnitude must equal the
/// label of the bucket the input falls in.
const CYLINDER_BUCKETS: [(f64, f64, u8); 4] = [
    (0.25, 1.0, 1),
    (1.25, 2.0, 2),
    (2.25, 3.0, 3),
    (3.25, 4.0, 4),
];

/// Sphere magnitude buckets for COMP-table records. The first bucket is
/// wider than the rest; labels start at 2 to match the encoded values.
const COMPOUND_SPHERE_BUCKETS: [(f64, f64, u8); 5] = [
    (0.25, 2.0, 2),
    (2.25, 3.0, 3),
    (3.25, 4.0, 4),
    (4.25, 5.0, 5),
    (5.25, 6.0, 6),
];

/// A parsed range string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeSpec {
    /// `"<A> to <B>"`: zero-anchored interval per limit, both must hold
    Bounded {
        sphere_limit: f64,
        cylinder_limit: f64,
    },
    /// `"<V> sph"`: sphere near V, cylinder near zero
    SingleSphere { base: f64 },
    /// `"<B>/+ ADD"` / `"<B>/ADD"`: stepped sphere window anchored at B
    AddBase { base: f64 },
    /// `"<S>/<C> <axis>°"` or `"<C>, <axis>"`: bucketed powers plus exact
    /// bucketed-axis equality
    PowerAxis {
        sphere: Option<f64>,
        cylinder: f64,
        axis: u16,
    },
}

impl RangeSpec {
    /// Parse a range string, detecting the grammar from its shape.
    /// Returns None for anything malformed.
    pub fn parse(raw: &str) -> Option<RangeSpec> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Some((sphere, cylinder)) = raw.split_once(" to ") {
            return Some(RangeSpec::Bounded {
                sphere_limit: parse_power(sphere)?,
                cylinder_limit: parse_power(cylinder)?,
            });
        }
        if let Some(value) = raw.strip_suffix("sph") {
            return Some(RangeSpec::SingleSphere {
                base: parse_power(value)?,
            });
        }
        if raw.contains("ADD") {
            // "+3/+ ADD" and "-3/ADD" both carry the base before the slash.
            let (base, _) = raw.split_once('/')?;
            return Some(RangeSpec::AddBase {
                base: parse_power(base)?,
            });
        }
        if let Some((cylinder, axis)) = raw.split_once(',') {
            return Some(RangeSpec::PowerAxis {
                sphere: None,
                cylinder: parse_power(cylinder)?,
                axis: parse_axis(axis)?,
            });
        }
        if let Some((sphere, rest)) = raw.split_once('/') {
            let mut parts = rest.split_whitespace();
            let cylinder = parts.next()?;
            let axis = parts.next()?;
            if parts.next().is_some() {
                return None;
            }
            return Some(RangeSpec::PowerAxis {
                sphere: Some(parse_power(sphere)?),
                cylinder: parse_power(cylinder)?,
                axis: parse_axis(axis)?,
            });
        }
        None
    }

    /// Test a prescription's powers against this range.
    ///
    /// Power/axis specs never match here; they need [`matches_with_axis`].
    ///
    /// [`matches_with_axis`]: RangeSpec::matches_with_axis
    pub fn matches_power(&self, sphere: f64, cylinder: f64) -> bool {
        match *self {
            RangeSpec::Bounded {
                sphere_limit,
                cylinder_limit,
            } => in_zero_anchored(sphere, sphere_limit) && in_zero_anchored(cylinder, cylinder_limit),
            RangeSpec::SingleSphere { base } => {
                (sphere - base).abs() <= SPHERE_MATCH_WINDOW
                    && cylinder.abs() <= SPHERE_MATCH_WINDOW
            }
            RangeSpec::AddBase { base } => cylinder == 0.0 && add_window_contains(base, sphere),
            RangeSpec::PowerAxis { .. } => false,
        }
    }

    /// Test a prescription against a power/axis spec: bucketed magnitudes
    /// must equal the encoded magnitudes, signs must agree, and the bucketed
    /// input axis must equal the encoded axis exactly.
    pub fn matches_with_axis(&self, sphere: f64, cylinder: f64, axis: u16) -> bool {
        let (enc_sphere, enc_cylinder, enc_axis) = match *self {
            RangeSpec::PowerAxis {
                sphere,
                cylinder,
                axis,
            } => (sphere, cylinder, axis),
            _ => return false,
        };

        let cylinder_ok = match cylinder_bucket(cylinder.abs()) {
            Some(bucket) => {
                f64::from(bucket) == enc_cylinder.abs() && same_sign(cylinder, enc_cylinder)
            }
            None => false,
        };
        if !cylinder_ok {
            return false;
        }

        let sphere_ok = match enc_sphere {
            Some(encoded) => match compound_sphere_bucket(sphere.abs()) {
                Some(bucket) => f64::from(bucket) == encoded.abs() && same_sign(sphere, encoded),
                None => false,
            },
            // CYL records carry no sphere; the caller guarantees sphere == 0.
            None => true,
        };

        sphere_ok && map_axis(axis) == enc_axis
    }

    /// The encoded base of an ADD-grammar spec, for best-match ranking.
    pub fn add_base(&self) -> Option<f64> {
        match *self {
            RangeSpec::AddBase { base } => Some(base),
            _ => None,
        }
    }
}

/// Quantize a clinical axis into the four discrete axes that appear in
/// cylinder/axis pricing tables. Unsupplied (0) lands in the 180 bucket;
/// callers wanting a different default substitute before calling.
pub fn map_axis(axis: u16) -> u16 {
    match axis {
        21..=69 => 45,
        70..=110 => 90,
        111..=155 => 135,
        _ => 180,
    }
}

/// Bucket a cylinder magnitude, or None when it falls outside every bucket
/// (including the sub-0.25 gap around zero).
pub fn cylinder_bucket(magnitude: f64) -> Option<u8> {
    CYLINDER_BUCKETS
        .iter()
        .find(|(lo, hi, _)| magnitude >= *lo && magnitude <= *hi)
        .map(|(_, _, label)| *label)
}

/// Bucket a sphere magnitude for COMP-table matching.
pub fn compound_sphere_bucket(magnitude: f64) -> Option<u8> {
    COMPOUND_SPHERE_BUCKETS
        .iter()
        .find(|(lo, hi, _)| magnitude >= *lo && magnitude <= *hi)
        .map(|(_, _, label)| *label)
}

fn same_sign(a: f64, b: f64) -> bool {
    (a > 0.0) == (b > 0.0)
}

/// The interval between zero and `limit`, inclusive, on whichever side of
/// zero the limit's sign puts it.
fn in_zero_anchored(value: f64, limit: f64) -> bool {
    if limit >= 0.0 {
        value >= 0.0 && value <= limit
    } else {
        value >= limit && value <= 0.0
    }
}

/// Stepped ADD window: bases up to ±2 cover everything from zero to the
/// base; beyond that each base covers only its own tile ending at the base.
fn add_window_contains(base: f64, sphere: f64) -> bool {
    if base >= 0.0 {
        if base <= ADD_FIRST_STEP_LIMIT {
            sphere >= 0.0 && sphere <= base
        } else {
            sphere >= base - ADD_STEP_SPAN && sphere <= base
        }
    } else if base >= -ADD_FIRST_STEP_LIMIT {
        sphere >= base && sphere <= 0.0
    } else {
        sphere >= base && sphere <= base + ADD_STEP_SPAN
    }
}

fn parse_power(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

fn parse_axis(raw: &str) -> Option<u16> {
    raw.trim().trim_end_matches('°').parse::<u16>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bounded_pair() {
        assert_eq!(
            RangeSpec::parse("-6.0 to -2.0"),
            Some(RangeSpec::Bounded {
                sphere_limit: -6.0,
                cylinder_limit: -2.0
            })
        );
        assert_eq!(
            RangeSpec::parse("+1.75 to -2.0"),
            Some(RangeSpec::Bounded {
                sphere_limit: 1.75,
                cylinder_limit: -2.0
            })
        );
    }

    #[test]
    fn test_parse_single_sphere() {
        assert_eq!(
            RangeSpec::parse("-25.0 sph"),
            Some(RangeSpec::SingleSphere { base: -25.0 })
        );
    }

    #[test]
    fn test_parse_add_base_both_forms() {
        assert_eq!(
            RangeSpec::parse("+3/+ ADD"),
            Some(RangeSpec::AddBase { base: 3.0 })
        );
        assert_eq!(
            RangeSpec::parse("-3/ADD"),
            Some(RangeSpec::AddBase { base: -3.0 })
        );
    }

    #[test]
    fn test_parse_power_axis_forms() {
        assert_eq!(
            RangeSpec::parse("+2/+1 180°"),
            Some(RangeSpec::PowerAxis {
                sphere: Some(2.0),
                cylinder: 1.0,
                axis: 180
            })
        );
        assert_eq!(
            RangeSpec::parse("-2, 90"),
            Some(RangeSpec::PowerAxis {
                sphere: None,
                cylinder: -2.0,
                axis: 90
            })
        );
        // Degree sign optional on COMP records
        assert_eq!(
            RangeSpec::parse("-3/-2 45"),
            Some(RangeSpec::PowerAxis {
                sphere: Some(-3.0),
                cylinder: -2.0,
                axis: 45
            })
        );
    }

    #[test]
    fn test_parse_malformed_returns_none() {
        assert_eq!(RangeSpec::parse(""), None);
        assert_eq!(RangeSpec::parse("gibberish"), None);
        assert_eq!(RangeSpec::parse("x to y"), None);
        assert_eq!(RangeSpec::parse("ADD"), None);
        assert_eq!(RangeSpec::parse("+2/"), None);
        assert_eq!(RangeSpec::parse("-2, axis"), None);
        assert_eq!(RangeSpec::parse("+2/+1 180 extra"), None);
    }

    #[test]
    fn test_bounded_zero_anchored_both_negative() {
        let spec = RangeSpec::parse("-6.0 to -2.0").unwrap();
        assert!(spec.matches_power(-2.5, -1.0));
        assert!(spec.matches_power(0.0, 0.0));
        assert!(spec.matches_power(-6.0, -2.0));
        assert!(!spec.matches_power(-6.25, -1.0));
        assert!(!spec.matches_power(-2.5, 0.25), "positive cylinder outside");
    }

    #[test]
    fn test_bounded_mixed_sign_limits() {
        let spec = RangeSpec::parse("+1.75 to -2.0").unwrap();
        assert!(spec.matches_power(1.0, -1.5));
        assert!(spec.matches_power(0.0, -2.0));
        assert!(spec.matches_power(1.75, 0.0));
        assert!(!spec.matches_power(2.0, -1.5));
        assert!(!spec.matches_power(-0.25, -1.5));
    }

    #[test]
    fn test_single_sphere_window() {
        let spec = RangeSpec::parse("-25.0 sph").unwrap();
        assert!(spec.matches_power(-24.5, 0.0));
        assert!(spec.matches_power(-26.0, -1.0));
        assert!(!spec.matches_power(-23.75, 0.0));
        assert!(!spec.matches_power(-25.0, -1.25), "cylinder outside window");
    }

    #[test]
    fn test_add_window_small_base_anchors_at_zero() {
        let spec = RangeSpec::parse("+2/+ ADD").unwrap();
        assert!(spec.matches_power(0.0, 0.0));
        assert!(spec.matches_power(2.0, 0.0));
        assert!(!spec.matches_power(2.25, 0.0));
        assert!(!spec.matches_power(-0.25, 0.0));
    }

    #[test]
    fn test_add_window_stepped_beyond_two() {
        let spec = RangeSpec::parse("+3/+ ADD").unwrap();
        assert!(spec.matches_power(2.25, 0.0));
        assert!(spec.matches_power(3.0, 0.0));
        assert!(!spec.matches_power(2.0, 0.0), "0.25 gap below the tile");
        assert!(!spec.matches_power(3.25, 0.0));

        let neg = RangeSpec::parse("-3/ADD").unwrap();
        assert!(neg.matches_power(-3.0, 0.0));
        assert!(neg.matches_power(-2.25, 0.0));
        assert!(!neg.matches_power(-2.0, 0.0));
    }

    #[test]
    fn test_add_window_requires_zero_cylinder() {
        let spec = RangeSpec::parse("+2/+ ADD").unwrap();
        assert!(!spec.matches_power(1.0, -0.25));
    }

    #[test]
    fn test_map_axis_buckets() {
        assert_eq!(map_axis(21), 45);
        assert_eq!(map_axis(69), 45);
        assert_eq!(map_axis(70), 90);
        assert_eq!(map_axis(110), 90);
        assert_eq!(map_axis(111), 135);
        assert_eq!(map_axis(155), 135);
        assert_eq!(map_axis(156), 180);
        assert_eq!(map_axis(180), 180);
        assert_eq!(map_axis(20), 180);
        assert_eq!(map_axis(0), 180, "unsupplied axis lands in 180");
    }

    #[test]
    fn test_cylinder_bucket_edges() {
        assert_eq!(cylinder_bucket(0.25), Some(1));
        assert_eq!(cylinder_bucket(1.0), Some(1));
        assert_eq!(cylinder_bucket(1.25), Some(2));
        assert_eq!(cylinder_bucket(4.0), Some(4));
        assert_eq!(cylinder_bucket(0.0), None);
        assert_eq!(cylinder_bucket(1.1), None, "between buckets");
        assert_eq!(cylinder_bucket(4.25), None);
    }

    #[test]
    fn test_compound_sphere_bucket_edges() {
        assert_eq!(compound_sphere_bucket(0.25), Some(2));
        assert_eq!(compound_sphere_bucket(2.0), Some(2));
        assert_eq!(compound_sphere_bucket(2.25), Some(3));
        assert_eq!(compound_sphere_bucket(6.0), Some(6));
        assert_eq!(compound_sphere_bucket(6.25), None);
    }

    #[test]
    fn test_power_axis_match_cyl_record() {
        let spec = RangeSpec::parse("-2, 90").unwrap();
        // |-1.75| buckets to 2, signs agree, axis 95 buckets to 90
        assert!(spec.matches_with_axis(0.0, -1.75, 95));
        assert!(spec.matches_with_axis(0.0, -1.25, 90));
        assert!(!spec.matches_with_axis(0.0, 1.75, 95), "sign mismatch");
        assert!(!spec.matches_with_axis(0.0, -0.75, 95), "wrong bucket");
        assert!(!spec.matches_with_axis(0.0, -1.75, 45), "wrong axis bucket");
    }

    #[test]
    fn test_power_axis_match_comp_record() {
        let spec = RangeSpec::parse("+2/+1 180°").unwrap();
        assert!(spec.matches_with_axis(1.5, 0.75, 170));
        assert!(spec.matches_with_axis(0.25, 1.0, 180));
        assert!(!spec.matches_with_axis(-1.5, 0.75, 170), "sphere sign");
        assert!(!spec.matches_with_axis(2.25, 0.75, 170), "sphere bucket 3");
        assert!(!spec.matches_with_axis(1.5, 0.75, 90), "axis mismatch");
    }

    #[test]
    fn test_non_axis_specs_never_match_with_axis() {
        let spec = RangeSpec::parse("-6.0 to -2.0").unwrap();
        assert!(!spec.matches_with_axis(-2.5, -1.0, 90));
    }

    #[test]
    fn test_power_axis_never_matches_without_axis() {
        let spec = RangeSpec::parse("+2/+1 180°").unwrap();
        assert!(!spec.matches_power(1.5, 0.75));
    }
}
