//! Boundary validation for calculation requests.
//!
//! Every command parses its raw form fields through these helpers before any
//! matching logic runs, so the engine itself only ever sees quarter-quantized
//! powers and in-range axes. Violations surface as user-facing messages, not
//! faults.

use crate::error::LensQuoteError;

/// Canonical quarter-step violation message, shown verbatim in the UI.
pub const QUARTER_STEP_MESSAGE: &str =
    "Values must be in 0.25 intervals (e.g., -0.25, -0.50, -0.75, etc.)";

/// Canonical out-of-window ADD power message, shown verbatim in the UI.
pub const ADD_RANGE_MESSAGE: &str = "ADD Power must be between +1.0 and +3.0";

/// Message when an ADD-mode calculation has neither an ADD power nor a
/// near-vision sphere to derive one from.
pub const ADD_INPUT_REQUIRED_MESSAGE: &str =
    "Enter an ADD Power or a Near Vision sphere";

/// Message when a cylinder-bearing lookup is requested without an axis.
pub const AXIS_REQUIRED_MESSAGE: &str = "Axis is required when cylinder power is entered";

/// Accepted ADD power window, inclusive.
pub const ADD_MIN: f64 = 1.0;
pub const ADD_MAX: f64 = 3.0;

/// Tolerance applied after scaling to quarter units; absorbs float drift
/// without accepting genuinely off-grid values like 0.3 or 0.251.
const QUARTER_TOLERANCE: f64 = 1e-9;

/// True when the value sits on the quarter-diopter grid. Zero is valid
/// (optional fields default to it).
pub fn is_quarter_step(value: f64) -> bool {
    let scaled = value * 4.0;
    (scaled - scaled.round()).abs() <= QUARTER_TOLERANCE
}

/// Parse a power field. Empty means zero; anything else must be a number on
/// the quarter grid.
pub fn parse_power(label: &str, raw: &str) -> Result<f64, LensQuoteError> {
    match parse_optional_power(label, raw)? {
        Some(value) => Ok(value),
        None => Ok(0.0),
    }
}

/// Parse a power field where empty means "not supplied" rather than zero
/// (near-vision sphere, ADD power).
pub fn parse_optional_power(label: &str, raw: &str) -> Result<Option<f64>, LensQuoteError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| LensQuoteError::Validation(format!("{label} must be a number")))?;
    if !is_quarter_step(value) {
        return Err(LensQuoteError::Validation(QUARTER_STEP_MESSAGE.to_string()));
    }
    Ok(Some(value))
}

/// Parse an axis field. Empty (or 0) means "not supplied"; otherwise a whole
/// number from 1 to 180.
pub fn parse_axis(raw: &str) -> Result<u16, LensQuoteError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    let value: u16 = trimmed.parse().map_err(|_| {
        LensQuoteError::Validation("Axis must be a whole number between 1 and 180".to_string())
    })?;
    if value > 180 {
        return Err(LensQuoteError::Validation(
            "Axis must be between 1 and 180".to_string(),
        ));
    }
    Ok(value)
}

/// Check a (possibly derived) ADD power against the accepted window.
pub fn validate_add_power(add: f64) -> Result<(), LensQuoteError> {
    if !(ADD_MIN..=ADD_MAX).contains(&add) {
        return Err(LensQuoteError::Validation(ADD_RANGE_MESSAGE.to_string()));
    }
    Ok(())
}

/// Message when a path that needs a non-zero cylinder got zero.
pub fn cylinder_required_message(table: &str) -> String {
    format!("Cylinder power must be non-zero for {table} pricing")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_step_accepts_grid_values() {
        for value in [0.0, 0.25, -0.25, 0.5, -0.75, 1.75, -6.0, 12.25] {
            assert!(is_quarter_step(value), "{value} should be valid");
        }
    }

    #[test]
    fn test_quarter_step_rejects_off_grid() {
        for value in [0.1, -0.3, 0.126, 0.251, 1.8, -2.6] {
            assert!(!is_quarter_step(value), "{value} should be invalid");
        }
    }

    #[test]
    fn test_quarter_step_tolerates_float_drift() {
        // 0.1 + 0.65 is 0.7500000000000001 in binary
        assert!(is_quarter_step(0.1 + 0.65));
    }

    #[test]
    fn test_parse_power_empty_is_zero() {
        assert_eq!(parse_power("Sphere", "").unwrap(), 0.0);
        assert_eq!(parse_power("Sphere", "  ").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_power_accepts_signed_values() {
        assert_eq!(parse_power("Sphere", "-2.5").unwrap(), -2.5);
        assert_eq!(parse_power("Sphere", "+1.75").unwrap(), 1.75);
    }

    #[test]
    fn test_parse_power_rejects_garbage() {
        let err = parse_power("Sphere", "abc").unwrap_err();
        assert_eq!(String::from(err), "Sphere must be a number");
    }

    #[test]
    fn test_parse_power_rejects_off_grid() {
        let err = parse_power("Cylinder", "-1.3").unwrap_err();
        assert_eq!(String::from(err), QUARTER_STEP_MESSAGE);
    }

    #[test]
    fn test_parse_optional_power_empty_is_none() {
        assert_eq!(parse_optional_power("ADD Power", "").unwrap(), None);
        assert_eq!(
            parse_optional_power("ADD Power", "2.0").unwrap(),
            Some(2.0)
        );
    }

    #[test]
    fn test_parse_axis_bounds() {
        assert_eq!(parse_axis("").unwrap(), 0);
        assert_eq!(parse_axis("1").unwrap(), 1);
        assert_eq!(parse_axis("180").unwrap(), 180);
        assert!(parse_axis("181").is_err());
        assert!(parse_axis("-10").is_err());
        assert!(parse_axis("ninety").is_err());
    }

    #[test]
    fn test_add_power_window() {
        assert!(validate_add_power(1.0).is_ok());
        assert!(validate_add_power(3.0).is_ok());
        assert!(validate_add_power(2.25).is_ok());
        let err = validate_add_power(3.5).unwrap_err();
        assert_eq!(String::from(err), ADD_RANGE_MESSAGE);
        assert!(validate_add_power(0.75).is_err());
    }
}
