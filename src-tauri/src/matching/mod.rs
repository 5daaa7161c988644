//! Prescription matching engine for lens pricing.
//!
//! This module turns a validated prescription plus one brand's price tables
//! into ranked range matches, applying the optical transposition and
//! category rules the tables were authored against.
//!
//! # Architecture
//!
//! - **Validation**: Raw form fields -> quarter-quantized powers and axes
//! - **Ranges**: Each table row's range string, parsed by grammar detection
//! - **Search**: Category/representation priority order for single vision;
//!   field-presence dispatch for the ADD-bearing designs
//! - **Results**: Every matching record plus a best match and a narrative of
//!   which rule fired
//!
//! # Example
//!
//! ```ignore
//! use lensquote::matching::MatchEngine;
//! use lensquote::brands::load_brand_data;
//!
//! let engine = MatchEngine::new(load_brand_data("visioncraft"));
//!
//! let result = engine.single_vision(-2.5, -1.0, 180);
//! if let Some(best) = result.best_match {
//!     println!("{} -> {:?}", best.record.range, best.record.prices);
//! }
//! println!("{}", result.search_strategy);
//! ```

mod engine;
mod range;
mod types;
pub mod validate;

pub use engine::{AddPowerInput, MatchEngine};
pub use range::{map_axis, RangeSpec};
pub use types::*;
