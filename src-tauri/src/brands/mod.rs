//! Brand pricing tables: types, embedded sheets, and lookup.
//!
//! A brand table is an immutable snapshot; the engine only reads it, and
//! each calculation request gets its own copy. Loading never fails outward:
//! unknown ids and broken user files fall back to the default brand.

mod loader;
pub mod types;

pub use loader::{
    available_brands, default_brand, load_brand_data, load_brand_file, user_brands_dir,
};
