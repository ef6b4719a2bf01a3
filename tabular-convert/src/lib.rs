//! FILENAME: tabular-convert/src/lib.rs
//! PURPOSE: On-demand converters and converter profiles for tabular-engine.
//! CONTEXT: `tabular-engine` ships only a pass-through on-demand converter.
//! This crate provides the numeric, text, temporal and boolean converters,
//! a kind-keyed composite (`OnDemandMapper`), a bulk adapter
//! (`CoerceColumn`) and a serde-loadable `ConverterProfile` tying them
//! together.

pub mod boolean;
pub mod coerce;
pub mod error;
pub mod numeric;
pub mod on_demand_mapper;
pub mod profile;
pub mod temporal;
pub mod text;

pub use boolean::BooleanConverter;
pub use coerce::CoerceColumn;
pub use error::{LoadError, ProfileError};
pub use numeric::NumericConverter;
pub use on_demand_mapper::OnDemandMapper;
pub use profile::{ConverterProfile, EnabledConverters, FormatSettings};
pub use temporal::TemporalConverter;
pub use text::TextConverter;

use std::sync::Arc;

use tabular_engine::{TabularCache, TabularSource};

/// Loads `source` into a cache configured by `profile`: columns listed in
/// the profile's remap table are coerced at load time and typed access
/// falls back to the profile's on-demand converters.
pub fn load_with_profile<S: TabularSource + ?Sized>(
    source: &mut S,
    profile: &ConverterProfile,
) -> Result<TabularCache, LoadError> {
    let mapper = profile.mapper()?;
    let cache = TabularCache::load_with(source, Some(&mapper), Some(Arc::new(profile.on_demand())))?;
    Ok(cache)
}
