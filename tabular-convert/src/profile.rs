//! FILENAME: tabular-convert/src/profile.rs
//! PURPOSE: Serializable converter configuration.
//! CONTEXT: A profile picks which on-demand converters are active, how text
//! is parsed into booleans and temporal values, and which column types are
//! bulk-coerced at load time. Every field has a default, so an empty JSON
//! object is a valid profile.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use tabular_engine::{Mapper, OnDemandConverter, ValueType};

use crate::coerce::CoerceColumn;
use crate::error::ProfileError;
use crate::on_demand_mapper::OnDemandMapper;

// ============================================================================
// CONVERTER SELECTION
// ============================================================================

/// Which converters `OnDemandMapper::from_profile` registers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledConverters {
    #[serde(default = "default_true")]
    pub numeric: bool,
    #[serde(default = "default_true")]
    pub text: bool,
    #[serde(default = "default_true")]
    pub temporal: bool,
    #[serde(default = "default_true")]
    pub boolean: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EnabledConverters {
    fn default() -> Self {
        EnabledConverters {
            numeric: true,
            text: true,
            temporal: true,
            boolean: true,
        }
    }
}

// ============================================================================
// TEXT FORMATS
// ============================================================================

/// Literals and `chrono` format strings shared by the text and temporal
/// converters. Parsing tries each format in order; formatting uses the
/// first one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatSettings {
    /// Compared case-insensitively after trimming.
    pub true_literals: Vec<String>,
    pub false_literals: Vec<String>,
    pub date_formats: Vec<String>,
    pub time_formats: Vec<String>,
    pub timestamp_formats: Vec<String>,
}

impl Default for FormatSettings {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        FormatSettings {
            true_literals: owned(&["true", "yes", "y", "1"]),
            false_literals: owned(&["false", "no", "n", "0"]),
            date_formats: owned(&["%Y-%m-%d"]),
            time_formats: owned(&["%H:%M:%S%.f"]),
            timestamp_formats: owned(&["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]),
        }
    }
}

impl FormatSettings {
    /// `Some(true)`/`Some(false)` for a known literal, `None` otherwise.
    pub fn parse_boolean(&self, text: &str) -> Option<bool> {
        let text = text.trim();
        let matches = |literals: &[String]| literals.iter().any(|l| l.eq_ignore_ascii_case(text));
        if matches(&self.true_literals) {
            Some(true)
        } else if matches(&self.false_literals) {
            Some(false)
        } else {
            None
        }
    }
}

// ============================================================================
// PROFILE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterProfile {
    pub converters: EnabledConverters,
    pub formats: FormatSettings,
    /// Column type name -> target type name (e.g. `"VARCHAR": "long"`).
    /// Type names match case-insensitively, as in `Mapper`.
    pub remap: BTreeMap<String, String>,
}

impl ConverterProfile {
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let profile: ConverterProfile = serde_json::from_str(json)?;
        profile.remap_targets()?;
        Ok(profile)
    }

    pub fn from_path(path: &Path) -> Result<Self, ProfileError> {
        let json = std::fs::read_to_string(path)?;
        let profile = Self::from_json(&json)?;
        debug!(
            "loaded converter profile from {} ({} remap entries)",
            path.display(),
            profile.remap.len()
        );
        Ok(profile)
    }

    pub fn to_json(&self) -> Result<String, ProfileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The remap table with every target parsed.
    pub fn remap_targets(&self) -> Result<BTreeMap<String, ValueType>, ProfileError> {
        self.remap
            .iter()
            .map(|(column_type, target)| {
                let ty = target.parse::<ValueType>().map_err(|_| ProfileError::UnknownType {
                    column_type: column_type.clone(),
                    target: target.clone(),
                })?;
                Ok((column_type.clone(), ty))
            })
            .collect()
    }

    /// The on-demand converter this profile describes.
    pub fn on_demand(&self) -> OnDemandMapper {
        OnDemandMapper::from_profile(self)
    }

    /// A bulk mapper coercing each remapped column type to its target
    /// through this profile's on-demand converters.
    pub fn mapper(&self) -> Result<Mapper, ProfileError> {
        let on_demand: Arc<dyn OnDemandConverter> = Arc::new(self.on_demand());
        let mut mapper = Mapper::new();
        for (column_type, target) in self.remap_targets()? {
            mapper.register(
                &column_type,
                Arc::new(CoerceColumn::new(on_demand.clone(), target)),
            );
        }
        Ok(mapper)
    }
}
