//! FILENAME: tabular-convert/src/on_demand_mapper.rs
//! PURPOSE: Composite on-demand converter keyed by the source value's kind.
//! CONTEXT: Each kind holds an ordered list of converters. A request is
//! convertible when any of them can convert it; conversion goes to the
//! first one that can.

use std::fmt;
use std::sync::Arc;

use log::trace;
use rustc_hash::FxHashMap;

use tabular_engine::{
    ConversionError, OnDemandConverter, ResultMetadata, Value, ValueKind, ValueType,
};

use crate::boolean::BooleanConverter;
use crate::numeric::NumericConverter;
use crate::profile::ConverterProfile;
use crate::temporal::TemporalConverter;
use crate::text::TextConverter;

const NUMERIC_KINDS: [ValueKind; 7] = [
    ValueKind::Byte,
    ValueKind::Short,
    ValueKind::Int,
    ValueKind::Long,
    ValueKind::Float,
    ValueKind::Double,
    ValueKind::Decimal,
];

const TEMPORAL_KINDS: [ValueKind; 3] = [ValueKind::Date, ValueKind::Time, ValueKind::Timestamp];

#[derive(Default, Clone)]
pub struct OnDemandMapper {
    converters: FxHashMap<ValueKind, Vec<Arc<dyn OnDemandConverter>>>,
}

impl OnDemandMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Numeric, text, temporal and boolean converters with default formats.
    pub fn standard() -> Self {
        Self::from_profile(&ConverterProfile::default())
    }

    pub fn from_profile(profile: &ConverterProfile) -> Self {
        let mut mapper = OnDemandMapper::new();
        let enabled = &profile.converters;

        if enabled.numeric {
            mapper.register_all(&NUMERIC_KINDS, Arc::new(NumericConverter::new()));
        }
        if enabled.text {
            mapper.register(
                ValueKind::Text,
                Arc::new(TextConverter::new(profile.formats.clone())),
            );
        }
        if enabled.temporal {
            mapper.register_all(
                &TEMPORAL_KINDS,
                Arc::new(TemporalConverter::new(profile.formats.clone())),
            );
        }
        if enabled.boolean {
            mapper.register(ValueKind::Boolean, Arc::new(BooleanConverter::new()));
        }
        mapper
    }

    /// Appends `converter` to the list for `kind`; earlier registrations win.
    pub fn register(&mut self, kind: ValueKind, converter: Arc<dyn OnDemandConverter>) {
        self.converters.entry(kind).or_default().push(converter);
    }

    pub fn register_all(&mut self, kinds: &[ValueKind], converter: Arc<dyn OnDemandConverter>) {
        for &kind in kinds {
            self.register(kind, converter.clone());
        }
    }

    pub fn with(mut self, kind: ValueKind, converter: Arc<dyn OnDemandConverter>) -> Self {
        self.register(kind, converter);
        self
    }

    /// Kinds with at least one converter, in declaration order.
    pub fn kinds(&self) -> Vec<ValueKind> {
        let mut kinds: Vec<ValueKind> = self.converters.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }

    fn candidates(&self, value: &Value) -> &[Arc<dyn OnDemandConverter>] {
        value
            .kind()
            .and_then(|kind| self.converters.get(&kind))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl OnDemandConverter for OnDemandMapper {
    fn can_convert(
        &self,
        value: &Value,
        column: usize,
        metadata: &ResultMetadata,
        desired: ValueType,
    ) -> bool {
        self.candidates(value)
            .iter()
            .any(|c| c.can_convert(value, column, metadata, desired))
    }

    fn convert(
        &self,
        value: &Value,
        column: usize,
        metadata: &ResultMetadata,
        desired: ValueType,
    ) -> Result<Value, ConversionError> {
        let Some(converter) = self
            .candidates(value)
            .iter()
            .find(|c| c.can_convert(value, column, metadata, desired))
        else {
            return Err(ConversionError::unsupported(value, desired));
        };
        trace!("column {}: converting {:?} to {}", column, value.kind(), desired);
        converter.convert(value, column, metadata, desired)
    }
}

impl fmt::Debug for OnDemandMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: Vec<(ValueKind, usize)> = self
            .kinds()
            .into_iter()
            .map(|k| (k, self.converters.get(&k).map_or(0, Vec::len)))
            .collect();
        f.debug_struct("OnDemandMapper")
            .field("converters", &counts)
            .finish()
    }
}
