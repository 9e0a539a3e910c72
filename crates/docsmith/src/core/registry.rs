//! Priority-ordered converter registry.

use std::sync::Arc;

use crate::converters::DocumentConverter;

/// Ordered collection of converters with stack semantics.
///
/// [`register`] inserts at the front, so within each candidate-extension
/// pass the most recently registered converter is tried first. That is the
/// whole override mechanism: a specialized converter (Wikipedia) registered
/// after a general one (HTML) shadows it for the inputs it claims and
/// silently falls through for everything else.
///
/// Registries are owned by their pipeline; there is no global registry.
///
/// [`register`]: ConverterRegistry::register
#[derive(Default)]
pub struct ConverterRegistry {
    converters: Vec<Arc<dyn DocumentConverter>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converter with highest priority.
    pub fn register(&mut self, converter: Arc<dyn DocumentConverter>) {
        self.converters.insert(0, converter);
    }

    /// Converters in priority order (most recently registered first).
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn DocumentConverter>> {
        self.converters.iter()
    }

    /// Converter names in priority order.
    pub fn names(&self) -> Vec<&str> {
        self.converters.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}
