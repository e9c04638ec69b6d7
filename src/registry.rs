//! Registry of module variants available to an assembler.
//!
//! Registration is the completeness gate for schema-described variants: a
//! schema must be concrete and must supply a rotation before it is accepted,
//! so every [`DescribedModule`] handed out by the registry can rotate.

use crate::error::ModuleError;
use crate::module::{DescribedModule, ModuleIndex, ModuleType};
use crate::schema::ModuleSchema;
use crate::variants::{BrickModule, CoreModule, HingeModule};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Module variants keyed by name and by [`ModuleType`].
#[derive(Clone, Debug, Default)]
pub struct ModuleRegistry {
    variants: BTreeMap<String, Arc<ModuleSchema>>,
    by_type: HashMap<ModuleType, String>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in core, brick and hinge variants.
    pub fn standard() -> Result<Self, ModuleError> {
        let mut registry = Self::new();
        registry.register(CoreModule::declaration()?)?;
        registry.register(BrickModule::declaration()?)?;
        registry.register(HingeModule::declaration()?)?;
        Ok(registry)
    }

    /// Adds a variant.
    ///
    /// The first variant registered for a [`ModuleType`] becomes the default
    /// returned by [`for_type`](Self::for_type).
    pub fn register(&mut self, schema: Arc<ModuleSchema>) -> Result<(), ModuleError> {
        let class = schema.name().to_owned();
        if schema.is_abstract() {
            return Err(ModuleError::AbstractVariant { class });
        }
        if schema.rotation_handler().is_none() {
            return Err(ModuleError::RotateNotImplemented { class });
        }
        if self.variants.contains_key(&class) {
            return Err(ModuleError::DuplicateVariant { class });
        }

        if let Some(module_type) = schema.module_type() {
            self.by_type
                .entry(module_type)
                .or_insert_with(|| class.clone());
        }
        debug!(class = %class, "registered module variant");
        self.variants.insert(class, schema);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ModuleSchema>> {
        self.variants.get(name)
    }

    /// The default variant for a module type.
    pub fn for_type(&self, module_type: ModuleType) -> Option<&Arc<ModuleSchema>> {
        self.by_type
            .get(&module_type)
            .and_then(|name| self.variants.get(name))
    }

    /// Creates an instance of the named variant with the given index.
    pub fn instantiate(
        &self,
        name: &str,
        index: ModuleIndex,
    ) -> Result<DescribedModule, ModuleError> {
        let schema = self
            .get(name)
            .ok_or_else(|| ModuleError::UnknownVariant {
                class: name.to_owned(),
            })?;
        Ok(DescribedModule::new(Arc::clone(schema))?.with_index(index))
    }

    /// Registered variant names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}
