//! Type-level descriptions of module variants and their validation.
//!
//! A variant is declared by deriving a [`ModuleSchema`] from a parent with a
//! [`SchemaBuilder`]. [`SchemaBuilder::define`] is the only way to obtain a
//! concrete schema, and it fails if any attribute required by the ancestors
//! is missing. A schema that does not exist cannot be registered or
//! instantiated, so incomplete variants are caught where they are declared.

use crate::error::ModuleError;
use crate::module::{ModuleIndex, ModuleType, RotationHandler};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::iter;
use std::sync::Arc;
use tracing::debug;

/// Attributes every concrete variant must declare.
pub const BASE_REQUIRED_ATTRIBUTES: [&str; 2] = ["index", "module_type"];

/// A value declared on a schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Index(ModuleIndex),
    Type(ModuleType),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl AttributeValue {
    /// Short name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Index(_) => "an index",
            Self::Type(_) => "a module type",
            Self::Integer(_) => "an integer",
            Self::Float(_) => "a float",
            Self::Text(_) => "text",
        }
    }
}

impl From<ModuleIndex> for AttributeValue {
    fn from(value: ModuleIndex) -> Self {
        Self::Index(value)
    }
}

impl From<ModuleType> for AttributeValue {
    fn from(value: ModuleType) -> Self {
        Self::Type(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// The type-level description of a module variant.
///
/// Schemas form a single-inheritance chain rooted at [`ModuleSchema::base`].
/// Attribute lookups and the rotation handler resolve to the nearest
/// declaration along that chain.
#[derive(Clone, Debug)]
pub struct ModuleSchema {
    name: String,
    parent: Option<Arc<ModuleSchema>>,
    attributes: BTreeMap<String, AttributeValue>,
    /// Names this schema adds to the required list of its descendants.
    required: Vec<String>,
    rotation: Option<RotationHandler>,
    is_abstract: bool,
}

impl ModuleSchema {
    /// The abstract root every variant derives from. Requires `index` and
    /// `module_type` and declares neither.
    pub fn base() -> Arc<Self> {
        Arc::new(Self {
            name: "Module".to_owned(),
            parent: None,
            attributes: BTreeMap::new(),
            required: BASE_REQUIRED_ATTRIBUTES.iter().map(|s| s.to_string()).collect(),
            rotation: None,
            is_abstract: true,
        })
    }

    /// Starts declaring a variant named `name` deriving from `parent`.
    pub fn builder(parent: &Arc<Self>, name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            parent: Arc::clone(parent),
            name: name.into(),
            attributes: BTreeMap::new(),
            required: Vec::new(),
            rotation: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<ModuleSchema>> {
        self.parent.as_ref()
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// This schema followed by its ancestors, nearest first.
    pub fn ancestry(&self) -> impl Iterator<Item = &ModuleSchema> {
        iter::successors(Some(self), |schema| schema.parent.as_deref())
    }

    /// Resolves an attribute along the ancestor chain.
    pub fn lookup(&self, attribute: &str) -> Option<&AttributeValue> {
        self.ancestry()
            .find_map(|schema| schema.attributes.get(attribute))
    }

    pub fn defines(&self, attribute: &str) -> bool {
        self.lookup(attribute).is_some()
    }

    /// Whether `name` is this schema or one of its ancestors.
    pub fn is_a(&self, name: &str) -> bool {
        self.ancestry().any(|schema| schema.name == name)
    }

    /// Attributes that descendants of this schema must declare, root requirements first.
    pub fn required_attributes(&self) -> Vec<&str> {
        let chain: Vec<&ModuleSchema> = self.ancestry().collect();
        let mut names: Vec<&str> = Vec::new();
        for schema in chain.into_iter().rev() {
            for name in &schema.required {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn index(&self) -> Option<ModuleIndex> {
        match self.lookup("index")? {
            AttributeValue::Index(index) => Some(*index),
            _ => None,
        }
    }

    pub fn module_type(&self) -> Option<ModuleType> {
        match self.lookup("module_type")? {
            AttributeValue::Type(module_type) => Some(*module_type),
            _ => None,
        }
    }

    /// The nearest rotation handler along the ancestor chain.
    pub fn rotation_handler(&self) -> Option<RotationHandler> {
        self.ancestry().find_map(|schema| schema.rotation)
    }
}

/// Declares a new variant. See [`ModuleSchema::builder`].
#[derive(Clone, Debug)]
pub struct SchemaBuilder {
    parent: Arc<ModuleSchema>,
    name: String,
    attributes: BTreeMap<String, AttributeValue>,
    required: Vec<String>,
    rotation: Option<RotationHandler>,
}

impl SchemaBuilder {
    /// Declares an attribute on the variant, shadowing any ancestor's value.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Makes `name` mandatory for every descendant of this variant.
    pub fn require(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.required.contains(&name) {
            self.required.push(name);
        }
        self
    }

    /// Supplies the variant's rotation behavior.
    pub fn rotation(mut self, handler: RotationHandler) -> Self {
        self.rotation = Some(handler);
        self
    }

    /// Every attribute required by the ancestors that neither this variant
    /// nor an ancestor declares. Empty when the declaration is complete.
    pub fn missing_attributes(&self) -> Vec<String> {
        self.parent
            .required_attributes()
            .into_iter()
            .filter(|name| !self.attributes.contains_key(*name) && !self.parent.defines(name))
            .map(str::to_owned)
            .collect()
    }

    /// Validates the declaration and produces a concrete schema.
    ///
    /// Fails on the first required attribute that is not declared anywhere in
    /// the ancestor chain, or when `index`/`module_type` hold the wrong kind
    /// of value.
    pub fn define(self) -> Result<Arc<ModuleSchema>, ModuleError> {
        if let Some(attribute) = self.missing_attributes().into_iter().next() {
            return Err(ModuleError::MissingAttribute {
                class: self.name,
                attribute,
            });
        }

        self.check_kind("index", "an index", |v| matches!(v, AttributeValue::Index(_)))?;
        self.check_kind("module_type", "a module type", |v| {
            matches!(v, AttributeValue::Type(_))
        })?;

        let schema = self.build(false);
        debug!(
            class = schema.name(),
            parent = schema.parent.as_ref().map(|p| p.name()),
            "defined module variant"
        );
        Ok(schema)
    }

    /// Produces an abstract intermediate schema without checking attributes.
    /// Abstract schemas can only serve as parents.
    pub fn define_abstract(self) -> Arc<ModuleSchema> {
        let schema = self.build(true);
        debug!(class = schema.name(), "defined abstract module base");
        schema
    }

    fn declared(&self, attribute: &str) -> Option<&AttributeValue> {
        self.attributes
            .get(attribute)
            .or_else(|| self.parent.lookup(attribute))
    }

    fn check_kind(
        &self,
        attribute: &str,
        expected: &'static str,
        accepts: impl Fn(&AttributeValue) -> bool,
    ) -> Result<(), ModuleError> {
        match self.declared(attribute) {
            Some(value) if !accepts(value) => Err(ModuleError::InvalidAttribute {
                class: self.name.clone(),
                attribute: attribute.to_owned(),
                expected,
                found: value.kind(),
            }),
            _ => Ok(()),
        }
    }

    fn build(self, is_abstract: bool) -> Arc<ModuleSchema> {
        Arc::new(ModuleSchema {
            name: self.name,
            parent: Some(self.parent),
            attributes: self.attributes,
            required: self.required,
            rotation: self.rotation,
            is_abstract,
        })
    }
}
