//! Errors raised by the module contract.

use thiserror::Error;

/// Violations of the module contract.
///
/// Contract violations name the offending schema so the defect can be traced
/// back to where the variant was declared.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ModuleError {
    /// A concrete variant does not declare a required attribute anywhere in its ancestor chain.
    #[error("Class '{class}' must define attribute '{attribute}'")]
    MissingAttribute { class: String, attribute: String },

    /// A required attribute is declared with a value of the wrong kind.
    #[error("Class '{class}' declares attribute '{attribute}' as {found}, expected {expected}")]
    InvalidAttribute {
        class: String,
        attribute: String,
        expected: &'static str,
        found: &'static str,
    },

    /// `rotate` was invoked on a variant that never supplied a rotation.
    #[error("{class} does not implement 'rotate' method.")]
    RotateNotImplemented { class: String },

    /// A schema with the same name is already registered.
    #[error("module variant '{class}' is already registered")]
    DuplicateVariant { class: String },

    /// No schema with this name is registered.
    #[error("module variant '{class}' is not registered")]
    UnknownVariant { class: String },

    /// Abstract schemas are bases for other variants and cannot be registered or instantiated.
    #[error("module variant '{class}' is abstract")]
    AbstractVariant { class: String },

    /// The body target refused a site or attachment while building a module.
    #[error(transparent)]
    Site(#[from] SiteError),
}

/// Errors reported by [`BodySpec`](crate::BodySpec) when creating or attaching structure.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SiteError {
    #[error("site '{name}' already exists on body '{body}'")]
    DuplicateName { body: String, name: String },

    #[error("site position or orientation is not finite on body '{body}'")]
    NonFinitePose { body: String },

    #[error("site size must be finite and non-negative, got {size:?}")]
    InvalidSize { size: [f32; 3] },

    #[error("body '{body}' has no site with id {id}")]
    UnknownSite { body: String, id: usize },
}
