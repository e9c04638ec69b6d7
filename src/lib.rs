//! # robogen-modules
//!
//! The module contract for assembling modular robot bodies.
//!
//! Each building block of a robot (core, brick, hinge, or a variant declared
//! at runtime) is described by a validated [`ModuleSchema`], attaches its
//! structural sites to an engine body through [`add_site`], and orients
//! itself in its parent's frame with [`Module::rotate`]. The resulting
//! [`BodySpec`] tree is engine-agnostic and can be handed to a simulator.

pub mod body;
pub mod config;
pub mod error;
pub mod module;
pub mod registry;
pub mod schema;
pub mod site;
pub mod variants;

pub use body::*;
pub use config::*;
pub use error::*;
pub use module::*;
pub use registry::*;
pub use schema::*;
pub use site::*;
pub use variants::*;
