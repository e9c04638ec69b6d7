//! The module contract shared by every building block of a robot body.

use crate::error::ModuleError;
use crate::schema::ModuleSchema;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::sync::Arc;
use tracing::trace;

/// Identifies a module within a robot's module set.
/// Uniqueness across a robot is the assembler's responsibility.
pub type ModuleIndex = u32;

/// The geometric/functional kind of a module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleType {
    /// The root of the body tree, carrying the controller.
    Core,
    /// A passive structural block.
    Brick,
    /// An actuated single-axis joint.
    Hinge,
}

/// A face of a module's bounding box on which a child may be attached.
///
/// Faces are expressed in the module's local frame, where `+X` points away
/// from the parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttachmentFace {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl AttachmentFace {
    pub const ALL: [AttachmentFace; 6] = [
        AttachmentFace::Front,
        AttachmentFace::Back,
        AttachmentFace::Left,
        AttachmentFace::Right,
        AttachmentFace::Top,
        AttachmentFace::Bottom,
    ];

    /// Outward unit normal of the face in the module's local frame.
    pub fn normal(self) -> Vec3 {
        match self {
            Self::Front => Vec3::X,
            Self::Back => Vec3::NEG_X,
            Self::Left => Vec3::Y,
            Self::Right => Vec3::NEG_Y,
            Self::Top => Vec3::Z,
            Self::Bottom => Vec3::NEG_Z,
        }
    }

    /// Orientation of a site on this face: maps local `+X` onto the face normal,
    /// so a child attached there grows outward.
    pub fn orientation(self) -> Quat {
        match self {
            Self::Back => Quat::from_rotation_z(PI),
            face => Quat::from_rotation_arc(Vec3::X, face.normal()),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

/// A rotation capability stored in a schema. Receives the orientation to
/// mutate and an angle in degrees.
pub type RotationHandler = fn(&mut Quat, f32);

/// Rotates `orientation` about its local X axis by `angle` degrees.
pub fn rotate_about_x(orientation: &mut Quat, angle: f32) {
    *orientation *= Quat::from_rotation_x(angle.to_radians());
}

/// Rotates `orientation` about its local Z axis by `angle` degrees.
pub fn rotate_about_z(orientation: &mut Quat, angle: f32) {
    *orientation *= Quat::from_rotation_z(angle.to_radians());
}

/// A typed, composable building block of a robot body.
///
/// Implementors describe themselves with a validated [`ModuleSchema`] and must
/// supply [`rotate`](Module::rotate); there is no default, so a variant that
/// forgets it does not compile.
///
/// A module holds no reference to its parent or children. The tree is owned
/// by whoever assembles the robot.
pub trait Module {
    /// The type-level description of this variant.
    fn schema(&self) -> &ModuleSchema;

    fn index(&self) -> ModuleIndex;

    fn module_type(&self) -> ModuleType;

    /// Current orientation within the parent's local frame.
    fn orientation(&self) -> Quat;

    /// Rotates the module by `angle` degrees.
    ///
    /// The axis and the meaning of the sign are defined by each variant.
    fn rotate(&mut self, angle: f32) -> Result<(), ModuleError>;

    /// Name of the variant, as declared in its schema.
    fn class_name(&self) -> &str {
        self.schema().name()
    }
}

/// A module whose behavior is entirely described by its schema.
///
/// This is how variants registered at runtime through
/// [`ModuleRegistry`](crate::ModuleRegistry) are instantiated. Rotation is
/// dispatched to the schema's rotation handler.
#[derive(Clone, Debug)]
pub struct DescribedModule {
    schema: Arc<ModuleSchema>,
    index: ModuleIndex,
    module_type: ModuleType,
    orientation: Quat,
}

impl DescribedModule {
    /// Creates an instance of a concrete schema, using its declared `index`.
    pub fn new(schema: Arc<ModuleSchema>) -> Result<Self, ModuleError> {
        if schema.is_abstract() {
            return Err(ModuleError::AbstractVariant {
                class: schema.name().to_owned(),
            });
        }
        let missing = |attribute: &str| ModuleError::MissingAttribute {
            class: schema.name().to_owned(),
            attribute: attribute.to_owned(),
        };
        let index = schema.index().ok_or_else(|| missing("index"))?;
        let module_type = schema.module_type().ok_or_else(|| missing("module_type"))?;

        Ok(Self {
            schema,
            index,
            module_type,
            orientation: Quat::IDENTITY,
        })
    }

    /// Overrides the declared index for this instance (builder pattern).
    pub fn with_index(mut self, index: ModuleIndex) -> Self {
        self.index = index;
        self
    }
}

impl Module for DescribedModule {
    fn schema(&self) -> &ModuleSchema {
        &self.schema
    }

    fn index(&self) -> ModuleIndex {
        self.index
    }

    fn module_type(&self) -> ModuleType {
        self.module_type
    }

    fn orientation(&self) -> Quat {
        self.orientation
    }

    fn rotate(&mut self, angle: f32) -> Result<(), ModuleError> {
        let handler =
            self.schema
                .rotation_handler()
                .ok_or_else(|| ModuleError::RotateNotImplemented {
                    class: self.schema.name().to_owned(),
                })?;
        handler(&mut self.orientation, angle);
        trace!(class = self.schema.name(), index = self.index, angle, "rotated module");
        Ok(())
    }
}
