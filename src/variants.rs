//! The built-in module variants: core, brick and hinge.
//!
//! Each variant owns the body it builds. Its local frame has `+X` pointing
//! away from the parent, so a child body attached with
//! [`BodySpec::attach`] grows outward from the chosen face.

use crate::body::{BodySpec, GeomSpec, JointLimit, JointSpec, JointType, ShapePrimitive, SiteId};
use crate::config::ModuleConfig;
use crate::error::ModuleError;
use crate::module::{
    AttachmentFace, Module, ModuleIndex, ModuleType, RotationHandler, rotate_about_x,
    rotate_about_z,
};
use crate::schema::ModuleSchema;
use crate::site::{SiteShape, SiteSpec, add_site};
use glam::{Quat, Vec3};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace};

const CORE_COLOR: [f32; 4] = [0.1, 0.1, 0.9, 1.0];
const BRICK_COLOR: [f32; 4] = [0.9, 0.1, 0.1, 1.0];
const HINGE_COLOR: [f32; 4] = [0.1, 0.9, 0.1, 1.0];
const SITE_COLOR: [f32; 4] = [1.0, 1.0, 0.0, 0.5];

fn declare(
    name: &str,
    module_type: ModuleType,
    rotation: RotationHandler,
) -> Result<Arc<ModuleSchema>, ModuleError> {
    ModuleSchema::builder(&ModuleSchema::base(), name)
        .attribute("index", 0u32)
        .attribute("module_type", module_type)
        .rotation(rotation)
        .define()
}

/// State shared by the built-in variants.
#[derive(Clone, Debug)]
struct Chassis {
    schema: Arc<ModuleSchema>,
    index: ModuleIndex,
    body: BodySpec,
    sites: BTreeMap<AttachmentFace, SiteId>,
}

impl Chassis {
    /// Builds a body with one attachment site at the center of each of `faces`
    /// on a box of `half_extents` centered at `center`.
    fn new(
        schema: Arc<ModuleSchema>,
        index: ModuleIndex,
        label: &str,
        half_extents: Vec3,
        center: Vec3,
        faces: &[AttachmentFace],
        config: &ModuleConfig,
    ) -> Result<Self, ModuleError> {
        let mut body = BodySpec::new(format!("{label}-{index}"));
        let mut sites = BTreeMap::new();

        for &face in faces {
            let spec = SiteSpec::new()
                .named(format!("{}-{}", body.name, face.label()))
                .at(center + face.normal() * half_extents)
                .oriented(face.orientation())
                .shaped(SiteShape::Sphere, Vec3::splat(config.site_radius))
                .colored(SITE_COLOR);
            let id = add_site(&mut body, spec)?;
            sites.insert(face, id);
        }

        debug!(
            class = schema.name(),
            index,
            sites = sites.len(),
            "built module body"
        );
        Ok(Self {
            schema,
            index,
            body,
            sites,
        })
    }

    fn rotate(&mut self, handler: RotationHandler, angle: f32) {
        handler(&mut self.body.orientation, angle);
        trace!(class = self.schema.name(), index = self.index, angle, "rotated module");
    }
}

/// The root of a robot: a cube with an attachment site on every face.
/// Rotates about its local Z axis.
#[derive(Clone, Debug)]
pub struct CoreModule {
    chassis: Chassis,
}

impl CoreModule {
    pub const FACES: [AttachmentFace; 6] = AttachmentFace::ALL;

    /// The validated schema of this variant.
    pub fn declaration() -> Result<Arc<ModuleSchema>, ModuleError> {
        declare("CoreModule", ModuleType::Core, rotate_about_z)
    }

    pub fn new(index: ModuleIndex, config: &ModuleConfig) -> Result<Self, ModuleError> {
        let half_extents = Vec3::splat(config.core_half_extent);
        let mut chassis = Chassis::new(
            Self::declaration()?,
            index,
            "core",
            half_extents,
            Vec3::ZERO,
            &Self::FACES,
            config,
        )?;
        chassis.body.add_geom(
            GeomSpec::new("core-shell", ShapePrimitive::Box(half_extents), config.density)
                .colored(CORE_COLOR),
        );
        Ok(Self { chassis })
    }

    pub fn body(&self) -> &BodySpec {
        &self.chassis.body
    }

    pub fn body_mut(&mut self) -> &mut BodySpec {
        &mut self.chassis.body
    }

    pub fn into_body(self) -> BodySpec {
        self.chassis.body
    }

    pub fn site(&self, face: AttachmentFace) -> Option<SiteId> {
        self.chassis.sites.get(&face).copied()
    }
}

impl Module for CoreModule {
    fn schema(&self) -> &ModuleSchema {
        &self.chassis.schema
    }

    fn index(&self) -> ModuleIndex {
        self.chassis.index
    }

    fn module_type(&self) -> ModuleType {
        ModuleType::Core
    }

    fn orientation(&self) -> Quat {
        self.chassis.body.orientation
    }

    fn rotate(&mut self, angle: f32) -> Result<(), ModuleError> {
        self.chassis.rotate(rotate_about_z, angle);
        Ok(())
    }
}

/// A passive cube. Its back face meets the parent; the other five faces
/// carry attachment sites. Rotates about its attachment axis.
#[derive(Clone, Debug)]
pub struct BrickModule {
    chassis: Chassis,
}

impl BrickModule {
    pub const FACES: [AttachmentFace; 5] = [
        AttachmentFace::Front,
        AttachmentFace::Left,
        AttachmentFace::Right,
        AttachmentFace::Top,
        AttachmentFace::Bottom,
    ];

    pub fn declaration() -> Result<Arc<ModuleSchema>, ModuleError> {
        declare("BrickModule", ModuleType::Brick, rotate_about_x)
    }

    pub fn new(index: ModuleIndex, config: &ModuleConfig) -> Result<Self, ModuleError> {
        let half_extents = Vec3::splat(config.brick_half_extent);
        let center = Vec3::X * config.brick_half_extent;
        let mut chassis = Chassis::new(
            Self::declaration()?,
            index,
            "brick",
            half_extents,
            center,
            &Self::FACES,
            config,
        )?;
        chassis.body.add_geom(
            GeomSpec::new("brick-shell", ShapePrimitive::Box(half_extents), config.density)
                .at(center)
                .colored(BRICK_COLOR),
        );
        Ok(Self { chassis })
    }

    pub fn body(&self) -> &BodySpec {
        &self.chassis.body
    }

    pub fn body_mut(&mut self) -> &mut BodySpec {
        &mut self.chassis.body
    }

    pub fn into_body(self) -> BodySpec {
        self.chassis.body
    }

    pub fn site(&self, face: AttachmentFace) -> Option<SiteId> {
        self.chassis.sites.get(&face).copied()
    }
}

impl Module for BrickModule {
    fn schema(&self) -> &ModuleSchema {
        &self.chassis.schema
    }

    fn index(&self) -> ModuleIndex {
        self.chassis.index
    }

    fn module_type(&self) -> ModuleType {
        ModuleType::Brick
    }

    fn orientation(&self) -> Quat {
        self.chassis.body.orientation
    }

    fn rotate(&mut self, angle: f32) -> Result<(), ModuleError> {
        self.chassis.rotate(rotate_about_x, angle);
        Ok(())
    }
}

/// An actuated joint: a housing with a rotor and a hinge about its local Y
/// axis. Only the front face carries an attachment site.
/// Rotating the module turns the hinge axis about the attachment axis.
#[derive(Clone, Debug)]
pub struct HingeModule {
    chassis: Chassis,
}

impl HingeModule {
    pub const FACES: [AttachmentFace; 1] = [AttachmentFace::Front];

    pub fn declaration() -> Result<Arc<ModuleSchema>, ModuleError> {
        declare("HingeModule", ModuleType::Hinge, rotate_about_x)
    }

    pub fn new(index: ModuleIndex, config: &ModuleConfig) -> Result<Self, ModuleError> {
        let half_extents = config.hinge_half_extents;
        let center = Vec3::X * half_extents.x;
        let mut chassis = Chassis::new(
            Self::declaration()?,
            index,
            "hinge",
            half_extents,
            center,
            &Self::FACES,
            config,
        )?;

        let body = &mut chassis.body;
        body.add_geom(
            GeomSpec::new("hinge-housing", ShapePrimitive::Box(half_extents), config.density)
                .at(center)
                .colored(HINGE_COLOR),
        );
        body.add_geom(
            GeomSpec::new(
                "hinge-rotor",
                ShapePrimitive::Cylinder {
                    radius: config.hinge_rotor_radius,
                    height: half_extents.y * 2.0,
                },
                config.density,
            )
            .at(center)
            .colored(HINGE_COLOR),
        );

        let range = config.hinge_range_degrees.abs().to_radians();
        let joint_name = format!("{}-joint", body.name);
        body.add_joint(JointSpec {
            name: joint_name,
            joint_type: JointType::Hinge,
            anchor: center,
            axis: Vec3::Y,
            limits: Some(JointLimit {
                min: -range,
                max: range,
                effort: config.hinge_effort,
                velocity: config.hinge_velocity,
            }),
        });

        Ok(Self { chassis })
    }

    pub fn body(&self) -> &BodySpec {
        &self.chassis.body
    }

    pub fn body_mut(&mut self) -> &mut BodySpec {
        &mut self.chassis.body
    }

    pub fn into_body(self) -> BodySpec {
        self.chassis.body
    }

    pub fn site(&self, face: AttachmentFace) -> Option<SiteId> {
        self.chassis.sites.get(&face).copied()
    }
}

impl Module for HingeModule {
    fn schema(&self) -> &ModuleSchema {
        &self.chassis.schema
    }

    fn index(&self) -> ModuleIndex {
        self.chassis.index
    }

    fn module_type(&self) -> ModuleType {
        ModuleType::Hinge
    }

    fn orientation(&self) -> Quat {
        self.chassis.body.orientation
    }

    fn rotate(&mut self, angle: f32) -> Result<(), ModuleError> {
        self.chassis.rotate(rotate_about_x, angle);
        Ok(())
    }
}
