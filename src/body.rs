use crate::error::SiteError;
use crate::site::{BodyTarget, SiteSpec};
use bevy_heavy::ComputeMassProperties3d;
use bevy_math::primitives::{Capsule3d, Cuboid, Cylinder, Sphere};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Handle to a site, valid for the body that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SiteId(pub usize);

/// An engine-agnostic body in a robot's body tree.
///
/// This is the in-memory [`BodyTarget`]: modules add geoms, joints and
/// attachment sites to it, and child bodies are placed at its sites.
/// Pose fields are relative to the parent body.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BodySpec {
    pub name: String,
    pub position: Vec3,
    pub orientation: Quat,
    pub geoms: Vec<GeomSpec>,
    pub joints: Vec<JointSpec>,
    pub children: Vec<BodySpec>,
    sites: Vec<Site>,
}

impl BodySpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add_geom(&mut self, geom: GeomSpec) {
        self.geoms.push(geom);
    }

    pub fn add_joint(&mut self, joint: JointSpec) {
        self.joints.push(joint);
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn site(&self, id: SiteId) -> Option<&Site> {
        self.sites.get(id.0)
    }

    pub fn find_site(&self, name: &str) -> Option<&Site> {
        self.sites.iter().find(|site| site.name == name)
    }

    /// Places `child` at the pose of one of this body's sites and adopts it.
    ///
    /// The child's own pose is kept as an offset in the site's frame.
    pub fn attach(&mut self, at: SiteId, mut child: BodySpec) -> Result<&mut BodySpec, SiteError> {
        let site = self.site(at).ok_or_else(|| SiteError::UnknownSite {
            body: self.name.clone(),
            id: at.0,
        })?;
        child.position = site.spec.position + site.spec.orientation * child.position;
        child.orientation = site.spec.orientation * child.orientation;

        self.children.push(child);
        let last = self.children.len() - 1;
        Ok(&mut self.children[last])
    }

    /// Mass of this body's geoms plus that of every descendant.
    pub fn total_mass(&self) -> f32 {
        let own: f32 = self.geoms.iter().map(|geom| geom.mass).sum();
        own + self.children.iter().map(BodySpec::total_mass).sum::<f32>()
    }

    /// Number of bodies in this subtree, including this one.
    pub fn body_count(&self) -> usize {
        1 + self.children.iter().map(BodySpec::body_count).sum::<usize>()
    }
}

impl BodyTarget for BodySpec {
    type Site = SiteId;
    type Error = SiteError;

    fn create_site(&mut self, spec: SiteSpec) -> Result<SiteId, SiteError> {
        if !spec.position.is_finite() || !spec.orientation.is_finite() {
            return Err(SiteError::NonFinitePose {
                body: self.name.clone(),
            });
        }
        if !spec.size.is_finite() || spec.size.min_element() < 0.0 {
            return Err(SiteError::InvalidSize {
                size: spec.size.to_array(),
            });
        }

        let id = SiteId(self.sites.len());
        let name = spec
            .name
            .clone()
            .unwrap_or_else(|| format!("{}-site{}", self.name, id.0));
        if self.find_site(&name).is_some() {
            return Err(SiteError::DuplicateName {
                body: self.name.clone(),
                name,
            });
        }

        self.sites.push(Site { id, name, spec });
        Ok(id)
    }
}

/// A site recorded on a [`BodySpec`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    /// Resolved name, unique within the body.
    pub name: String,
    /// The description the site was created from.
    pub spec: SiteSpec,
}

impl Site {
    pub fn group(&self) -> i32 {
        self.spec.group
    }
}

/// A collision/visual shape attached to a body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeomSpec {
    pub name: String,
    pub shape: ShapePrimitive,
    /// Center of the shape in the body's local frame.
    pub position: Vec3,
    pub orientation: Quat,
    /// Density in kg/m³ used to derive mass properties.
    pub density: f32,
    /// Mass in kg, computed from shape volume and density via `bevy_heavy`.
    pub mass: f32,
    pub rgba: [f32; 4],
}

impl GeomSpec {
    pub fn new(name: impl Into<String>, shape: ShapePrimitive, density: f32) -> Self {
        Self {
            name: name.into(),
            shape,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            density,
            mass: shape.to_bevy_primitive().mass(density),
            rgba: [0.8, 0.8, 0.8, 1.0],
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn colored(mut self, rgba: [f32; 4]) -> Self {
        self.rgba = rgba;
        self
    }
}

/// Supported geometric primitives for module geoms.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum ShapePrimitive {
    /// A box defined by half-extents (x, y, z).
    Box(Vec3),
    /// A cylinder defined by radius and height (aligned along Y axis).
    Cylinder { radius: f32, height: f32 },
    /// A sphere defined by radius.
    Sphere(f32),
    /// A capsule defined by radius and height (aligned along Y axis).
    Capsule { radius: f32, height: f32 },
}

/// A type-erased wrapper so we can call [`ComputeMassProperties3d`] on any variant.
#[derive(Clone, Copy, Debug)]
pub enum BevyPrimitive {
    Cuboid(Cuboid),
    Cylinder(Cylinder),
    Sphere(Sphere),
    Capsule(Capsule3d),
}

impl ComputeMassProperties3d for BevyPrimitive {
    fn mass(&self, density: f32) -> f32 {
        match self {
            Self::Cuboid(s) => s.mass(density),
            Self::Cylinder(s) => s.mass(density),
            Self::Sphere(s) => s.mass(density),
            Self::Capsule(s) => s.mass(density),
        }
    }

    fn unit_principal_angular_inertia(&self) -> Vec3 {
        match self {
            Self::Cuboid(s) => s.unit_principal_angular_inertia(),
            Self::Cylinder(s) => s.unit_principal_angular_inertia(),
            Self::Sphere(s) => s.unit_principal_angular_inertia(),
            Self::Capsule(s) => s.unit_principal_angular_inertia(),
        }
    }

    fn center_of_mass(&self) -> Vec3 {
        match self {
            Self::Cuboid(s) => s.center_of_mass(),
            Self::Cylinder(s) => s.center_of_mass(),
            Self::Sphere(s) => s.center_of_mass(),
            Self::Capsule(s) => s.center_of_mass(),
        }
    }
}

impl ShapePrimitive {
    /// Convert to the corresponding `bevy_math` primitive for mass-property computation.
    pub fn to_bevy_primitive(self) -> BevyPrimitive {
        match self {
            Self::Box(half_extents) => BevyPrimitive::Cuboid(Cuboid {
                half_size: half_extents,
            }),
            Self::Cylinder { radius, height } => {
                BevyPrimitive::Cylinder(Cylinder::new(radius, height))
            }
            Self::Sphere(r) => BevyPrimitive::Sphere(Sphere::new(r)),
            Self::Capsule { radius, height } => {
                BevyPrimitive::Capsule(Capsule3d::new(radius, height))
            }
        }
    }
}

/// A degree of freedom between a body and its parent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JointSpec {
    pub name: String,
    pub joint_type: JointType,
    /// Anchor point in the body's local frame.
    pub anchor: Vec3,
    /// Axis of rotation/translation in the body's local frame.
    pub axis: Vec3,
    pub limits: Option<JointLimit>,
}

/// Types of mechanical joints.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum JointType {
    /// Rotates around a single axis.
    Hinge,
    /// Ball and socket (3 degrees of freedom).
    Ball,
    /// Slides along a single axis.
    Slide,
}

/// Limits for a joint's motion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointLimit {
    /// Minimum angle (radians) or distance (meters).
    pub min: f32,
    /// Maximum angle (radians) or distance (meters).
    pub max: f32,
    /// Maximum torque (Nm) or force (N) the joint motor can apply.
    pub effort: f32,
    /// Maximum velocity (rad/s or m/s).
    pub velocity: f32,
}
