//! Attachment sites and the body-target seam they are created through.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Group assigned to every structural attachment site.
///
/// Keeps robot-structure sites apart from other scene sites (sensors, debug
/// markers) under the engine's visibility grouping.
pub const STRUCTURAL_SITE_GROUP: i32 = 5;

/// Geometric shape of a site marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiteShape {
    #[default]
    Sphere,
    Capsule,
    Ellipsoid,
    Cylinder,
    Box,
}

/// Everything needed to create a site on a body. Passed through to the
/// [`BodyTarget`] untouched, apart from `group` when created with [`add_site`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteSpec {
    /// Site name. The target picks one when `None`.
    pub name: Option<String>,
    pub shape: SiteShape,
    /// Position in the body's local frame.
    pub position: Vec3,
    /// Orientation in the body's local frame.
    pub orientation: Quat,
    /// Shape size parameters, interpreted per `shape`.
    pub size: Vec3,
    pub rgba: [f32; 4],
    pub group: i32,
}

impl Default for SiteSpec {
    fn default() -> Self {
        Self {
            name: None,
            shape: SiteShape::Sphere,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            size: Vec3::splat(0.005),
            rgba: [0.5, 0.5, 0.5, 1.0],
            group: 0,
        }
    }
}

impl SiteSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn oriented(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn shaped(mut self, shape: SiteShape, size: Vec3) -> Self {
        self.shape = shape;
        self.size = size;
        self
    }

    pub fn colored(mut self, rgba: [f32; 4]) -> Self {
        self.rgba = rgba;
        self
    }

    pub fn in_group(mut self, group: i32) -> Self {
        self.group = group;
        self
    }
}

/// An engine body that sites can be created on.
///
/// Implemented by [`BodySpec`](crate::BodySpec) and by adapters over a
/// physics engine's native body type.
pub trait BodyTarget {
    /// Handle to a created site. The site itself stays owned by the target.
    type Site;
    type Error;

    /// Creates a site from `site` and records it as a child of this body.
    fn create_site(&mut self, site: SiteSpec) -> Result<Self::Site, Self::Error>;
}

/// Creates a structural attachment site on `body`.
///
/// `site` is forwarded unchanged except for its group, which is always forced
/// to [`STRUCTURAL_SITE_GROUP`]. Errors from the target are returned as-is.
pub fn add_site<B>(body: &mut B, mut site: SiteSpec) -> Result<B::Site, B::Error>
where
    B: BodyTarget + ?Sized,
{
    if site.group != STRUCTURAL_SITE_GROUP {
        debug!(
            requested = site.group,
            forced = STRUCTURAL_SITE_GROUP,
            "overriding group of structural site"
        );
    }
    site.group = STRUCTURAL_SITE_GROUP;
    body.create_site(site)
}
