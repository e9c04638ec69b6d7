use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Dimensions and physical parameters used when building the built-in modules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Half-extent of the cubic core (m).
    pub core_half_extent: f32,
    /// Half-extent of a cubic brick (m).
    pub brick_half_extent: f32,
    /// Half-extents of the hinge housing (m). X is the attachment axis.
    pub hinge_half_extents: Vec3,
    /// Radius of the hinge's rotor cylinder (m).
    pub hinge_rotor_radius: f32,
    /// Density (kg/m^3) used to derive geom masses.
    pub density: f32,
    /// Radius of the marker sphere of each attachment site (m).
    pub site_radius: f32,
    /// Symmetric range of hinge motion, in degrees either side of neutral.
    pub hinge_range_degrees: f32,
    /// Maximum torque of the hinge actuator (Nm).
    pub hinge_effort: f32,
    /// Maximum angular velocity of the hinge actuator (rad/s).
    pub hinge_velocity: f32,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            core_half_extent: 0.05,
            brick_half_extent: 0.025,
            hinge_half_extents: Vec3::new(0.025, 0.0125, 0.0125),
            hinge_rotor_radius: 0.01,
            density: 100.0,
            site_radius: 0.005,
            hinge_range_degrees: 90.0,
            hinge_effort: 1.0,
            hinge_velocity: 6.0,
        }
    }
}
