// tests/module_variants.rs
use glam::{Quat, Vec3};
use robogen_modules::{
    AttachmentFace, BrickModule, CoreModule, HingeModule, JointType, Module, ModuleConfig,
    ModuleError, ModuleRegistry, ModuleSchema, ModuleType, STRUCTURAL_SITE_GROUP, rotate_about_x,
};
use std::sync::Arc;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn test_core_has_a_structural_site_on_every_face() {
    let config = ModuleConfig::default();
    let core = CoreModule::new(0, &config).unwrap();

    assert_eq!(core.index(), 0);
    assert_eq!(core.module_type(), ModuleType::Core);
    assert_eq!(core.class_name(), "CoreModule");
    assert_eq!(core.body().sites().len(), 6);
    assert!(core
        .body()
        .sites()
        .iter()
        .all(|site| site.group() == STRUCTURAL_SITE_GROUP));

    let left = core.body().site(core.site(AttachmentFace::Left).unwrap()).unwrap();
    assert_eq!(left.name, "core-0-left");
    assert!(left.spec.position.abs_diff_eq(Vec3::new(0.0, 0.05, 0.0), 1e-6));
    // A child on the left face grows along +Y.
    assert!((left.spec.orientation * Vec3::X).abs_diff_eq(Vec3::Y, 1e-6));

    let back = core.body().find_site("core-0-back").unwrap();
    assert!((back.spec.orientation * Vec3::X).abs_diff_eq(Vec3::NEG_X, 1e-6));
}

#[test]
fn test_brick_leaves_back_face_free_and_rotates_about_attachment_axis() {
    let config = ModuleConfig::default();
    let mut brick = BrickModule::new(3, &config).unwrap();

    assert_eq!(brick.index(), 3);
    assert_eq!(brick.module_type(), ModuleType::Brick);
    assert!(brick.site(AttachmentFace::Back).is_none());
    assert_eq!(brick.body().sites().len(), 5);

    let front = brick.body().site(brick.site(AttachmentFace::Front).unwrap()).unwrap();
    assert!(front.spec.position.abs_diff_eq(Vec3::new(0.05, 0.0, 0.0), 1e-6));

    brick.rotate(90.0).unwrap();
    assert!((brick.orientation() * Vec3::Y).abs_diff_eq(Vec3::Z, 1e-6));
    // The attachment axis itself is unchanged.
    assert!((brick.orientation() * Vec3::X).abs_diff_eq(Vec3::X, 1e-6));
}

#[test]
fn test_core_rotates_about_vertical_axis() {
    let mut core = CoreModule::new(0, &ModuleConfig::default()).unwrap();
    core.rotate(-90.0).unwrap();
    assert!((core.orientation() * Vec3::X).abs_diff_eq(Vec3::NEG_Y, 1e-6));
    assert!((core.orientation() * Vec3::Z).abs_diff_eq(Vec3::Z, 1e-6));
}

#[test]
fn test_hinge_has_limited_joint_and_single_site() {
    let config = ModuleConfig::default();
    let hinge = HingeModule::new(7, &config).unwrap();
    let body = hinge.body();

    assert_eq!(body.sites().len(), 1);
    assert!(hinge.site(AttachmentFace::Front).is_some());
    assert_eq!(body.joints.len(), 1);

    let joint = &body.joints[0];
    assert_eq!(joint.name, "hinge-7-joint");
    assert_eq!(joint.joint_type, JointType::Hinge);
    assert_eq!(joint.axis, Vec3::Y);
    let limits = joint.limits.unwrap();
    assert!(approx(limits.min, -std::f32::consts::FRAC_PI_2));
    assert!(approx(limits.max, std::f32::consts::FRAC_PI_2));
}

#[test]
fn test_geom_mass_follows_volume_and_density() {
    let config = ModuleConfig::default();
    let brick = BrickModule::new(1, &config).unwrap();

    // Cube of side 0.05 m at 100 kg/m^3.
    let expected = 0.05f32.powi(3) * config.density;
    assert!(approx(brick.body().total_mass(), expected));

    let hinge = HingeModule::new(2, &config).unwrap();
    let geoms: f32 = hinge.body().geoms.iter().map(|geom| geom.mass).sum();
    assert_eq!(hinge.body().geoms.len(), 2);
    assert!(approx(hinge.body().total_mass(), geoms));
}

#[test]
fn test_assembled_tree_composes_poses_and_masses() {
    let config = ModuleConfig::default();
    let mut core = CoreModule::new(0, &config).unwrap();
    let mut brick = BrickModule::new(1, &config).unwrap();
    brick.rotate(90.0).unwrap();

    let brick_mass = brick.body().total_mass();
    let core_mass = core.body().total_mass();
    let front = core.site(AttachmentFace::Front).unwrap();

    let placed = core.body_mut().attach(front, brick.into_body()).unwrap();
    assert!(placed.position.abs_diff_eq(Vec3::new(0.05, 0.0, 0.0), 1e-6));
    assert!(
        placed
            .orientation
            .abs_diff_eq(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2), 1e-6)
    );

    // The brick's top site now faces the core's -Y side.
    let top = placed.find_site("brick-1-top").unwrap();
    let world = placed.position + placed.orientation * top.spec.position;
    assert!(world.abs_diff_eq(Vec3::new(0.075, -0.025, 0.0), 1e-6));

    let body = core.into_body();
    assert_eq!(body.body_count(), 2);
    assert!(approx(body.total_mass(), core_mass + brick_mass));
}

#[test]
fn test_standard_registry_instantiates_and_rotates() {
    let registry = ModuleRegistry::standard().unwrap();

    assert_eq!(registry.len(), 3);
    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec!["BrickModule", "CoreModule", "HingeModule"]
    );
    assert_eq!(registry.for_type(ModuleType::Hinge).unwrap().name(), "HingeModule");

    let mut hinge = registry.instantiate("HingeModule", 12).unwrap();
    assert_eq!(hinge.index(), 12);
    assert_eq!(hinge.module_type(), ModuleType::Hinge);
    hinge.rotate(45.0).unwrap();
    assert!(
        hinge
            .orientation()
            .abs_diff_eq(Quat::from_rotation_x(45.0f32.to_radians()), 1e-6)
    );
}

#[test]
fn test_registry_rejects_incomplete_or_duplicate_variants() {
    let mut registry = ModuleRegistry::new();
    let base = ModuleSchema::base();

    let no_rotation = ModuleSchema::builder(&base, "Static")
        .attribute("index", 0u32)
        .attribute("module_type", ModuleType::Brick)
        .define()
        .unwrap();
    assert_eq!(
        registry.register(no_rotation),
        Err(ModuleError::RotateNotImplemented { class: "Static".into() })
    );

    assert_eq!(
        registry.register(Arc::clone(&base)),
        Err(ModuleError::AbstractVariant { class: "Module".into() })
    );

    let leg = ModuleSchema::builder(&base, "Leg")
        .attribute("index", 0u32)
        .attribute("module_type", ModuleType::Brick)
        .rotation(rotate_about_x)
        .define()
        .unwrap();
    registry.register(Arc::clone(&leg)).unwrap();
    assert_eq!(
        registry.register(leg),
        Err(ModuleError::DuplicateVariant { class: "Leg".into() })
    );

    assert_eq!(
        registry.instantiate("Arm", 0).unwrap_err(),
        ModuleError::UnknownVariant { class: "Arm".into() }
    );
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_config_serializes_with_defaults() {
    let config = ModuleConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let parsed: ModuleConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, config);
    assert!(approx(parsed.site_radius, 0.005));
}
