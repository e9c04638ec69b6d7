// tests/site_attachment.rs
use glam::{Quat, Vec3};
use robogen_modules::{
    BodySpec, BodyTarget, STRUCTURAL_SITE_GROUP, SiteError, SiteShape, SiteSpec, add_site,
};

/// A target that records what it was asked to create and can be told to fail.
#[derive(Default)]
struct RecordingTarget {
    created: Vec<SiteSpec>,
    reject_with: Option<String>,
}

impl BodyTarget for RecordingTarget {
    type Site = usize;
    type Error = String;

    fn create_site(&mut self, site: SiteSpec) -> Result<usize, String> {
        if let Some(reason) = &self.reject_with {
            return Err(reason.clone());
        }
        self.created.push(site);
        Ok(self.created.len() - 1)
    }
}

#[test]
fn test_caller_group_is_overridden() {
    let mut target = RecordingTarget::default();
    let spec = SiteSpec::new()
        .named("anchor")
        .at(Vec3::new(1.0, 2.0, 3.0))
        .in_group(99);

    let handle = add_site(&mut target, spec.clone()).unwrap();

    assert_eq!(handle, 0);
    let created = &target.created[0];
    assert_eq!(created.group, STRUCTURAL_SITE_GROUP);
    assert_eq!(created.group, 5);
    // Everything else passes through untouched.
    assert_eq!(created.name, spec.name);
    assert_eq!(created.position, spec.position);
    assert_eq!(created.size, spec.size);
}

#[test]
fn test_target_error_propagates_unchanged() {
    let mut target = RecordingTarget {
        reject_with: Some("bad geometry".into()),
        ..Default::default()
    };

    let direct = target.create_site(SiteSpec::new());
    let through = add_site(&mut target, SiteSpec::new());

    assert_eq!(through, Err("bad geometry".to_string()));
    assert_eq!(through, direct);
    assert!(target.created.is_empty());
}

#[test]
fn test_body_spec_size_error_matches_direct_call() {
    let mut body = BodySpec::new("torso");
    let spec = SiteSpec::new().shaped(SiteShape::Box, Vec3::new(0.01, -0.01, 0.01));

    let direct = body.create_site(spec.clone()).unwrap_err();
    let through = add_site(&mut body, spec).unwrap_err();

    assert_eq!(through, direct);
    assert!(matches!(through, SiteError::InvalidSize { .. }));
    assert!(body.sites().is_empty());
}

#[test]
fn test_body_spec_rejects_duplicate_and_non_finite_sites() {
    let mut body = BodySpec::new("torso");
    add_site(&mut body, SiteSpec::new().named("a")).unwrap();

    let duplicate = add_site(&mut body, SiteSpec::new().named("a")).unwrap_err();
    assert_eq!(
        duplicate,
        SiteError::DuplicateName {
            body: "torso".into(),
            name: "a".into(),
        }
    );

    let non_finite = add_site(&mut body, SiteSpec::new().at(Vec3::new(f32::NAN, 0.0, 0.0)));
    assert!(matches!(non_finite, Err(SiteError::NonFinitePose { .. })));
    assert_eq!(body.sites().len(), 1);
}

#[test]
fn test_unnamed_sites_get_unique_names() {
    let mut body = BodySpec::new("torso");
    let first = add_site(&mut body, SiteSpec::new()).unwrap();
    let second = add_site(&mut body, SiteSpec::new()).unwrap();

    assert_ne!(first, second);
    assert_eq!(body.site(first).unwrap().name, "torso-site0");
    assert_eq!(body.site(second).unwrap().name, "torso-site1");
    assert!(body.sites().iter().all(|site| site.group() == STRUCTURAL_SITE_GROUP));
}

#[test]
fn test_attach_places_child_in_site_frame() {
    let mut body = BodySpec::new("torso");
    let site = add_site(
        &mut body,
        SiteSpec::new()
            .named("left")
            .at(Vec3::new(0.0, 0.5, 0.0))
            .oriented(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)),
    )
    .unwrap();

    let mut arm = BodySpec::new("arm");
    arm.position = Vec3::new(0.1, 0.0, 0.0);

    let placed = body.attach(site, arm).unwrap();

    // The child's +X offset is turned onto the parent's +Y by the site.
    assert!(placed.position.abs_diff_eq(Vec3::new(0.0, 0.6, 0.0), 1e-6));
    assert!((placed.orientation * Vec3::X).abs_diff_eq(Vec3::Y, 1e-6));
    assert_eq!(body.body_count(), 2);
}

#[test]
fn test_attach_to_unknown_site_fails() {
    let mut body = BodySpec::new("torso");
    let missing = add_site(&mut BodySpec::new("other"), SiteSpec::new()).unwrap();

    let err = body.attach(missing, BodySpec::new("arm")).unwrap_err();
    assert_eq!(
        err,
        SiteError::UnknownSite {
            body: "torso".into(),
            id: 0,
        }
    );
}
