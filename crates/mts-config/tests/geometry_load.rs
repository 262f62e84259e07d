use std::path::PathBuf;

use mts_config::{
    resolve, GeometryOverlay, GeometryRegistry, OverlayValue, RawOptions, RunDefaults,
    YamlGeometryRegistry,
};

fn bundled_geometry() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("geometry/mts_config.yaml")
}

#[test]
fn overlay_carries_every_override_key() {
    let options = resolve(&RawOptions::default(), &RunDefaults::default()).expect("resolve");
    let overlay = GeometryOverlay::from_options(&options);
    for key in [
        "Yheight",
        "tankDesign",
        "muShieldDesign",
        "nuTauTargetDesign",
        "CaloDesign",
        "strawDesign",
        "muShieldGeo",
        "muShieldStepGeo",
        "muShieldWithCobaltMagnet",
        "SC_mag",
        "scName",
        "DecayVolumeMedium",
        "SND",
    ] {
        assert!(overlay.get(key).is_some(), "missing overlay key {key}");
    }
    assert_eq!(overlay.len(), 13);
    assert_eq!(overlay.get("muShieldGeo"), Some(&OverlayValue::Null));
    assert_eq!(overlay.get("SC_mag"), Some(&OverlayValue::Bool(true)));
}

#[test]
fn bundled_geometry_applies_overlay() {
    let options = resolve(&RawOptions::default(), &RunDefaults::default()).expect("resolve");
    let overlay = GeometryOverlay::from_options(&options);
    let geometry = YamlGeometryRegistry::new(bundled_geometry())
        .load(&overlay)
        .expect("load geometry");
    assert_eq!(geometry.tank_design, 6);
    assert_eq!(geometry.shield_design, 8);
    assert_eq!(geometry.tank_height, 6.0);
    assert_eq!(geometry.decay_volume_medium, "helium");
    assert!(geometry.extra.contains_key("MTS"));
    assert!(geometry.extra.contains_key("scName"));
    assert!(geometry.chamber1.z - geometry.chambers.tub1_length < geometry.track_station1.z);
}

#[test]
fn missing_base_file_is_a_geometry_error() {
    let dir = tempfile::tempdir().expect("tmp");
    let registry = YamlGeometryRegistry::new(dir.path().join("absent.yaml"));
    let err = registry
        .load(&GeometryOverlay::default())
        .expect_err("missing base");
    assert_eq!(err.info().code, "mts_config.geometry_read");
}

#[test]
fn incomplete_base_is_a_schema_error() {
    let dir = tempfile::tempdir().expect("tmp");
    let path = dir.path().join("partial.yaml");
    std::fs::write(&path, "target:\n  z0: 0.0\n").expect("write");
    let err = YamlGeometryRegistry::new(&path)
        .load(&GeometryOverlay::default())
        .expect_err("schema");
    assert_eq!(err.info().code, "mts_config.geometry_schema");
}
