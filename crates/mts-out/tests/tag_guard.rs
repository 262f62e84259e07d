use std::fs;

use mts_config::{resolve, EngineFlags, RawOptions, RunDefaults, RunOptions};
use mts_out::{purge_stale, OutputPaths, OutputTag};
use proptest::prelude::*;
use tempfile::tempdir;

fn options(raw: RawOptions) -> RunOptions {
    resolve(&raw, &RunDefaults::default()).expect("resolve options")
}

#[test]
fn default_run_tag() {
    let opts = options(RawOptions {
        tank_design: Some(4),
        ..RawOptions::default()
    });
    assert_eq!(OutputTag::from_options(&opts).as_str(), "Pythia8-TGeant4");
}

#[test]
fn conical_prefix_above_threshold() {
    let opts = options(RawOptions {
        tank_design: Some(6),
        display: true,
        ..RawOptions::default()
    });
    assert_eq!(
        OutputTag::from_options(&opts).as_str(),
        "conical.Pythia8-TGeant4_D"
    );
}

#[test]
fn particle_gun_and_charm_only_tags() {
    let mut raw = RawOptions {
        engines: EngineFlags {
            particle_gun: true,
            ..EngineFlags::default()
        },
        tank_design: Some(4),
        ..RawOptions::default()
    };
    raw.particle_gun.pid = 13;
    assert_eq!(OutputTag::from_options(&options(raw)).as_str(), "PG_13-TGeant4");

    let opts = options(RawOptions {
        production: "charmonly".into(),
        tank_design: Some(4),
        ..RawOptions::default()
    });
    assert_eq!(
        OutputTag::from_options(&opts).as_str(),
        "Pythia8CharmOnly-TGeant4"
    );
}

#[test]
fn paths_share_the_tag() {
    let tag = OutputTag::from_options(&options(RawOptions::default()));
    let paths = OutputPaths::new(std::path::Path::new("/data/run"), &tag);
    assert_eq!(
        paths.event_file,
        std::path::Path::new("/data/run/ship.conical.Pythia8-TGeant4.root")
    );
    assert_eq!(
        paths.param_file,
        std::path::Path::new("/data/run/ship.params.conical.Pythia8-TGeant4.json")
    );
    for path in [&paths.geometry_file, &paths.basic_params_file, &paths.run_plan, &paths.log_file] {
        assert!(path.to_string_lossy().contains(tag.as_str()));
    }
}

#[test]
fn guard_removes_only_tagged_files() {
    let dir = tempdir().expect("tempdir");
    let tag = OutputTag::from_options(&options(RawOptions::default()));
    let paths = OutputPaths::new(dir.path(), &tag);
    fs::write(&paths.event_file, b"old").expect("stale event");
    fs::write(&paths.param_file, b"old").expect("stale params");
    fs::write(dir.path().join("partial.conical.Pythia8-TGeant4.tmp"), b"x").expect("stale");
    fs::write(dir.path().join("ship.Genie-TGeant4.root"), b"keep").expect("other");
    fs::create_dir(dir.path().join("dir.conical.Pythia8-TGeant4")).expect("dir");

    let removed = purge_stale(dir.path(), &tag).expect("purge");
    assert_eq!(removed.len(), 3);
    let left = fs::read_dir(dir.path())
        .expect("list")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .filter(|name| name.contains(tag.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(left, vec!["dir.conical.Pythia8-TGeant4".to_string()]);
    assert!(dir.path().join("ship.Genie-TGeant4.root").exists());
}

#[test]
fn guard_creates_missing_directory() {
    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("nested/out");
    let tag = OutputTag::from_options(&options(RawOptions::default()));
    assert!(purge_stale(&out, &tag).expect("purge").is_empty());
    assert!(out.is_dir());
}

proptest! {
    #[test]
    fn tag_is_a_function_of_options(
        pid in -3000i32..3000,
        tank in 3u32..8,
        display in any::<bool>(),
        gun in any::<bool>(),
    ) {
        let mut raw = RawOptions {
            engines: EngineFlags { particle_gun: gun, ..EngineFlags::default() },
            tank_design: Some(tank),
            display,
            ..RawOptions::default()
        };
        raw.particle_gun.pid = pid;
        let a = OutputTag::from_options(&options(raw.clone()));
        let b = OutputTag::from_options(&options(raw));
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.as_str().starts_with("conical."), tank > 4);
        prop_assert_eq!(a.as_str().ends_with("_D"), display);
    }
}
