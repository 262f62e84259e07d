#![allow(dead_code)]

use std::collections::BTreeMap;

use mts_config::geometry::{BeamBox, Bfield, Chambers, Station, Target};
use mts_config::{resolve, Geometry, RawOptions, RunDefaults, RunOptions};

pub fn geometry(target_z: f64, chamber_z: f64, tube: f64, station_z: f64) -> Geometry {
    Geometry {
        target: Target { z0: target_z },
        chamber1: Station { z: chamber_z },
        chambers: Chambers { tub1_length: tube },
        track_station1: Station { z: station_z },
        beam_box: BeamBox {
            gausbeam: true,
            tx: 4.0,
            ty: 3.0,
        },
        bfield: Bfield::default(),
        tank_height: 6.0,
        tank_design: 6,
        shield_design: 8,
        target_design: 4,
        calo_design: 3,
        straw_design: 10,
        decay_volume_medium: "helium".to_string(),
        extra: BTreeMap::new(),
    }
}

pub fn default_geometry() -> Geometry {
    geometry(-7086.0, -2465.0, 250.0, 3540.0)
}

pub fn options(raw: RawOptions) -> RunOptions {
    resolve(&raw, &RunDefaults::default()).expect("resolve options")
}
