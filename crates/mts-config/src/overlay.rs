//! Key/value overlay handed to the geometry registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::options::RunOptions;

/// Scalar value of one overlay entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OverlayValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

/// Flat mapping of geometry override keys, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeometryOverlay {
    entries: BTreeMap<String, OverlayValue>,
}

impl GeometryOverlay {
    /// Builds the overlay from resolved options.
    pub fn from_options(options: &RunOptions) -> Self {
        let geo = &options.geometry;
        let mut overlay = Self::default();
        overlay.set("Yheight", OverlayValue::Float(geo.tank_height));
        overlay.set("tankDesign", OverlayValue::Int(geo.tank_design.into()));
        overlay.set("muShieldDesign", OverlayValue::Int(geo.shield_design.into()));
        overlay.set("nuTauTargetDesign", OverlayValue::Int(geo.target_design.into()));
        overlay.set("CaloDesign", OverlayValue::Int(geo.calo_design.into()));
        overlay.set("strawDesign", OverlayValue::Int(geo.straw_design.into()));
        overlay.set(
            "muShieldGeo",
            geo.shield_geofile
                .as_ref()
                .map(|path| OverlayValue::Text(path.display().to_string()))
                .unwrap_or(OverlayValue::Null),
        );
        overlay.set("muShieldStepGeo", OverlayValue::Bool(geo.step_muon_shield));
        overlay.set(
            "muShieldWithCobaltMagnet",
            OverlayValue::Int(geo.cobalt_magnets.into()),
        );
        overlay.set("SC_mag", OverlayValue::Bool(geo.sc_magnet));
        overlay.set("scName", OverlayValue::Text(geo.sc_name.clone()));
        overlay.set(
            "DecayVolumeMedium",
            OverlayValue::Text(geo.decay_volume_medium.as_str().to_string()),
        );
        overlay.set("SND", OverlayValue::Bool(geo.snd));
        overlay
    }

    pub fn set(&mut self, key: impl Into<String>, value: OverlayValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&OverlayValue> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OverlayValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
