//! Geometry description loading.
//!
//! The registry owns the detector description; the driver only reads the handful of
//! placements needed for generator wiring and naming. [`YamlGeometryRegistry`] reads a
//! base YAML description and applies the overlay as a dictionary update, coercing each
//! value to the type already stored under its key.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use mts_core::{ErrorInfo, MtsError};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Number, Value};

use crate::overlay::{GeometryOverlay, OverlayValue};

/// Loader turning an overlay into a geometry object.
pub trait GeometryRegistry {
    fn load(&self, overlay: &GeometryOverlay) -> Result<Geometry, MtsError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub z0: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chambers {
    #[serde(rename = "Tub1length")]
    pub tub1_length: f64,
}

/// Beam spot description of the charm-only target box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamBox {
    pub gausbeam: bool,
    #[serde(rename = "TX")]
    pub tx: f64,
    #[serde(rename = "TY")]
    pub ty: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bfield {
    #[serde(rename = "fieldMap", default, skip_serializing_if = "Option::is_none")]
    pub field_map: Option<String>,
}

/// Geometry object returned by the registry. Unknown sections are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub target: Target,
    #[serde(rename = "Chamber1")]
    pub chamber1: Station,
    pub chambers: Chambers,
    #[serde(rename = "TrackStation1")]
    pub track_station1: Station,
    #[serde(rename = "Box")]
    pub beam_box: BeamBox,
    #[serde(rename = "Bfield", default)]
    pub bfield: Bfield,
    #[serde(rename = "Yheight")]
    pub tank_height: f64,
    #[serde(rename = "tankDesign")]
    pub tank_design: u32,
    #[serde(rename = "muShieldDesign")]
    pub shield_design: u32,
    #[serde(rename = "nuTauTargetDesign")]
    pub target_design: u32,
    #[serde(rename = "CaloDesign")]
    pub calo_design: u32,
    #[serde(rename = "strawDesign")]
    pub straw_design: u32,
    #[serde(rename = "DecayVolumeMedium")]
    pub decay_volume_medium: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Registry backed by a YAML base description.
#[derive(Debug, Clone)]
pub struct YamlGeometryRegistry {
    base: PathBuf,
}

impl YamlGeometryRegistry {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl GeometryRegistry for YamlGeometryRegistry {
    fn load(&self, overlay: &GeometryOverlay) -> Result<Geometry, MtsError> {
        let contents = fs::read_to_string(&self.base).map_err(|err| {
            MtsError::Geometry(
                ErrorInfo::new("mts_config.geometry_read", err.to_string())
                    .with_context("path", self.base.display().to_string()),
            )
        })?;
        let base: Value = serde_yaml::from_str(&contents).map_err(|err| {
            MtsError::Geometry(
                ErrorInfo::new("mts_config.geometry_parse", err.to_string())
                    .with_context("path", self.base.display().to_string()),
            )
        })?;
        let Value::Mapping(mut mapping) = base else {
            return Err(MtsError::Geometry(
                ErrorInfo::new("mts_config.geometry_shape", "geometry root must be a mapping")
                    .with_context("path", self.base.display().to_string()),
            ));
        };
        apply_overlay(&mut mapping, overlay);
        serde_yaml::from_value(Value::Mapping(mapping)).map_err(|err| {
            MtsError::Geometry(
                ErrorInfo::new("mts_config.geometry_schema", err.to_string())
                    .with_context("path", self.base.display().to_string()),
            )
        })
    }
}

/// Dictionary update of `mapping` with the overlay entries.
pub fn apply_overlay(mapping: &mut Mapping, overlay: &GeometryOverlay) {
    for (key, value) in overlay.iter() {
        let key = Value::String(key.clone());
        let incoming = overlay_to_yaml(value);
        let merged = match mapping.get(&key) {
            Some(existing) => coerce_like(existing, incoming),
            None => incoming,
        };
        mapping.insert(key, merged);
    }
}

fn overlay_to_yaml(value: &OverlayValue) -> Value {
    match value {
        OverlayValue::Bool(flag) => Value::Bool(*flag),
        OverlayValue::Int(int) => Value::Number(Number::from(*int)),
        OverlayValue::Float(float) => Value::Number(Number::from(*float)),
        OverlayValue::Text(text) => Value::String(text.clone()),
        OverlayValue::Null => Value::Null,
    }
}

/// Converts `incoming` to the scalar type of `existing` when a lossless conversion exists.
fn coerce_like(existing: &Value, incoming: Value) -> Value {
    match (existing, &incoming) {
        (Value::Number(old), Value::Number(new)) if old.is_f64() && !new.is_f64() => new
            .as_f64()
            .map(|float| Value::Number(Number::from(float)))
            .unwrap_or(incoming),
        (Value::Number(old), Value::Number(new)) if !old.is_f64() && new.is_f64() => {
            match new.as_f64() {
                // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
                Some(float)
                    if float.fract() == 0.0
                        && float >= i64::MIN as f64
                        && float < i64::MAX as f64 =>
                {
                    Value::Number(Number::from(float as i64))
                }
                _ => incoming,
            }
        }
        (Value::Number(_), Value::String(text)) => {
            if let Ok(int) = text.parse::<i64>() {
                coerce_like(existing, Value::Number(Number::from(int)))
            } else if let Ok(float) = text.parse::<f64>() {
                coerce_like(existing, Value::Number(Number::from(float)))
            } else {
                incoming
            }
        }
        (Value::Bool(_), Value::Number(new)) => new
            .as_i64()
            .map(|int| Value::Bool(int != 0))
            .unwrap_or(incoming),
        (Value::String(_), Value::Number(new)) => Value::String(new.to_string()),
        (Value::String(_), Value::Bool(flag)) => Value::String(flag.to_string()),
        _ => incoming,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(value: &Value) -> &Number {
        match value {
            Value::Number(number) => number,
            other => panic!("expected number, got {other:?}"),
        }
    }

    #[test]
    fn int_into_float_key_becomes_float() {
        let existing = Value::Number(Number::from(10.0));
        let merged = coerce_like(&existing, Value::Number(Number::from(6)));
        assert!(num(&merged).is_f64());
        assert_eq!(num(&merged).as_f64(), Some(6.0));
    }

    #[test]
    fn integral_float_into_int_key_becomes_int() {
        let existing = Value::Number(Number::from(7));
        let merged = coerce_like(&existing, Value::Number(Number::from(9.0)));
        assert_eq!(num(&merged).as_i64(), Some(9));
        let kept = coerce_like(&existing, Value::Number(Number::from(9.5)));
        assert_eq!(num(&kept).as_f64(), Some(9.5));
    }

    #[test]
    fn out_of_range_float_stays_float() {
        let existing = Value::Number(Number::from(7));
        let kept = coerce_like(&existing, Value::Number(Number::from(1.0e19)));
        assert!(num(&kept).is_f64());
        assert_eq!(num(&kept).as_f64(), Some(1.0e19));
        let kept = coerce_like(&existing, Value::Number(Number::from(-1.0e19)));
        assert_eq!(num(&kept).as_f64(), Some(-1.0e19));
    }

    #[test]
    fn numeric_text_and_bool_coercion() {
        let merged = coerce_like(&Value::Number(Number::from(1)), Value::String("4".into()));
        assert_eq!(num(&merged).as_i64(), Some(4));
        let merged = coerce_like(&Value::Bool(true), Value::Number(Number::from(0)));
        assert_eq!(merged, Value::Bool(false));
        let merged = coerce_like(&Value::String("x".into()), Value::Number(Number::from(3)));
        assert_eq!(merged, Value::String("3".into()));
    }

    #[test]
    fn overlay_adds_missing_keys() {
        let mut mapping = Mapping::new();
        let mut overlay = GeometryOverlay::default();
        overlay.set("scName", OverlayValue::Text("sc_v6".into()));
        overlay.set("muShieldGeo", OverlayValue::Null);
        apply_overlay(&mut mapping, &overlay);
        assert_eq!(
            mapping.get(Value::String("scName".into())),
            Some(&Value::String("sc_v6".into()))
        );
        assert_eq!(mapping.get(Value::String("muShieldGeo".into())), Some(&Value::Null));
    }
}
