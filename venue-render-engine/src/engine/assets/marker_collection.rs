use bevy::color::HexColorError;
use bevy::prelude::*;
use constants::marker_settings::DEFAULT_MARKER_COLOR;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable marker identity, the only key used to match instances across updates.
/// Uniqueness within a collection is a caller precondition and is not checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(pub String);

impl MarkerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MarkerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A typed point of interest on the venue floor. Mirrors the JSON record exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: MarkerId,
    /// Open-ended type tag, resolved through `MarkerKind::from_tag`.
    #[serde(rename = "type")]
    pub kind: String,
    pub position: [f32; 3],
    /// Euler XYZ in radians.
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    /// CSS hex colour, e.g. `#ff6b35`.
    #[serde(default)]
    pub color: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl Marker {
    pub fn new(id: &str, kind: &str, position: Vec3, name: &str) -> Self {
        Self {
            id: MarkerId::from(id),
            kind: kind.to_string(),
            position: position.to_array(),
            rotation: [0.0; 3],
            scale: unit_scale(),
            color: String::new(),
            name: name.to_string(),
            description: None,
            capacity: None,
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    /// World transform at rest, before any hover animation.
    pub fn transform(&self) -> Transform {
        let [rx, ry, rz] = self.rotation;
        Transform::from_translation(self.position())
            .with_rotation(Quat::from_euler(EulerRot::XYZ, rx, ry, rz))
            .with_scale(Vec3::from_array(self.scale))
    }

    /// Display tint. Bad colour strings degrade to the default marker colour.
    pub fn tint(&self) -> Color {
        match parse_marker_color(&self.color) {
            Ok(color) => color,
            Err(MarkerColorError::Empty) => DEFAULT_MARKER_COLOR,
            Err(err) => {
                warn!("Marker {}: {}, using default colour", self.id, err);
                DEFAULT_MARKER_COLOR
            }
        }
    }

    /// True when a change to this record requires rebuilding the model.
    pub fn needs_new_model(&self, previous: &Marker) -> bool {
        self.kind != previous.kind || self.color != previous.color
    }
}

#[derive(Debug, Error)]
pub enum MarkerColorError {
    #[error("colour is empty")]
    Empty,
    #[error("invalid hex colour {raw:?}: {source}")]
    Hex {
        raw: String,
        #[source]
        source: HexColorError,
    },
}

/// Parse a CSS hex colour (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`).
pub fn parse_marker_color(raw: &str) -> Result<Color, MarkerColorError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MarkerColorError::Empty);
    }
    Srgba::hex(trimmed)
        .map(Color::from)
        .map_err(|source| MarkerColorError::Hex {
            raw: trimmed.to_string(),
            source,
        })
}

/// Marker collection file as a Bevy asset, loaded from `*.markers.json`.
#[derive(Asset, TypePath, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerCollection {
    pub markers: Vec<Marker>,
}

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("malformed marker collection: {0}")]
    Json(#[from] serde_json::Error),
}

impl MarkerCollection {
    /// Accept either `{ "markers": [...] }` or a bare array of markers.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, CollectionError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Payload {
            Wrapped(MarkerCollection),
            Bare(Vec<Marker>),
        }

        Ok(match serde_json::from_value::<Payload>(value)? {
            Payload::Wrapped(collection) => collection,
            Payload::Bare(markers) => MarkerCollection { markers },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn optional_fields_default_when_missing() {
        let marker: Marker = serde_json::from_value(json!({
            "id": "e1",
            "type": "entrance",
            "position": [0.0, 0.0, 0.0],
            "name": "Main Gate"
        }))
        .unwrap();

        assert_eq!(marker.id, MarkerId::from("e1"));
        assert_eq!(marker.rotation, [0.0; 3]);
        assert_eq!(marker.scale, [1.0; 3]);
        assert!(marker.description.is_none());
        assert!(marker.capacity.is_none());
    }

    #[test]
    fn serialisation_omits_absent_optionals() {
        let marker = Marker::new("e1", "entrance", Vec3::ZERO, "Main Gate");
        let value = serde_json::to_value(&marker).unwrap();
        assert_eq!(value["type"], "entrance");
        assert!(value.get("description").is_none());
        assert!(value.get("capacity").is_none());
    }

    #[test]
    fn hex_colours_parse_with_or_without_hash() {
        let a = parse_marker_color("#ff0000").unwrap();
        let b = parse_marker_color("ff0000").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_srgba(), Srgba::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn bad_colour_degrades_to_default_tint() {
        assert!(matches!(parse_marker_color(""), Err(MarkerColorError::Empty)));
        assert!(matches!(
            parse_marker_color("not-a-colour"),
            Err(MarkerColorError::Hex { .. })
        ));

        let marker = Marker::new("x", "booth", Vec3::ZERO, "Booth").with_color("#zzz");
        assert_eq!(marker.tint(), DEFAULT_MARKER_COLOR);
    }

    #[test]
    fn transform_applies_rotation_and_scale() {
        let mut marker = Marker::new("s", "stage", Vec3::new(1.0, 2.0, 3.0), "Stage");
        marker.rotation = [0.0, std::f32::consts::FRAC_PI_2, 0.0];
        marker.scale = [2.0, 2.0, 2.0];

        let transform = marker.transform();
        assert_eq!(transform.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.scale, Vec3::splat(2.0));
        let forward = transform.rotation * Vec3::X;
        assert!((forward - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn collection_accepts_wrapped_and_bare_payloads() {
        let record = json!({
            "id": "b1", "type": "booth", "position": [1.0, 0.0, 1.0], "name": "Booth 1"
        });
        let wrapped = MarkerCollection::from_json_value(json!({ "markers": [record.clone()] }));
        let bare = MarkerCollection::from_json_value(json!([record]));
        assert_eq!(wrapped.unwrap(), bare.unwrap());

        let broken = MarkerCollection::from_json_value(json!({ "markers": 3 }));
        assert!(matches!(broken, Err(CollectionError::Json(_))));
    }

    #[test]
    fn model_rebuild_only_on_type_or_colour_change() {
        let original = Marker::new("f1", "food", Vec3::ZERO, "Tacos").with_color("#ff0000");
        let moved = Marker {
            position: [5.0, 0.0, 5.0],
            ..original.clone()
        };
        let recoloured = original.clone().with_color("#00ff00");

        assert!(!moved.needs_new_model(&original));
        assert!(recoloured.needs_new_model(&original));
    }
}
