//! Option objects handed to Leaflet. Field names follow Leaflet's camelCase.

use serde::Serialize;
use wildfire_core::config::{IconSpec, LayerStyle};

#[derive(Clone, Debug, Serialize)]
pub struct TileLayerOptions {
    pub attribution: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconOptions {
    pub icon_url: String,
    pub icon_size: [u32; 2],
    pub icon_anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
}

impl IconOptions {
    pub fn from_spec(spec: &IconSpec, base_path: &str) -> Self {
        Self {
            icon_url: spec.url(base_path),
            icon_size: [spec.size, spec.size],
            icon_anchor: spec.anchor,
            popup_anchor: spec.popup_anchor,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct GeoJsonOptions {
    pub style: PathStyle,
}

#[derive(Clone, Debug, Serialize)]
pub struct PathStyle {
    pub weight: u32,
    pub color: String,
}

impl From<&LayerStyle> for GeoJsonOptions {
    fn from(style: &LayerStyle) -> Self {
        Self {
            style: PathStyle {
                weight: style.weight,
                color: style.color.clone(),
            },
        }
    }
}
