use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Prefix for every backend route; empty means same origin.
    pub api_base: String,
    pub logout_url: String,
    /// Signed-in user, injected by the page template.
    pub current_user: String,
    pub map: MapConfig,
    pub icons: IconSet,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            logout_url: "/logout".into(),
            current_user: String::new(),
            map: MapConfig::default(),
            icons: IconSet::default(),
        }
    }
}

impl ViewConfig {
    pub fn from_json(value: serde_json::Value) -> Result<Self, String> {
        serde_json::from_value(value).map_err(|e| e.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub element_id: String,
    pub center: [f64; 2],
    pub zoom: f64,
    pub tile_url: String,
    pub attribution: String,
    pub geography_style: LayerStyle,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            element_id: "map".into(),
            center: [53.7267, -127.6476],
            zoom: 6.0,
            tile_url: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png".into(),
            attribution: "Map tiles © Carto · Data © OpenStreetMap".into(),
            geography_style: LayerStyle::default(),
        }
    }
}

/// Path style applied to the base geography layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    pub weight: u32,
    pub color: String,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            weight: 2,
            color: "gray".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconSet {
    pub base_path: String,
    pub wildfire: IconSpec,
    pub road_closure: IconSpec,
    pub user: IconSpec,
}

impl Default for IconSet {
    fn default() -> Self {
        Self {
            base_path: "/static/img/".into(),
            wildfire: IconSpec::new("fire.png", 32),
            road_closure: IconSpec::new("x.png", 30),
            user: IconSpec::new("user.png", 32),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IconSpec {
    pub file: String,
    pub size: u32,
    pub anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
}

impl IconSpec {
    pub fn new(file: &str, size: u32) -> Self {
        Self {
            file: file.into(),
            size,
            anchor: [10, 10],
            popup_anchor: [0, -10],
        }
    }

    pub fn url(&self, base_path: &str) -> String {
        format!("{}/{}", base_path.trim_end_matches('/'), self.file)
    }
}
