use crate::config::{IconSet, IconSpec, LayerStyle};
use crate::records::{FireRecord, RoadClosureRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Wildfire,
    RoadClosure,
    UserLocation,
}

impl MarkerKind {
    pub fn icon<'a>(&self, icons: &'a IconSet) -> &'a IconSpec {
        match self {
            MarkerKind::Wildfire => &icons.wildfire,
            MarkerKind::RoadClosure => &icons.road_closure,
            MarkerKind::UserLocation => &icons.user,
        }
    }
}

/// Handle for a marker placed on a [`MapSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub latitude: f64,
    pub longitude: f64,
    /// HTML shown in the marker popup; user-supplied text is already escaped.
    pub popup: String,
    pub open_popup: bool,
}

impl Marker {
    pub fn wildfire(fire: &FireRecord) -> Self {
        let mut popup = format!(
            "<b>🔥 {}</b><br>Cause: {}<br>📍 {}, {}",
            escape_html(&fire.description),
            escape_html(&fire.reason),
            fire.latitude,
            fire.longitude
        );
        push_id(&mut popup, fire.id);
        Self {
            kind: MarkerKind::Wildfire,
            latitude: fire.latitude,
            longitude: fire.longitude,
            popup,
            open_popup: false,
        }
    }

    pub fn road_closure(closure: &RoadClosureRecord) -> Self {
        let mut popup = format!(
            "<b>❌ Road Closure</b><br>Reason: {}<br>📍 {}, {}",
            escape_html(&closure.reason),
            closure.latitude,
            closure.longitude
        );
        push_id(&mut popup, closure.id);
        Self {
            kind: MarkerKind::RoadClosure,
            latitude: closure.latitude,
            longitude: closure.longitude,
            popup,
            open_popup: false,
        }
    }

    pub fn user(latitude: f64, longitude: f64) -> Self {
        Self {
            kind: MarkerKind::UserLocation,
            latitude,
            longitude,
            popup: "Your Location".into(),
            open_popup: true,
        }
    }
}

fn push_id(popup: &mut String, id: Option<i64>) {
    if let Some(id) = id {
        popup.push_str(&format!("<br>ID: {id}"));
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Rendering surface for markers and vector layers. Geometry, tiles and
/// popups are the surface's business.
pub trait MapSurface {
    fn place_marker(&self, marker: &Marker) -> MarkerId;
    fn remove_marker(&self, id: MarkerId);
    fn add_geojson(&self, data: &serde_json::Value, style: &LayerStyle);
}
