use crate::dto::{GeoJsonOptions, IconOptions, TileLayerOptions};
use js_sys::{Array, Object, Reflect};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wildfire_core::config::{IconSet, LayerStyle, MapConfig};
use wildfire_core::map::{MapSurface, Marker, MarkerId, MarkerKind};

#[wasm_bindgen]
extern "C" {
    type LeafletMap;

    #[wasm_bindgen(js_namespace = L, js_name = map, catch)]
    fn create_map(element_id: &str) -> Result<LeafletMap, JsValue>;
    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &LeafletMap, center: &JsValue, zoom: f64) -> LeafletMap;
    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &LeafletMap, layer: &Layer) -> LeafletMap;
    #[wasm_bindgen(method)]
    fn on(this: &LeafletMap, event: &str, handler: &js_sys::Function) -> LeafletMap;

    type Layer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Layer, map: &LeafletMap) -> Layer;
    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &Layer, content: &str) -> Layer;
    #[wasm_bindgen(method, js_name = openPopup)]
    fn open_popup(this: &Layer) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn new_tile_layer(url: &str, options: &JsValue) -> Layer;
    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn new_marker(lat_lng: &JsValue, options: &JsValue) -> Layer;
    #[wasm_bindgen(js_namespace = L, js_name = icon)]
    fn new_icon(options: &JsValue) -> JsValue;
    #[wasm_bindgen(js_namespace = L, js_name = geoJSON)]
    fn new_geo_json(data: &JsValue, options: &JsValue) -> Layer;
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, String> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| e.to_string())
}

fn lat_lng(latitude: f64, longitude: f64) -> JsValue {
    Array::of2(&JsValue::from_f64(latitude), &JsValue::from_f64(longitude)).into()
}

fn click_position(event: &JsValue) -> Option<(f64, f64)> {
    let latlng = Reflect::get(event, &JsValue::from_str("latlng")).ok()?;
    let lat = Reflect::get(&latlng, &JsValue::from_str("lat")).ok()?.as_f64()?;
    let lng = Reflect::get(&latlng, &JsValue::from_str("lng")).ok()?.as_f64()?;
    Some((lat, lng))
}

/// Leaflet map bound to a container element, implementing [`MapSurface`].
///
/// The surface exists before the map does: markers placed before
/// [`LeafletSurface::mount`] succeeds are dropped with a warning, so the rest
/// of the page keeps working when Leaflet is unavailable.
#[derive(Default)]
pub struct LeafletSurface {
    map: RefCell<Option<LeafletMap>>,
    icons: RefCell<HashMap<MarkerKind, JsValue>>,
    markers: RefCell<HashMap<MarkerId, Layer>>,
    next_id: Cell<u64>,
}

impl LeafletSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the Leaflet map in `config.element_id` with its tile layer and
    /// marker icons.
    pub fn mount(&self, config: &MapConfig, icons: &IconSet) -> Result<(), String> {
        let map = create_map(&config.element_id)
            .map_err(|e| format!("failed to create map in #{}: {e:?}", config.element_id))?;
        map.set_view(&lat_lng(config.center[0], config.center[1]), config.zoom);

        let tiles = TileLayerOptions {
            attribution: config.attribution.clone(),
        };
        new_tile_layer(&config.tile_url, &to_js(&tiles)?).add_to(&map);

        let mut by_kind = HashMap::new();
        for kind in [
            MarkerKind::Wildfire,
            MarkerKind::RoadClosure,
            MarkerKind::UserLocation,
        ] {
            let options = IconOptions::from_spec(kind.icon(icons), &icons.base_path);
            by_kind.insert(kind, new_icon(&to_js(&options)?));
        }

        *self.icons.borrow_mut() = by_kind;
        *self.map.borrow_mut() = Some(map);
        Ok(())
    }

    /// Calls `handler` with the latitude and longitude of every map click.
    pub fn on_click(&self, handler: impl Fn(f64, f64) + 'static) {
        let map = self.map.borrow();
        let Some(map) = map.as_ref() else {
            log::warn!("click handler not attached, map not mounted");
            return;
        };
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            match click_position(&event) {
                Some((lat, lng)) => handler(lat, lng),
                None => log::warn!("map click without latlng"),
            }
        });
        map.on("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

impl MapSurface for LeafletSurface {
    fn place_marker(&self, marker: &Marker) -> MarkerId {
        let id = MarkerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let map = self.map.borrow();
        let Some(map) = map.as_ref() else {
            log::warn!("{:?} marker dropped, map not mounted", marker.kind);
            return id;
        };

        let options = Object::new();
        if let Some(icon) = self.icons.borrow().get(&marker.kind) {
            if let Err(e) = Reflect::set(&options, &JsValue::from_str("icon"), icon) {
                log::warn!("{:?} marker falls back to the default icon: {e:?}", marker.kind);
            }
        }

        let layer = new_marker(&lat_lng(marker.latitude, marker.longitude), &options)
            .add_to(map)
            .bind_popup(&marker.popup);
        if marker.open_popup {
            layer.open_popup();
        }
        self.markers.borrow_mut().insert(id, layer);
        id
    }

    fn remove_marker(&self, id: MarkerId) {
        let Some(layer) = self.markers.borrow_mut().remove(&id) else {
            return;
        };
        if let Some(map) = self.map.borrow().as_ref() {
            map.remove_layer(&layer);
        }
    }

    fn add_geojson(&self, data: &serde_json::Value, style: &LayerStyle) {
        let map = self.map.borrow();
        let Some(map) = map.as_ref() else {
            log::warn!("geojson layer dropped, map not mounted");
            return;
        };
        let layer = to_js(data).and_then(|data| {
            let options = to_js(&GeoJsonOptions::from(style))?;
            Ok(new_geo_json(&data, &options))
        });
        match layer {
            Ok(layer) => {
                layer.add_to(map);
            }
            Err(e) => log::warn!("could not render geojson layer: {e}"),
        }
    }
}
