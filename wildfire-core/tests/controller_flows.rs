use futures::executor::block_on;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use wildfire_core::api::{Backend, Endpoint, Reply};
use wildfire_core::config::LayerStyle;
use wildfire_core::form::Field;
use wildfire_core::map::{MapSurface, Marker, MarkerId, MarkerKind};
use wildfire_core::{ActionError, Notice, Page, Panel, PanelStyle, ViewConfig, ViewController};

#[derive(Default)]
struct FakeBackend {
    posts: RefCell<Vec<(Endpoint, serde_json::Value)>>,
    gets: RefCell<Vec<Endpoint>>,
    post_replies: RefCell<HashMap<Endpoint, Result<u16, String>>>,
    get_replies: HashMap<Endpoint, Result<serde_json::Value, String>>,
}

impl FakeBackend {
    fn answering(self, endpoint: Endpoint, reply: Result<u16, String>) -> Self {
        self.reply_with(endpoint, reply);
        self
    }

    fn reply_with(&self, endpoint: Endpoint, reply: Result<u16, String>) {
        self.post_replies.borrow_mut().insert(endpoint, reply);
    }

    fn serving(mut self, endpoint: Endpoint, body: Result<serde_json::Value, String>) -> Self {
        self.get_replies.insert(endpoint, body);
        self
    }
}

impl Backend for FakeBackend {
    async fn post(&self, endpoint: Endpoint, body: serde_json::Value) -> Result<Reply, String> {
        self.posts.borrow_mut().push((endpoint, body));
        self.post_replies
            .borrow()
            .get(&endpoint)
            .cloned()
            .unwrap_or(Ok(201))
            .map(Reply::new)
    }

    async fn get(&self, endpoint: Endpoint) -> Result<serde_json::Value, String> {
        self.gets.borrow_mut().push(endpoint);
        self.get_replies
            .get(&endpoint)
            .cloned()
            .unwrap_or_else(|| Ok(serde_json::json!([])))
    }
}

#[derive(Default)]
struct FakeMap {
    next: Cell<u64>,
    markers: RefCell<BTreeMap<MarkerId, Marker>>,
    layers: RefCell<Vec<(serde_json::Value, LayerStyle)>>,
}

impl FakeMap {
    fn of_kind(&self, kind: MarkerKind) -> Vec<Marker> {
        self.markers
            .borrow()
            .values()
            .filter(|m| m.kind == kind)
            .cloned()
            .collect()
    }
}

impl MapSurface for FakeMap {
    fn place_marker(&self, marker: &Marker) -> MarkerId {
        let id = MarkerId(self.next.get());
        self.next.set(id.0 + 1);
        self.markers.borrow_mut().insert(id, marker.clone());
        id
    }

    fn remove_marker(&self, id: MarkerId) {
        self.markers.borrow_mut().remove(&id);
    }

    fn add_geojson(&self, data: &serde_json::Value, style: &LayerStyle) {
        self.layers.borrow_mut().push((data.clone(), style.clone()));
    }
}

#[derive(Default)]
struct FakePage {
    fields: RefCell<HashMap<Field, String>>,
    notices: RefCell<Vec<Notice>>,
    navigations: RefCell<Vec<String>>,
    reloads: Cell<usize>,
    style: Cell<Option<PanelStyle>>,
    admin_actions: Cell<bool>,
}

impl FakePage {
    fn with(self, field: Field, value: &str) -> Self {
        self.fields.borrow_mut().insert(field, value.to_string());
        self
    }

    fn field(&self, field: Field) -> String {
        self.read_field(field)
    }
}

impl Page for FakePage {
    fn read_field(&self, field: Field) -> String {
        self.fields.borrow().get(&field).cloned().unwrap_or_default()
    }

    fn write_field(&self, field: Field, value: String) {
        self.fields.borrow_mut().insert(field, value);
    }

    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }

    fn navigate(&self, url: &str) {
        self.navigations.borrow_mut().push(url.to_string());
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }

    fn show_panel(&self, style: PanelStyle) {
        self.style.set(Some(style));
    }

    fn show_admin_actions(&self, visible: bool) {
        self.admin_actions.set(visible);
    }
}

type Controller = ViewController<FakeBackend, FakeMap, FakePage>;

fn controller(backend: FakeBackend, page: FakePage) -> Controller {
    let config = ViewConfig {
        current_user: "ranger".into(),
        ..ViewConfig::default()
    };
    ViewController::new(config, backend, FakeMap::default(), page)
}

fn located(lat: &str, lng: &str) -> FakePage {
    FakePage::default()
        .with(Field::Latitude, lat)
        .with(Field::Longitude, lng)
}

#[test]
fn start_shows_emergency_panel() {
    let c = controller(FakeBackend::default(), FakePage::default());
    c.start();
    assert_eq!(c.panel(), Panel::Emergency);
    assert_eq!(c.page().style.get(), Some(PanelStyle::for_panel(Panel::Emergency)));
}

#[test]
fn toggle_round_trip_restores_styling() {
    let c = controller(FakeBackend::default(), FakePage::default());
    c.start();
    let initial = c.page().style.get();

    c.toggle_panel(Panel::Admin);
    let admin = c.page().style.get().expect("styled");
    assert!(admin.admin_visible && !admin.emergency_visible);
    assert!(admin.admin_button.active && !admin.emergency_button.active);

    c.toggle_panel(Panel::Emergency);
    assert_eq!(c.page().style.get(), initial);
    assert!(c.backend_is_idle());
}

#[test]
fn map_click_fills_pending_coordinates() {
    let c = controller(FakeBackend::default(), FakePage::default());
    c.map_clicked(53.726_712_34, -127.647_6);
    assert_eq!(c.page().field(Field::Latitude), "53.72671");
    assert_eq!(c.page().field(Field::Longitude), "-127.64760");

    c.map_clicked(1.0, 2.0);
    assert_eq!(c.page().field(Field::Latitude), "1.00000");
    assert_eq!(c.page().field(Field::Longitude), "2.00000");
}

#[test]
fn invalid_coordinates_block_every_location_action() {
    for (lat, lng) in [("", ""), ("abc", "20"), ("10", "north"), ("NaN", "1")] {
        let c = controller(FakeBackend::default(), located(lat, lng));
        for result in [
            block_on(c.report_wildfire()),
            block_on(c.report_road_closure()),
            block_on(c.set_user_location()),
        ] {
            assert_eq!(result, Err(ActionError::Invalid(Notice::PickLocation)));
        }
        assert!(c.backend_is_idle(), "request sent for ({lat:?}, {lng:?})");
        assert_eq!(c.page().notices.borrow().len(), 3);
    }
}

#[test]
fn wildfire_report_sends_defaults_for_blank_text() {
    let c = controller(FakeBackend::default(), located("10", "20"));
    block_on(c.report_wildfire()).expect("reported");

    let posts = c.backend().posts.borrow();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, Endpoint::AddFire);
    assert_eq!(
        posts[0].1,
        serde_json::json!({
            "latitude": 10.0,
            "longitude": 20.0,
            "description": "Wildfire Alert",
            "reason": "Unknown"
        })
    );
    assert_eq!(*c.page().notices.borrow(), vec![Notice::WildfireReported]);
}

#[test]
fn wildfire_report_sends_text_as_typed() {
    let page = located("10", "20")
        .with(Field::FireDescription, " Brush fire ")
        .with(Field::FireCause, "Campfire");
    let c = controller(FakeBackend::default(), page);
    block_on(c.report_wildfire()).expect("reported");

    let posts = c.backend().posts.borrow();
    assert_eq!(posts[0].1["description"], " Brush fire ");
    assert_eq!(posts[0].1["reason"], "Campfire");
}

#[test]
fn rejected_wildfire_report_leaves_state_untouched() {
    let backend = FakeBackend::default().answering(Endpoint::AddFire, Ok(500));
    let c = controller(backend, located("10", "20"));

    let result = block_on(c.report_wildfire());

    assert_eq!(
        result,
        Err(ActionError::Rejected {
            endpoint: Endpoint::AddFire,
            status: 500
        })
    );
    assert_eq!(*c.page().notices.borrow(), vec![Notice::WildfireFailed]);
    assert!(c.map().markers.borrow().is_empty());
    assert_eq!(c.page().field(Field::Latitude), "10");
    assert_eq!(c.page().field(Field::Longitude), "20");
}

#[test]
fn unreachable_backend_is_reported_as_failure() {
    let backend = FakeBackend::default()
        .answering(Endpoint::ReportRoadClosure, Err("network down".into()));
    let page = located("1.5", "2.5").with(Field::RoadReason, "Washout");
    let c = controller(backend, page);

    let result = block_on(c.report_road_closure());

    assert!(matches!(result, Err(ActionError::Transport { .. })));
    assert_eq!(*c.page().notices.borrow(), vec![Notice::ClosureFailed]);
    let posts = c.backend().posts.borrow();
    assert_eq!(posts[0].1["reason"], "Washout");
}

#[test]
fn new_user_location_replaces_previous_marker() {
    let c = controller(FakeBackend::default(), located("10", "20"));
    block_on(c.set_user_location()).expect("first");
    let first = c.user_marker().expect("marker");

    c.map_clicked(11.0, 21.0);
    block_on(c.set_user_location()).expect("second");

    let users = c.map().of_kind(MarkerKind::UserLocation);
    assert_eq!(users.len(), 1);
    assert_eq!((users[0].latitude, users[0].longitude), (11.0, 21.0));
    assert!(users[0].open_popup);
    assert_ne!(c.user_marker(), Some(first));
    assert_eq!(
        *c.page().notices.borrow(),
        vec![Notice::LocationSaved, Notice::LocationSaved]
    );
}

#[test]
fn failed_location_update_keeps_marker() {
    let c = controller(FakeBackend::default(), located("10", "20"));
    block_on(c.set_user_location()).expect("saved");
    let before = c.user_marker();

    c.backend().reply_with(Endpoint::SetUserLocation, Ok(403));
    c.map_clicked(30.0, 40.0);
    assert!(block_on(c.set_user_location()).is_err());

    assert_eq!(c.user_marker(), before);
    let users = c.map().of_kind(MarkerKind::UserLocation);
    assert_eq!(users.len(), 1);
    assert_eq!((users[0].latitude, users[0].longitude), (10.0, 20.0));
    assert_eq!(
        *c.page().notices.borrow(),
        vec![Notice::LocationSaved, Notice::LocationFailed]
    );
}

#[test]
fn vehicle_registration_validates_every_field() {
    let full = || {
        FakePage::default()
            .with(Field::VehicleLatitude, "53.1")
            .with(Field::VehicleLongitude, "-122.2")
            .with(Field::VehicleCapacity, "6")
            .with(Field::VehicleType, "Water Tanker")
    };

    for page in [
        full().with(Field::VehicleCapacity, "0"),
        full().with(Field::VehicleCapacity, "lots"),
        full().with(Field::VehicleLatitude, ""),
        full().with(Field::VehicleType, "  "),
    ] {
        let c = controller(FakeBackend::default(), page);
        assert_eq!(
            block_on(c.register_vehicle()),
            Err(ActionError::Invalid(Notice::FillVehicleData))
        );
        assert!(c.backend_is_idle());
    }

    let c = controller(FakeBackend::default(), full());
    block_on(c.register_vehicle()).expect("registered");
    let posts = c.backend().posts.borrow();
    assert_eq!(posts[0].0, Endpoint::AddVehicle);
    assert_eq!(
        posts[0].1,
        serde_json::json!({
            "latitude": 53.1,
            "longitude": -122.2,
            "capacity": 6,
            "vehicle_type": "Water Tanker"
        })
    );
    assert_eq!(*c.page().notices.borrow(), vec![Notice::VehicleAdded]);
}

#[test]
fn sign_out_navigates_even_when_request_fails() {
    let backend = FakeBackend::default().answering(Endpoint::LogoutUser, Err("offline".into()));
    let c = controller(backend, FakePage::default());

    block_on(c.sign_out());

    assert_eq!(*c.page().navigations.borrow(), vec!["/logout".to_string()]);
    let posts = c.backend().posts.borrow();
    assert_eq!(posts[0].1, serde_json::json!({ "username": "ranger" }));
}

#[test]
fn panel_and_session_events_never_touch_the_map() {
    let c = controller(FakeBackend::default(), FakePage::default());

    for event in ["btnAdmin", "btnEmergency", "btnAdmin", "logoutUserBtn"] {
        block_on(c.handle_event(event)).expect(event);
    }

    assert_eq!(c.panel(), Panel::Admin);
    assert_eq!(c.page().style.get(), Some(PanelStyle::for_panel(Panel::Admin)));
    assert_eq!(*c.page().navigations.borrow(), vec!["/logout".to_string()]);
    assert!(c.map().markers.borrow().is_empty());
    assert!(c.map().layers.borrow().is_empty());
}

#[test]
fn admin_sign_in_reveals_actions_on_success_only() {
    let page = || {
        FakePage::default()
            .with(Field::AdminUsername, "chief")
            .with(Field::AdminPassword, "secret")
    };

    let ok = controller(FakeBackend::default().answering(Endpoint::AdminLogin, Ok(200)), page());
    block_on(ok.admin_sign_in()).expect("signed in");
    assert!(ok.page().admin_actions.get());
    assert_eq!(*ok.page().notices.borrow(), vec![Notice::AdminLoggedIn]);
    assert_eq!(
        ok.backend().posts.borrow()[0].1,
        serde_json::json!({ "username": "chief", "password": "secret" })
    );

    let denied = controller(FakeBackend::default().answering(Endpoint::AdminLogin, Ok(401)), page());
    assert!(block_on(denied.admin_sign_in()).is_err());
    assert!(!denied.page().admin_actions.get());
    assert_eq!(*denied.page().notices.borrow(), vec![Notice::InvalidCredentials]);
}

#[test]
fn admin_sign_out_reloads_regardless_of_reply() {
    let c = controller(
        FakeBackend::default().answering(Endpoint::AdminLogout, Ok(500)),
        FakePage::default(),
    );
    block_on(c.admin_sign_out());
    assert_eq!(c.page().reloads.get(), 1);
    assert_eq!(*c.page().notices.borrow(), vec![Notice::AdminLoggedOut]);
    assert_eq!(c.backend().posts.borrow()[0].1, serde_json::json!({}));
}

#[test]
fn deletes_post_identifiers_without_notices() {
    let page = FakePage::default()
        .with(Field::DeleteUser, "mallory")
        .with(Field::DeleteFire, "4")
        .with(Field::DeleteRoad, "9");
    let c = controller(FakeBackend::default(), page);

    block_on(c.delete_user()).expect("user");
    block_on(c.delete_wildfire()).expect("fire");
    block_on(c.delete_road_closure()).expect("road");

    let posts = c.backend().posts.borrow();
    assert_eq!(
        *posts,
        vec![
            (Endpoint::AdminDeleteUser, serde_json::json!({ "username": "mallory" })),
            (Endpoint::AdminDeleteFire, serde_json::json!({ "id": "4" })),
            (Endpoint::AdminDeleteRoadClosure, serde_json::json!({ "id": "9" })),
        ]
    );
    assert!(c.page().notices.borrow().is_empty());
}

#[test]
fn page_load_renders_one_marker_per_record() {
    let backend = FakeBackend::default()
        .serving(
            Endpoint::Fires,
            Ok(serde_json::json!([{
                "latitude": 53.9,
                "longitude": -122.7,
                "description": "Test",
                "reason": "Lightning"
            }])),
        )
        .serving(
            Endpoint::RoadClosures,
            Ok(serde_json::json!([
                {"id": 1, "latitude": 54.0, "longitude": -122.0, "reason": "Smoke"},
                {"id": 2, "latitude": 54.1, "longitude": -122.1, "reason": "Fire"}
            ])),
        )
        .serving(
            Endpoint::BaseGeography,
            Ok(serde_json::json!({"type": "FeatureCollection", "features": []})),
        );
    let c = controller(backend, FakePage::default());

    block_on(c.load_layers());

    let fires = c.map().of_kind(MarkerKind::Wildfire);
    assert_eq!(fires.len(), 1);
    assert_eq!((fires[0].latitude, fires[0].longitude), (53.9, -122.7));
    assert!(fires[0].popup.contains("Test"));
    assert!(fires[0].popup.contains("Lightning"));
    assert_eq!(c.map().of_kind(MarkerKind::RoadClosure).len(), 2);

    let layers = c.map().layers.borrow();
    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0].1, LayerStyle::default());
}

#[test]
fn failed_layer_load_leaves_only_that_layer_empty() {
    let backend = FakeBackend::default()
        .serving(Endpoint::Fires, Err("status 500".into()))
        .serving(
            Endpoint::RoadClosures,
            Ok(serde_json::json!([{"latitude": 1.0, "longitude": 2.0, "reason": "Ice"}])),
        )
        .serving(Endpoint::BaseGeography, Err("timeout".into()));
    let c = controller(backend, FakePage::default());

    assert!(matches!(
        block_on(c.load_wildfires()),
        Err(ActionError::Load { endpoint: Endpoint::Fires, .. })
    ));
    block_on(c.load_layers());

    assert!(c.map().of_kind(MarkerKind::Wildfire).is_empty());
    assert_eq!(c.map().of_kind(MarkerKind::RoadClosure).len(), 1);
    assert!(c.map().layers.borrow().is_empty());
    assert!(c.page().notices.borrow().is_empty());
}

#[test]
fn malformed_records_are_treated_as_load_failure() {
    let backend = FakeBackend::default()
        .serving(Endpoint::Fires, Ok(serde_json::json!({"error": "nope"})));
    let c = controller(backend, FakePage::default());
    assert!(block_on(c.load_wildfires()).is_err());
    assert!(c.map().markers.borrow().is_empty());
}

#[test]
fn null_text_columns_still_render_a_marker() {
    let backend = FakeBackend::default().serving(
        Endpoint::Fires,
        Ok(serde_json::json!([
            {"id": 1, "latitude": 53.9, "longitude": -122.7, "description": "Test", "reason": "Lightning"},
            {"id": 2, "latitude": 54.0, "longitude": -122.0, "description": null, "reason": "Unknown"}
        ])),
    );
    let c = controller(backend, FakePage::default());

    assert_eq!(block_on(c.load_wildfires()), Ok(2));
    assert_eq!(c.map().of_kind(MarkerKind::Wildfire).len(), 2);
}

#[test]
fn undecodable_record_is_skipped_alone() {
    let backend = FakeBackend::default().serving(
        Endpoint::RoadClosures,
        Ok(serde_json::json!([
            {"id": 1, "latitude": 54.0, "longitude": -122.0, "reason": "Smoke"},
            {"id": 2, "latitude": "north", "longitude": -122.1, "reason": "Fire"},
            {"id": 3, "latitude": 54.2, "longitude": -122.2, "reason": null}
        ])),
    );
    let c = controller(backend, FakePage::default());

    assert_eq!(block_on(c.load_road_closures()), Ok(2));
    let closures = c.map().of_kind(MarkerKind::RoadClosure);
    assert_eq!(closures.len(), 2);
    assert!(closures.iter().all(|m| m.latitude != 54.1));
}

#[test]
fn events_dispatch_through_registration_table() {
    let c = controller(FakeBackend::default(), located("10", "20"));

    block_on(c.handle_event("btnAdmin")).expect("toggle");
    assert_eq!(c.panel(), Panel::Admin);

    block_on(c.handle_event("addFire")).expect("fire");
    block_on(c.handle_event("addFire")).expect("fire again");
    assert_eq!(c.backend().posts.borrow().len(), 2);

    block_on(c.handle_event("reloadMap")).expect("reload");
    assert_eq!(c.page().reloads.get(), 1);

    assert_eq!(
        block_on(c.handle_event("launchRockets")),
        Err(ActionError::UnknownEvent("launchRockets".into()))
    );
    assert_eq!(c.backend().posts.borrow().len(), 2);
}

#[test]
fn every_registered_event_is_handled() {
    let c = controller(FakeBackend::default(), located("10", "20"));
    let names: Vec<_> = c.bindings().iter().map(|(name, _)| name).collect();
    for name in names {
        let result = block_on(c.handle_event(name));
        assert!(
            !matches!(result, Err(ActionError::UnknownEvent(_))),
            "{name} not handled"
        );
    }
}

trait Idle {
    fn backend_is_idle(&self) -> bool;
}

impl Idle for Controller {
    fn backend_is_idle(&self) -> bool {
        let backend = self.backend();
        backend.posts.borrow().is_empty() && backend.gets.borrow().is_empty()
    }
}
