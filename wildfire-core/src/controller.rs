use crate::api::{Backend, Endpoint, Reply};
use crate::bindings::{Action, Bindings};
use crate::config::ViewConfig;
use crate::form::{self, Coordinates, Field};
use crate::map::{MapSurface, Marker, MarkerId};
use crate::notice::{ActionError, Notice};
use crate::panel::{Panel, PanelStyle};
use crate::records::{FireRecord, RoadClosureRecord};
use std::cell::Cell;

/// Page chrome the controller drives: form fields, notices, navigation and
/// panel visibility.
pub trait Page {
    fn read_field(&self, field: Field) -> String;
    fn write_field(&self, field: Field, value: String);
    fn notify(&self, notice: Notice);
    fn navigate(&self, url: &str);
    fn reload(&self);
    fn show_panel(&self, style: PanelStyle);
    /// `true` hides the admin login form and reveals the admin actions.
    fn show_admin_actions(&self, visible: bool);
}

pub struct ViewController<B, M, P> {
    config: ViewConfig,
    bindings: Bindings,
    backend: B,
    map: M,
    page: P,
    panel: Cell<Panel>,
    user_marker: Cell<Option<MarkerId>>,
}

impl<B, M, P> ViewController<B, M, P>
where
    B: Backend,
    M: MapSurface,
    P: Page,
{
    pub fn new(config: ViewConfig, backend: B, map: M, page: P) -> Self {
        Self {
            config,
            bindings: Bindings::standard(),
            backend,
            map,
            page,
            panel: Cell::new(Panel::default()),
            user_marker: Cell::new(None),
        }
    }

    /// Applies the initial panel to the page.
    pub fn start(&self) {
        self.page.show_panel(PanelStyle::for_panel(self.panel.get()));
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn panel(&self) -> Panel {
        self.panel.get()
    }

    pub fn user_marker(&self) -> Option<MarkerId> {
        self.user_marker.get()
    }

    pub fn toggle_panel(&self, panel: Panel) {
        self.panel.set(panel);
        self.page.show_panel(PanelStyle::for_panel(panel));
    }

    pub fn map_clicked(&self, latitude: f64, longitude: f64) {
        if !latitude.is_finite() || !longitude.is_finite() {
            log::warn!("ignoring map click at non-finite position");
            return;
        }
        self.page
            .write_field(Field::Latitude, form::format_coordinate(latitude));
        self.page
            .write_field(Field::Longitude, form::format_coordinate(longitude));
    }

    /// Runs the action registered under `event`.
    pub async fn handle_event(&self, event: &str) -> Result<(), ActionError> {
        let Some(action) = self.bindings.action(event) else {
            log::warn!("unhandled event '{event}'");
            return Err(ActionError::UnknownEvent(event.to_string()));
        };
        self.dispatch(action).await
    }

    pub async fn dispatch(&self, action: Action) -> Result<(), ActionError> {
        log::debug!("dispatching {action:?}");
        match action {
            Action::ShowPanel(panel) => {
                self.toggle_panel(panel);
                Ok(())
            }
            Action::SetUserLocation => self.set_user_location().await,
            Action::ReportWildfire => self.report_wildfire().await,
            Action::ReportRoadClosure => self.report_road_closure().await,
            Action::RegisterVehicle => self.register_vehicle().await,
            Action::ReloadMap => {
                self.page.reload();
                Ok(())
            }
            Action::SignOut => {
                self.sign_out().await;
                Ok(())
            }
            Action::AdminSignIn => self.admin_sign_in().await,
            Action::AdminSignOut => {
                self.admin_sign_out().await;
                Ok(())
            }
            Action::DeleteUser => self.delete_user().await,
            Action::DeleteWildfire => self.delete_wildfire().await,
            Action::DeleteRoadClosure => self.delete_road_closure().await,
        }
    }

    pub async fn report_wildfire(&self) -> Result<(), ActionError> {
        let at = self.pending_location()?;
        let description = form::text_or(
            &self.page.read_field(Field::FireDescription),
            "Wildfire Alert",
        );
        let reason = form::text_or(&self.page.read_field(Field::FireCause), "Unknown");
        self.submit(
            Endpoint::AddFire,
            serde_json::json!({
                "latitude": at.latitude,
                "longitude": at.longitude,
                "description": description,
                "reason": reason
            }),
            Notice::WildfireReported,
            Notice::WildfireFailed,
        )
        .await
    }

    pub async fn report_road_closure(&self) -> Result<(), ActionError> {
        let at = self.pending_location()?;
        let reason = form::text_or(&self.page.read_field(Field::RoadReason), "Unknown");
        self.submit(
            Endpoint::ReportRoadClosure,
            serde_json::json!({
                "latitude": at.latitude,
                "longitude": at.longitude,
                "reason": reason
            }),
            Notice::ClosureAdded,
            Notice::ClosureFailed,
        )
        .await
    }

    /// Saves the pending location and, once the backend accepts it, moves the
    /// user marker there.
    pub async fn set_user_location(&self) -> Result<(), ActionError> {
        let at = self.pending_location()?;
        self.submit(
            Endpoint::SetUserLocation,
            serde_json::json!({
                "latitude": at.latitude,
                "longitude": at.longitude
            }),
            Notice::LocationSaved,
            Notice::LocationFailed,
        )
        .await?;
        self.replace_user_marker(at);
        Ok(())
    }

    pub async fn register_vehicle(&self) -> Result<(), ActionError> {
        let read = |field| self.page.read_field(field);
        let location = form::parse_coordinates(
            &read(Field::VehicleLatitude),
            &read(Field::VehicleLongitude),
        );
        let capacity = form::parse_capacity(&read(Field::VehicleCapacity));
        let vehicle_type = read(Field::VehicleType).trim().to_string();

        let (Some(at), Some(capacity)) = (location, capacity) else {
            return self.reject(Notice::FillVehicleData);
        };
        if vehicle_type.is_empty() {
            return self.reject(Notice::FillVehicleData);
        }

        self.submit(
            Endpoint::AddVehicle,
            serde_json::json!({
                "latitude": at.latitude,
                "longitude": at.longitude,
                "capacity": capacity,
                "vehicle_type": vehicle_type
            }),
            Notice::VehicleAdded,
            Notice::VehicleFailed,
        )
        .await
    }

    /// Tells the backend the user left, then navigates away whatever the
    /// outcome.
    pub async fn sign_out(&self) {
        let body = serde_json::json!({ "username": self.config.current_user });
        match self.backend.post(Endpoint::LogoutUser, body).await {
            Ok(reply) if reply.is_ok() => log::info!("user logout acknowledged"),
            Ok(reply) => log::warn!("user logout answered with status {}", reply.status),
            Err(e) => log::warn!("user logout failed: {e}"),
        }
        self.page.navigate(&self.config.logout_url);
    }

    pub async fn admin_sign_in(&self) -> Result<(), ActionError> {
        let body = serde_json::json!({
            "username": self.page.read_field(Field::AdminUsername),
            "password": self.page.read_field(Field::AdminPassword)
        });
        let outcome = self.send(Endpoint::AdminLogin, body).await;
        match outcome {
            Ok(_) => {
                self.page.notify(Notice::AdminLoggedIn);
                self.page.show_admin_actions(true);
            }
            Err(_) => self.page.notify(Notice::InvalidCredentials),
        }
        outcome.map(|_| ())
    }

    pub async fn admin_sign_out(&self) {
        if let Err(e) = self.send(Endpoint::AdminLogout, serde_json::json!({})).await {
            log::warn!("{e}");
        }
        self.page.notify(Notice::AdminLoggedOut);
        self.page.reload();
    }

    pub async fn delete_user(&self) -> Result<(), ActionError> {
        let username = self.page.read_field(Field::DeleteUser);
        self.send(
            Endpoint::AdminDeleteUser,
            serde_json::json!({ "username": username }),
        )
        .await
        .map(|_| ())
    }

    pub async fn delete_wildfire(&self) -> Result<(), ActionError> {
        let id = self.page.read_field(Field::DeleteFire);
        self.send(Endpoint::AdminDeleteFire, serde_json::json!({ "id": id }))
            .await
            .map(|_| ())
    }

    pub async fn delete_road_closure(&self) -> Result<(), ActionError> {
        let id = self.page.read_field(Field::DeleteRoad);
        self.send(
            Endpoint::AdminDeleteRoadClosure,
            serde_json::json!({ "id": id }),
        )
        .await
        .map(|_| ())
    }

    /// Fetches all three map layers concurrently. Failures are logged and
    /// leave the affected layer empty.
    pub async fn load_layers(&self) {
        let (fires, closures, geography) = futures::join!(
            self.load_wildfires(),
            self.load_road_closures(),
            self.load_geography()
        );
        for result in [fires.map(|_| ()), closures.map(|_| ()), geography] {
            if let Err(e) = result {
                log::warn!("{e}");
            }
        }
    }

    pub async fn load_wildfires(&self) -> Result<usize, ActionError> {
        let fires: Vec<FireRecord> = self.fetch_records(Endpoint::Fires).await?;
        for fire in &fires {
            self.map.place_marker(&Marker::wildfire(fire));
        }
        log::info!("rendered {} wildfires", fires.len());
        Ok(fires.len())
    }

    pub async fn load_road_closures(&self) -> Result<usize, ActionError> {
        let closures: Vec<RoadClosureRecord> =
            self.fetch_records(Endpoint::RoadClosures).await?;
        for closure in &closures {
            self.map.place_marker(&Marker::road_closure(closure));
        }
        log::info!("rendered {} road closures", closures.len());
        Ok(closures.len())
    }

    pub async fn load_geography(&self) -> Result<(), ActionError> {
        let endpoint = Endpoint::BaseGeography;
        let data = self
            .backend
            .get(endpoint)
            .await
            .map_err(|message| ActionError::Load { endpoint, message })?;
        self.map.add_geojson(&data, &self.config.map.geography_style);
        Ok(())
    }

    fn pending_location(&self) -> Result<Coordinates, ActionError> {
        let lat = self.page.read_field(Field::Latitude);
        let lng = self.page.read_field(Field::Longitude);
        match form::parse_coordinates(&lat, &lng) {
            Some(at) => Ok(at),
            None => self.reject(Notice::PickLocation),
        }
    }

    fn reject<T>(&self, notice: Notice) -> Result<T, ActionError> {
        self.page.notify(notice);
        Err(ActionError::Invalid(notice))
    }

    fn replace_user_marker(&self, at: Coordinates) {
        if let Some(previous) = self.user_marker.take() {
            self.map.remove_marker(previous);
        }
        let id = self
            .map
            .place_marker(&Marker::user(at.latitude, at.longitude));
        self.user_marker.set(Some(id));
    }

    /// GETs a record list. A body that is not an array fails the whole
    /// layer; records that do not decode are skipped one by one.
    async fn fetch_records<T>(&self, endpoint: Endpoint) -> Result<Vec<T>, ActionError>
    where
        T: serde::de::DeserializeOwned,
    {
        let load_err = |message: String| ActionError::Load { endpoint, message };
        let value = self.backend.get(endpoint).await.map_err(load_err)?;
        let rows: Vec<serde_json::Value> =
            serde_json::from_value(value).map_err(|e| load_err(e.to_string()))?;

        let mut records = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            match serde_json::from_value(row) {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("{endpoint}: skipping record {index}: {e}"),
            }
        }
        Ok(records)
    }

    /// One POST; `Ok` only for a 2xx reply.
    async fn send(
        &self,
        endpoint: Endpoint,
        body: serde_json::Value,
    ) -> Result<Reply, ActionError> {
        match self.backend.post(endpoint, body).await {
            Ok(reply) if reply.is_ok() => {
                log::info!("{endpoint} accepted ({})", reply.status);
                Ok(reply)
            }
            Ok(reply) => {
                log::warn!("{endpoint} rejected ({})", reply.status);
                Err(ActionError::Rejected {
                    endpoint,
                    status: reply.status,
                })
            }
            Err(message) => {
                log::warn!("{endpoint} failed: {message}");
                Err(ActionError::Transport { endpoint, message })
            }
        }
    }

    async fn submit(
        &self,
        endpoint: Endpoint,
        body: serde_json::Value,
        success: Notice,
        failure: Notice,
    ) -> Result<(), ActionError> {
        match self.send(endpoint, body).await {
            Ok(_) => {
                self.page.notify(success);
                Ok(())
            }
            Err(e) => {
                self.page.notify(failure);
                Err(e)
            }
        }
    }
}
