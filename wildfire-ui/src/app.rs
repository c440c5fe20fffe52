use crate::bridge::{self, HttpBackend};
use crate::leaflet::LeafletSurface;
use crate::page::SignalPage;
use leptos::*;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use wildfire_core::form::Field;
use wildfire_core::panel::display;
use wildfire_core::{Action, Bindings, Panel, ViewController};

type Controller = ViewController<HttpBackend, LeafletSurface, SignalPage>;

const VEHICLE_TYPES: [&str; 4] = ["Fire Truck", "Water Tanker", "Evacuation Bus", "Ambulance"];

fn field_input(
    signal: RwSignal<String>,
    field: Field,
    placeholder: &'static str,
    kind: &'static str,
) -> impl IntoView {
    view! {
      <input
        id=field.element_id()
        type=kind
        class="form-control mb-2"
        placeholder=placeholder
        prop:value=move || signal.get()
        on:input=move |ev| signal.set(event_target_value(&ev))
      />
    }
}

fn action_button(
    bindings: &Bindings,
    action: Action,
    class: &'static str,
    dispatch: impl Fn(&'static str) + 'static,
) -> impl IntoView {
    let event = bindings.event_for(action).unwrap_or_default();
    view! {
      <button id=event class=class on:click=move |_| dispatch(event)>
        {action.label()}
      </button>
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = bridge::load_config();
    let map_id = config.map.element_id.clone();
    let bindings = Bindings::standard();
    let page = SignalPage::new();
    let panel = page.panel;
    let admin_actions = page.admin_actions;
    let form = page.form.clone();
    let backend = HttpBackend::new(config.api_base.clone());
    let view: Rc<Controller> = Rc::new(ViewController::new(
        config,
        backend,
        LeafletSurface::new(),
        page,
    ));
    view.start();
    let controller = store_value(Rc::clone(&view));

    // Leaflet needs the container in the document, so mount after the first
    // paint. Everything except the map keeps working if this fails.
    request_animation_frame(move || {
        let config = view.config();
        if let Err(e) = view.map().mount(&config.map, &config.icons) {
            log::error!("{e}");
            return;
        }

        let weak = Rc::downgrade(&view);
        view.map().on_click(move |lat, lng| {
            if let Some(view) = weak.upgrade() {
                view.map_clicked(lat, lng);
            }
        });

        spawn_local(async move {
            view.load_layers().await;
        });
    });

    let dispatch = move |event: &'static str| {
        let view = controller.get_value();
        spawn_local(async move {
            if let Err(e) = view.handle_event(event).await {
                log::debug!("{event}: {e}");
            }
        });
    };

    let show_emergency = bindings
        .event_for(Action::ShowPanel(Panel::Emergency))
        .unwrap_or_default();
    let show_admin = bindings
        .event_for(Action::ShowPanel(Panel::Admin))
        .unwrap_or_default();
    let input = |field: Field, placeholder: &'static str, kind: &'static str| {
        field_input(form.signal(field), field, placeholder, kind)
    };
    let vehicle_type = form.signal(Field::VehicleType);

    view! {
      <div class="app">
        <div id=map_id class="map"></div>
        <aside class="sidebar">
          <div class="btn-group w-100 mb-3">
            <button
              id=show_emergency
              class=move || panel.get().emergency_button.class_attr()
              on:click=move |_| dispatch(show_emergency)
            >
              {Action::ShowPanel(Panel::Emergency).label()}
            </button>
            <button
              id=show_admin
              class=move || panel.get().admin_button.class_attr()
              on:click=move |_| dispatch(show_admin)
            >
              {Action::ShowPanel(Panel::Admin).label()}
            </button>
          </div>

          <section id="emergencyPanel" style:display=move || display(panel.get().emergency_visible)>
            <h5>"Location"</h5>
            <p class="meta">"Click the map or type coordinates."</p>
            {input(Field::Latitude, "Latitude", "text")}
            {input(Field::Longitude, "Longitude", "text")}
            {action_button(&bindings, Action::SetUserLocation, "btn btn-primary w-100 mb-3", dispatch)}

            <h5>"Wildfire"</h5>
            {input(Field::FireDescription, "Description", "text")}
            {input(Field::FireCause, "Cause", "text")}
            {action_button(&bindings, Action::ReportWildfire, "btn btn-danger w-100 mb-3", dispatch)}

            <h5>"Road closure"</h5>
            {input(Field::RoadReason, "Reason", "text")}
            {action_button(&bindings, Action::ReportRoadClosure, "btn btn-warning w-100 mb-3", dispatch)}

            <h5>"Vehicle"</h5>
            {input(Field::VehicleLatitude, "Latitude", "text")}
            {input(Field::VehicleLongitude, "Longitude", "text")}
            {input(Field::VehicleCapacity, "Capacity", "number")}
            <select
              id=Field::VehicleType.element_id()
              class="form-select mb-2"
              prop:value=move || vehicle_type.get()
              on:change=move |ev| vehicle_type.set(event_target_value(&ev))
            >
              <option value="">"Vehicle type"</option>
              {VEHICLE_TYPES
                .iter()
                .map(|t| view! { <option value=*t>{*t}</option> })
                .collect_view()}
            </select>
            {action_button(&bindings, Action::RegisterVehicle, "btn btn-secondary w-100 mb-3", dispatch)}

            <div class="row">
              {action_button(&bindings, Action::ReloadMap, "btn btn-outline-light", dispatch)}
              {action_button(&bindings, Action::SignOut, "btn btn-outline-danger", dispatch)}
            </div>
          </section>

          <section id="adminPanel" style:display=move || display(panel.get().admin_visible)>
            <div id="loginSection" style:display=move || display(!admin_actions.get())>
              <h5>"Administrator"</h5>
              {input(Field::AdminUsername, "Username", "text")}
              {input(Field::AdminPassword, "Password", "password")}
              {action_button(&bindings, Action::AdminSignIn, "btn btn-success w-100", dispatch)}
            </div>

            <div id="adminActions" style:display=move || display(admin_actions.get())>
              <h5>"Manage"</h5>
              {input(Field::DeleteUser, "Username", "text")}
              {action_button(&bindings, Action::DeleteUser, "btn btn-outline-danger w-100 mb-3", dispatch)}
              {input(Field::DeleteFire, "Wildfire ID", "text")}
              {action_button(&bindings, Action::DeleteWildfire, "btn btn-outline-danger w-100 mb-3", dispatch)}
              {input(Field::DeleteRoad, "Road closure ID", "text")}
              {action_button(&bindings, Action::DeleteRoadClosure, "btn btn-outline-danger w-100 mb-3", dispatch)}
              {action_button(&bindings, Action::AdminSignOut, "btn btn-outline-light w-100", dispatch)}
            </div>
          </section>
        </aside>
      </div>
    }
}
