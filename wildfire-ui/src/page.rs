use leptos::*;
use std::collections::HashMap;
use std::rc::Rc;
use wildfire_core::form::Field;
use wildfire_core::{Notice, Page, PanelStyle};

/// One signal per input field.
#[derive(Clone)]
pub struct FormSignals {
    fields: Rc<HashMap<Field, RwSignal<String>>>,
}

impl FormSignals {
    pub fn new() -> Self {
        let fields = Field::ALL
            .into_iter()
            .map(|field| (field, create_rw_signal(String::new())))
            .collect();
        Self {
            fields: Rc::new(fields),
        }
    }

    pub fn signal(&self, field: Field) -> RwSignal<String> {
        self.fields
            .get(&field)
            .copied()
            .unwrap_or_else(|| create_rw_signal(String::new()))
    }
}

/// Browser side of [`Page`]: form and panel state live in Leptos signals,
/// notices and navigation go through `window`.
#[derive(Clone)]
pub struct SignalPage {
    pub form: FormSignals,
    pub panel: RwSignal<PanelStyle>,
    pub admin_actions: RwSignal<bool>,
}

impl SignalPage {
    pub fn new() -> Self {
        Self {
            form: FormSignals::new(),
            panel: create_rw_signal(PanelStyle::default()),
            admin_actions: create_rw_signal(false),
        }
    }
}

impl Page for SignalPage {
    fn read_field(&self, field: Field) -> String {
        self.form.signal(field).get_untracked()
    }

    fn write_field(&self, field: Field, value: String) {
        self.form.signal(field).set(value);
    }

    fn notify(&self, notice: Notice) {
        log::info!("notice: {notice}");
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(&notice.to_string());
        }
    }

    fn navigate(&self, url: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().set_href(url) {
            log::error!("navigation to {url} failed: {e:?}");
        }
    }

    fn reload(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().reload() {
            log::error!("reload failed: {e:?}");
        }
    }

    fn show_panel(&self, style: PanelStyle) {
        self.panel.set(style);
    }

    fn show_admin_actions(&self, visible: bool) {
        self.admin_actions.set(visible);
    }
}
