use crate::panel::Panel;
use std::collections::BTreeMap;

/// Every user-triggered operation of the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    ShowPanel(Panel),
    SetUserLocation,
    ReportWildfire,
    ReportRoadClosure,
    RegisterVehicle,
    ReloadMap,
    SignOut,
    AdminSignIn,
    AdminSignOut,
    DeleteUser,
    DeleteWildfire,
    DeleteRoadClosure,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::ShowPanel(Panel::Emergency) => "Emergency",
            Action::ShowPanel(Panel::Admin) => "Admin",
            Action::SetUserLocation => "Set my location",
            Action::ReportWildfire => "Report wildfire",
            Action::ReportRoadClosure => "Report road closure",
            Action::RegisterVehicle => "Add vehicle",
            Action::ReloadMap => "Reload map",
            Action::SignOut => "Log out",
            Action::AdminSignIn => "Log in",
            Action::AdminSignOut => "Log out admin",
            Action::DeleteUser => "Delete user",
            Action::DeleteWildfire => "Delete wildfire",
            Action::DeleteRoadClosure => "Delete road closure",
        }
    }
}

const STANDARD: [(&str, Action); 13] = [
    ("btnEmergency", Action::ShowPanel(Panel::Emergency)),
    ("btnAdmin", Action::ShowPanel(Panel::Admin)),
    ("setUser", Action::SetUserLocation),
    ("addFire", Action::ReportWildfire),
    ("addRoad", Action::ReportRoadClosure),
    ("addVehicle", Action::RegisterVehicle),
    ("reloadMap", Action::ReloadMap),
    ("logoutUserBtn", Action::SignOut),
    ("adminLoginBtn", Action::AdminSignIn),
    ("adminLogoutBtn", Action::AdminSignOut),
    ("delUserBtn", Action::DeleteUser),
    ("delFireBtn", Action::DeleteWildfire),
    ("delRoadBtn", Action::DeleteRoadClosure),
];

/// Event name to action table, built once at startup.
#[derive(Clone, Debug)]
pub struct Bindings {
    table: BTreeMap<&'static str, Action>,
}

impl Bindings {
    pub fn standard() -> Self {
        Self {
            table: STANDARD.into_iter().collect(),
        }
    }

    pub fn action(&self, event: &str) -> Option<Action> {
        self.table.get(event).copied()
    }

    /// Event name registered for `action`, used as the button element id.
    pub fn event_for(&self, action: Action) -> Option<&'static str> {
        self.table
            .iter()
            .find(|(_, a)| **a == action)
            .map(|(name, _)| *name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Action)> + '_ {
        self.table.iter().map(|(name, action)| (*name, *action))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for Bindings {
    fn default() -> Self {
        Self::standard()
    }
}
