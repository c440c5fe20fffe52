use crate::api::Endpoint;
use std::fmt;
use thiserror::Error;

/// User-facing messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    PickLocation,
    FillVehicleData,
    WildfireReported,
    WildfireFailed,
    ClosureAdded,
    ClosureFailed,
    LocationSaved,
    LocationFailed,
    VehicleAdded,
    VehicleFailed,
    AdminLoggedIn,
    InvalidCredentials,
    AdminLoggedOut,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Notice::PickLocation => "Pick a valid location.",
            Notice::FillVehicleData => "Fill vehicle data.",
            Notice::WildfireReported => "Wildfire reported!",
            Notice::WildfireFailed => "Failed to add wildfire.",
            Notice::ClosureAdded => "Road closure added!",
            Notice::ClosureFailed => "Failed to add closure.",
            Notice::LocationSaved => "Location saved!",
            Notice::LocationFailed => "Failed to save location.",
            Notice::VehicleAdded => "Vehicle added!",
            Notice::VehicleFailed => "Failed to add vehicle.",
            Notice::AdminLoggedIn => "Admin logged in.",
            Notice::InvalidCredentials => "Invalid credentials.",
            Notice::AdminLoggedOut => "Admin logged out.",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ActionError {
    /// Input failed local validation; nothing was sent.
    #[error("invalid input: {0}")]
    Invalid(Notice),
    #[error("{endpoint} answered with status {status}")]
    Rejected { endpoint: Endpoint, status: u16 },
    #[error("{endpoint} unreachable: {message}")]
    Transport { endpoint: Endpoint, message: String },
    /// Background layer load failed; the layer stays empty.
    #[error("loading {endpoint} failed: {message}")]
    Load { endpoint: Endpoint, message: String },
    #[error("no handler registered for '{0}'")]
    UnknownEvent(String),
}
