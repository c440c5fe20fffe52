//! Platform-free view controller for the wildfire response map.
//!
//! The controller owns the panel state, the user marker handle and the
//! request/response contract with the backend. Everything it touches in the
//! browser goes through [`api::Backend`], [`map::MapSurface`] and
//! [`controller::Page`], so the whole surface runs under `cargo test`.

pub mod api;
pub mod bindings;
pub mod config;
pub mod controller;
pub mod form;
pub mod map;
pub mod notice;
pub mod panel;
pub mod records;

pub use bindings::{Action, Bindings};
pub use config::ViewConfig;
pub use controller::{Page, ViewController};
pub use notice::{ActionError, Notice};
pub use panel::{Panel, PanelStyle};
