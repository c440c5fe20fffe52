use std::fmt;
use std::future::Future;

/// Backend routes the controller talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    AddFire,
    ReportRoadClosure,
    SetUserLocation,
    AddVehicle,
    LogoutUser,
    AdminLogin,
    AdminLogout,
    AdminDeleteUser,
    AdminDeleteFire,
    AdminDeleteRoadClosure,
    Fires,
    RoadClosures,
    BaseGeography,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::AddFire => "/api/add_fire",
            Endpoint::ReportRoadClosure => "/api/report_road_closure",
            Endpoint::SetUserLocation => "/api/set_user_location",
            Endpoint::AddVehicle => "/api/add_vehicle",
            Endpoint::LogoutUser => "/api/logout_user",
            Endpoint::AdminLogin => "/api/admin_login",
            Endpoint::AdminLogout => "/api/admin_logout",
            Endpoint::AdminDeleteUser => "/api/admin_delete_user",
            Endpoint::AdminDeleteFire => "/api/admin_delete_fire",
            Endpoint::AdminDeleteRoadClosure => "/api/admin_delete_road_closure",
            Endpoint::Fires => "/api/get_fires",
            Endpoint::RoadClosures => "/api/get_road_closures",
            Endpoint::BaseGeography => "/api/jasper_roads",
        }
    }

    /// Absolute or origin-relative URL under `base`.
    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Completed HTTP exchange. Only the status is inspected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
}

impl Reply {
    pub fn new(status: u16) -> Self {
        Self { status }
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP transport seen by the controller.
///
/// `post` resolves to `Err` only when the request never completed; a non-2xx
/// status is still `Ok`. `get` resolves to the decoded JSON body and treats a
/// non-2xx status as an error.
pub trait Backend {
    fn post(
        &self,
        endpoint: Endpoint,
        body: serde_json::Value,
    ) -> impl Future<Output = Result<Reply, String>>;

    fn get(&self, endpoint: Endpoint) -> impl Future<Output = Result<serde_json::Value, String>>;
}
