/// Input fields the controller reads from or writes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Latitude,
    Longitude,
    FireDescription,
    FireCause,
    RoadReason,
    VehicleLatitude,
    VehicleLongitude,
    VehicleCapacity,
    VehicleType,
    AdminUsername,
    AdminPassword,
    DeleteUser,
    DeleteFire,
    DeleteRoad,
}

impl Field {
    pub const ALL: [Field; 14] = [
        Field::Latitude,
        Field::Longitude,
        Field::FireDescription,
        Field::FireCause,
        Field::RoadReason,
        Field::VehicleLatitude,
        Field::VehicleLongitude,
        Field::VehicleCapacity,
        Field::VehicleType,
        Field::AdminUsername,
        Field::AdminPassword,
        Field::DeleteUser,
        Field::DeleteFire,
        Field::DeleteRoad,
    ];

    pub fn element_id(&self) -> &'static str {
        match self {
            Field::Latitude => "latInput",
            Field::Longitude => "lngInput",
            Field::FireDescription => "fireDesc",
            Field::FireCause => "fireCause",
            Field::RoadReason => "roadReason",
            Field::VehicleLatitude => "vehicleLat",
            Field::VehicleLongitude => "vehicleLng",
            Field::VehicleCapacity => "vehicleCapacity",
            Field::VehicleType => "vehicleType",
            Field::AdminUsername => "adminUsername",
            Field::AdminPassword => "adminPassword",
            Field::DeleteUser => "deleteUserInput",
            Field::DeleteFire => "deleteFireInput",
            Field::DeleteRoad => "deleteRoadInput",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A finite number, or nothing. Partial input such as `"12abc"` is rejected.
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_coordinates(lat: &str, lng: &str) -> Option<Coordinates> {
    Some(Coordinates {
        latitude: parse_coordinate(lat)?,
        longitude: parse_coordinate(lng)?,
    })
}

/// Strictly positive whole number.
pub fn parse_capacity(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|c| *c > 0)
}

/// Map clicks are written back with five decimals.
pub fn format_coordinate(value: f64) -> String {
    format!("{value:.5}")
}

/// The field as typed, or `default` when it holds only whitespace.
pub fn text_or(raw: &str, default: &str) -> String {
    if raw.trim().is_empty() {
        default.to_string()
    } else {
        raw.to_string()
    }
}
