/// Provider endpoints
pub const OPEN_METEO_API: &str = "https://api.open-meteo.com";
pub const MET_NO_API: &str = "https://api.met.no";
pub const NOMINATIM_API: &str = "https://nominatim.openstreetmap.org";

// Open-Meteo
pub const FORECAST: &str = "/v1/forecast";
pub const OPEN_METEO_HOURLY: &str =
    "temperature_2m,weathercode,windspeed_10m,winddirection_10m,pressure_msl,precipitation";
pub const OPEN_METEO_DAILY: &str = "sunrise,sunset";

// MET Norway
pub const LOCATION_FORECAST: &str = "/weatherapi/locationforecast/2.0/compact";

// Nominatim
pub const SEARCH: &str = "/search";
