use std::{net::SocketAddr, path::PathBuf};

use thiserror::Error;

use crate::{
    services::{
        map_view::coordinate_converter::CoordinateSystem,
        place_search::place_search_service::PlaceSearchServiceConfig,
        tracking::permission_gate::LocationPermission,
    },
    utils::sms_client::SmsClientConfig,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub auth_key: Option<String>,
    pub application_id: String,
    pub granted_permissions: Vec<LocationPermission>,
    pub sms: SmsClientConfig,
    pub place_search: PlaceSearchServiceConfig,
    pub coordinate_system: CoordinateSystem,
    pub saved_place_path: PathBuf,
}

/// Loads `.env` if present, then reads the process environment.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(|key| std::env::var(key))
}

fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let bind_addr = or_default("BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("BIND_ADDR", e.to_string()))?;

    let granted_permissions = or_default("TRACKER_GRANTED_PERMISSIONS", "fine,coarse")
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            LocationPermission::parse(s).ok_or_else(|| {
                invalid(
                    "TRACKER_GRANTED_PERMISSIONS",
                    format!("unknown permission {s:?}"),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let display = or_default("PLACE_SEARCH_DISPLAY", "5")
        .parse::<u32>()
        .map_err(|e| invalid("PLACE_SEARCH_DISPLAY", e.to_string()))?;

    let coordinate_system = {
        let raw = or_default("PLACE_COORD_SYSTEM", "tm128");
        CoordinateSystem::parse(&raw)
            .ok_or_else(|| invalid("PLACE_COORD_SYSTEM", format!("unknown system {raw:?}")))?
    };

    Ok(AppConfig {
        bind_addr,
        auth_key: lookup("AUTH_KEY").ok().filter(|k| !k.is_empty()),
        application_id: or_default("APPLICATION_ID", "kids-position"),
        granted_permissions,
        sms: SmsClientConfig {
            host: require("SMS_HOST")?,
            api_key: require("SMS_API_KEY")?,
            from: or_default("SMS_FROM", ""),
            to: require("SMS_TO")?,
            message: or_default("SMS_MESSAGE", "device contacted"),
        },
        place_search: PlaceSearchServiceConfig {
            host: or_default("NAVER_SEARCH_HOST", "https://openapi.naver.com"),
            client_id: require("NAVER_CLIENT_ID")?,
            client_secret: require("NAVER_CLIENT_SECRET")?,
            display,
        },
        coordinate_system,
        saved_place_path: PathBuf::from(or_default("SAVED_PLACE_PATH", "./saved_place.json")),
    })
}
