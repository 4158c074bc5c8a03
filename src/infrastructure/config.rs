use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub battery: BatterySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    pub data_file: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BatterySettings {
    /// Assumed pack size (kWh) when an insights request does not name one.
    pub default_capacity_kwh: f64,
}

/// Built-in defaults, overridden by `config/app.toml` (optional) and then by
/// `EV_LOG_*` environment variables (e.g. `EV_LOG_SERVER__PORT=9090`).
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("store.data_file", "charging_data.json")?
        .set_default("battery.default_capacity_kwh", 30.0)?
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(config::Environment::with_prefix("EV_LOG").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration_loads() {
        let config = load_app_config().unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store.data_file, PathBuf::from("charging_data.json"));
        assert!((config.battery.default_capacity_kwh - 30.0).abs() < 1e-9);
    }
}
