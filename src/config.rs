use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Kensa";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default log filter when RUST_LOG is not set
pub fn default_log_filter() -> String {
    "kensa_lib=info".to_string()
}

/// Get the application data directory
/// ~/Kensa/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Kensa")
}

/// Get the photo evidence directory
pub fn photos_dir() -> PathBuf {
    app_data_dir().join("photos")
}

/// Get the directory exported report workbooks are written to
pub fn exports_dir() -> PathBuf {
    app_data_dir().join("exports")
}

/// Get the path of the recipient preference slot
pub fn prefs_path() -> PathBuf {
    app_data_dir().join("app_config.json")
}
