pub mod attachments;
pub mod checklist;
pub mod commands;
pub mod config;
pub mod core_state;
pub mod models;
pub mod prefs;
pub mod report;
pub mod session;

#[cfg(test)]
pub mod template_fixture;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Kensa starting v{}", config::APP_VERSION);

    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_dialog::init())
        .manage(Arc::new(core_state::CoreState::new()))
        .invoke_handler(tauri::generate_handler![
            commands::health_check,
            commands::checklist::load_checklist,
            commands::checklist::get_checklist,
            commands::session::record_result,
            commands::session::set_header,
            commands::session::get_summary,
            commands::session::get_review_data,
            commands::attachments::attach_photo,
            commands::report::export_report,
            commands::prefs::get_recipient_preference,
            commands::prefs::set_recipient_preference,
        ])
        .run(tauri::generate_context!())
        .expect("error while running Kensa");
}
