mod commands;
mod db;
mod error;
mod models;
mod reorder;
mod rollup;
mod store;
#[cfg(test)]
mod test_utils;
mod week_copy;

use db::AppState;
use std::sync::Arc;
use tauri::Manager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  // Logging is configured through RUST_LOG
  env_logger::Builder::from_default_env()
    .filter_level(log::LevelFilter::Info)
    .init();

  tauri::Builder::default()
    .plugin(tauri_plugin_opener::init())
    .setup(|app| {
      // Initialize database
      let app_handle = app.handle().clone();
      tauri::async_runtime::block_on(async move {
        match db::initialize_db(&app_handle).await {
          Ok(pool) => {
            let state = Arc::new(AppState { db: pool });
            app_handle.manage(state);
            log::info!("Database ready");
          }
          Err(e) => {
            log::error!("Failed to initialize database: {}", e);
          }
        }
      });
      Ok(())
    })
    .invoke_handler(tauri::generate_handler![
      // Workout + calendar commands
      commands::workouts::get_workouts,
      commands::workouts::get_week_workouts,
      commands::workouts::create_workout,
      commands::workouts::update_workout,
      commands::workouts::delete_workout,
      commands::workouts::reorder_workout,
      commands::workouts::copy_week,
      // Label commands
      commands::labels::get_labels,
      commands::labels::create_label,
      commands::labels::update_label,
      commands::labels::delete_label,
      // Stats commands
      commands::stats::get_weekly_rollup,
    ])
    .run(tauri::generate_context!())
    .expect("error while running tauri application");
}
