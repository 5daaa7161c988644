pub mod brands;
mod commands;
mod error;
pub mod matching;

pub use error::LensQuoteError;

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tauri::Builder::default()
        .plugin(tauri_plugin_store::Builder::new().build())
        .invoke_handler(tauri::generate_handler![
            commands::brands::list_brands,
            commands::brands::get_user_brands_dir,
            commands::brands::check_brand_file,
            commands::pricing::calculate_single_vision,
            commands::pricing::calculate_bifocal,
            commands::pricing::calculate_progressive,
            commands::config::get_preference,
            commands::config::set_preference,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
