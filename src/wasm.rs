use wasm_bindgen::prelude::*;

use crate::config::AppConfig;
use crate::dom::App;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let stored = AppConfig::load_from_local_storage();
    let needs_store = stored.is_none();
    let config = stored.unwrap_or_default();
    console_log::init_with_level(config.log_level.to_level()).ok();
    log::info!("🚀 imgproc page starting (service at {})", config.base_url);

    // Nothing usable stored; persist the defaults as an editable starting point
    if needs_store {
        if let Err(e) = config.save_to_local_storage() {
            log::warn!("Failed to store default configuration: {}", e);
        }
    }

    if let Err(e) = App::mount(config) {
        log::error!("Failed to bind the processing page: {:?}", e);
    }
}
