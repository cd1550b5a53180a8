#[cfg(target_arch = "wasm32")]
mod main_wasm;

#[cfg(target_arch = "wasm32")]
fn main() -> Result<(), wasm_bindgen::prelude::JsValue> {
    main_wasm::main_wasm()
}

/// Runs the gallery in a desktop window. An optional first argument points at
/// a JSON file overriding the default layout and timing.
#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), gallery_walk::ConfigError> {
    let config = match std::env::args().nth(1) {
        Some(path) => gallery_walk::GalleryConfig::from_path(path)?,
        None => gallery_walk::GalleryConfig::default(),
    };
    gallery_walk::run_with(config);
    Ok(())
}
