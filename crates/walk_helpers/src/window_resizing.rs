use bevy::window::Window;

#[cfg(target_arch = "wasm32")]
pub fn handle_browser_resize(
    mut primary_query: bevy::ecs::system::Query<
        &mut bevy::window::Window,
        bevy::ecs::query::With<bevy::window::PrimaryWindow>,
    >,
) {
    let Some((target_width, target_height)) = browser_inner_size() else {
        return;
    };

    // wgpu refuses surfaces larger than the max texture extent on some mobile GPUs
    const MAX_WIDTH: f32 = 2048.0;
    const MAX_HEIGHT: f32 = 2048.0;

    for mut window in &mut primary_query {
        if (window.resolution.width() - target_width).abs() > f32::EPSILON
            || (window.resolution.height() - target_height).abs() > f32::EPSILON
        {
            let width = target_width.min(MAX_WIDTH);
            let height = target_height.min(MAX_HEIGHT);
            window.resolution.set(width, height);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn browser_inner_size() -> Option<(f32, f32)> {
    let wasm_window = web_sys::window()?;
    let width = wasm_window.inner_width().ok()?.as_f64()?;
    let height = wasm_window.inner_height().ok()?.as_f64()?;
    Some((width as f32, height as f32))
}

/// Width used to classify the viewport as mobile or desktop.
///
/// In the browser this is the page width rather than the canvas, which is clamped.
pub fn viewport_width(window: &Window) -> f32 {
    #[cfg(target_arch = "wasm32")]
    if let Some((width, _)) = browser_inner_size() {
        return width;
    }

    window.width()
}
