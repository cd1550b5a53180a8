mod app;
pub use app::*;

pub mod input;
pub mod lifecycle;
pub mod welcome_screen;

mod window_resizing;
pub use window_resizing::viewport_width;
