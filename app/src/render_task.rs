use log::info;
use port::{RenderPort, Shutdown};
use slint::platform::software_renderer::Rgb565Pixel;

use crate::hardware::Panel;
use crate::AppUi;

pub type Renderer = RenderPort<Rgb565Pixel, Panel>;

/// Pushes the window's dirty areas to the panel every render period.
#[embassy_executor::task]
pub async fn render_task(mut render: Renderer, ui: &'static AppUi, stop: &'static Shutdown) {
    render.run(ui, stop).await;
    let stats = render.stats();
    info!(
        "render stats: {} strips, {} retries, {} dropped",
        stats.strips, stats.retries, stats.dropped
    );
}
