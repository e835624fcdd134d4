use alloc::rc::Rc;
use embassy_time::Instant;
use log::info;
use slint::{
    platform::{software_renderer::MinimalSoftwareWindow, Platform, WindowAdapter},
    PlatformError,
};

/// Slint platform over the embassy clock with one software-rendered window
pub struct Backend {
    window: Rc<MinimalSoftwareWindow>,
}

impl Backend {
    pub fn new(window: Rc<MinimalSoftwareWindow>) -> Self {
        Self { window }
    }
}

impl Platform for Backend {
    fn create_window_adapter(&self) -> Result<Rc<dyn WindowAdapter>, PlatformError> {
        info!("Creating window adapter");
        Ok(self.window.clone())
    }

    fn duration_since_start(&self) -> core::time::Duration {
        Instant::now().duration_since(Instant::from_secs(0)).into()
    }
}
