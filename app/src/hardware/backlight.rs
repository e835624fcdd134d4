use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::peripherals::GPIO23;
use port::{Backlight, BacklightConfig};

pub type LcdBacklight = Backlight<Output<'static>>;

/// Configures the backlight output, switched off.
pub fn open(pin: GPIO23<'static>, config: &BacklightConfig) -> LcdBacklight {
    let pin = Output::new(pin, Level::Low, OutputConfig::default());
    match Backlight::new(pin, config.level) {
        Ok(backlight) => backlight,
        Err(never) => match never {},
    }
}
