//! Board bindings of the panel, touch and backlight ports
//!
//! - **Display**: ST7796 (or ST7789) via SPI2 with DMA
//! - **Touchpad**: FT5x06 (or CST816x) via I2C0
//! - **Backlight**: GPIO output with configurable active level

pub mod backlight;
pub mod display;
pub mod touch;

pub use display::{DisplayError, Panel};
pub use touch::Touchpad;
