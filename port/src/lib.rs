#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]
//! Display and touch port layer
//!
//! Glue between an SPI panel, an I2C touch controller and a widget runtime:
//! the [`RenderPort`] pushes dirty regions of the scene to the panel, the
//! [`InputPort`] turns touch samples into pointer events, and both share the
//! rotation kept inside the lock-guarded [`Ui`] state.

extern crate alloc;

pub mod backlight;
pub mod canvas;
pub mod config;
pub mod error;
pub mod frame_buffer;
pub mod geometry;
pub mod input;
pub mod render;
pub mod rotation;
pub mod shutdown;
pub mod throttle;
pub mod transport;
pub mod ui;

#[cfg(test)]
mod mocks;

pub use backlight::{Backlight, BacklightLevel};
pub use canvas::{Canvas, DirtyRegions, Pixel};
pub use config::{
    BacklightConfig, BoardConfig, PanelConfig, PanelController, SpiPins, TouchConfig,
    TouchController,
};
pub use error::{ConfigError, Error, ProtocolError};
pub use frame_buffer::{BufferPool, Buffering, FrameBuffer};
pub use geometry::{Area, ByteOrder, ColorSpace, PanelGeometry, Size};
pub use input::{InputConfig, InputPort, TouchCalibration};
pub use render::{CycleOutcome, DisplaySurface, RenderConfig, RenderPort, RenderStats};
pub use rotation::{PanelOrientation, Rotation, RotationControl};
pub use shutdown::Shutdown;
pub use throttle::LogThrottle;
pub use transport::{Completion, Contact, PanelTransport, Rejected, TouchTransport};
pub use ui::{
    PointerEvent, PointerQueue, RotateHandler, Scene, Ui, UiEvent, UiEventHandler, UiLock,
    UiRuntime,
};
