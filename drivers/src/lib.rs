#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]
//! Touch and panel controller drivers
//!
//! Async register-level drivers for the FT5x06 and CST816x capacitive touch
//! controllers, and a MIPI-DCS panel driver for the ST7796 and ST7789 LCD
//! controllers.

use core::fmt::{Display, Formatter};

/// CST816x capacitive touch sensor driver.
pub mod cst816x;

/// FT5x06 capacitive touch sensor driver.
pub mod ft5x06;

/// MIPI-DCS panel controllers.
pub mod panel;

mod register;

#[cfg(test)]
mod fake;

pub use register::AsyncRegisterDevice;

/// Errors that can occur when talking to a touch controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchSensorError {
    I2CError,
    PinError,
    UnknownChip(u8),
    UnknownGesture(u8),
}

impl Display for TouchSensorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            TouchSensorError::I2CError => write!(f, "I2C transfer failed"),
            TouchSensorError::PinError => write!(f, "GPIO access failed"),
            TouchSensorError::UnknownChip(id) => write!(f, "unknown chip id 0x{id:02X}"),
            TouchSensorError::UnknownGesture(id) => write!(f, "unknown gesture 0x{id:02X}"),
        }
    }
}

impl<E> From<E> for TouchSensorError
where
    E: embedded_hal::i2c::Error,
{
    fn from(_: E) -> Self {
        TouchSensorError::I2CError
    }
}
