//! Touch controller on I2C0

use drivers::cst816x::{self, CST816x};
use drivers::ft5x06::{self, Ft5x06};
use drivers::TouchSensorError;
use esp_hal::i2c::master::I2c;
use esp_hal::Async;
use log::info;
use port::{Contact, Error, ProtocolError, TouchConfig, TouchController, TouchTransport};

type Bus = I2c<'static, Async>;

/// The touch controller selected by the board configuration
pub enum Touchpad {
    Ft5x06(Ft5x06<Bus>),
    Cst816x(CST816x<Bus>),
}

/// Runs the controller handshake. An unknown chip identity aborts startup.
pub async fn open(i2c: Bus, config: &TouchConfig) -> Result<Touchpad, Error<TouchSensorError>> {
    match config.controller {
        TouchController::Ft5x06 => {
            let mut touch = Ft5x06::new(i2c, config.address);
            let chip = touch
                .begin()
                .await
                .map_err(|e| handshake_error(e, ft5x06::REG_CHIP_ID))?;
            let firmware = touch
                .get_firmware_version()
                .await
                .map_err(Error::Transport)?;
            info!("touch controller {chip}, firmware 0x{firmware:02X}");
            Ok(Touchpad::Ft5x06(touch))
        }
        TouchController::Cst816x => {
            let mut touch = CST816x::new(i2c, config.address);
            let chip = touch
                .begin()
                .await
                .map_err(|e| handshake_error(e, cst816x::REG_CHIP_ID))?;
            let version = touch.get_version().await.map_err(Error::Transport)?;
            info!("touch controller {chip}, firmware 0x{version:02X}");
            Ok(Touchpad::Cst816x(touch))
        }
    }
}

fn handshake_error(error: TouchSensorError, register: u8) -> Error<TouchSensorError> {
    match error {
        TouchSensorError::UnknownChip(value) => {
            Error::Protocol(ProtocolError::UnexpectedId { register, value })
        }
        e => Error::Transport(e),
    }
}

impl TouchTransport for Touchpad {
    type Error = TouchSensorError;

    async fn read_contact(&mut self) -> Result<Option<Contact>, TouchSensorError> {
        match self {
            Touchpad::Ft5x06(touch) => Ok(touch
                .read_touch()
                .await?
                .map(|point| Contact::new(point.x, point.y))),
            Touchpad::Cst816x(touch) => {
                let data = touch.read_touch().await?;
                if data.points == 0 || data.event == cst816x::Event::Up {
                    return Ok(None);
                }
                Ok(Some(Contact::new(data.x, data.y)))
            }
        }
    }
}
