// Register map per the FocalTech FT5x06 application note
use core::fmt::{Display, Formatter};

use embedded_hal_async::i2c::I2c;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{AsyncRegisterDevice, TouchSensorError};

pub const FT5X06_ADDRESS: u8 = 0x38;

/// Most points the controller tracks at once
pub const MAX_POINTS: u8 = 5;

const REG_DEVICE_MODE: u8 = 0x00;
const REG_TD_STATUS: u8 = 0x02;
const REG_P1_XH: u8 = 0x03;
const REG_TH_GROUP: u8 = 0x80;
const REG_TH_PEAK: u8 = 0x81;
const REG_TH_CAL: u8 = 0x82;
const REG_TH_WATER: u8 = 0x83;
const REG_TH_TEMP: u8 = 0x84;
const REG_TH_DIFF: u8 = 0x85;
const REG_TIME_ENTER_MONITOR: u8 = 0x87;
const REG_PERIOD_ACTIVE: u8 = 0x88;
const REG_PERIOD_MONITOR: u8 = 0x89;
const REG_FIRMWARE_ID: u8 = 0xA6;
const REG_MODE: u8 = 0xA4;
pub const REG_CHIP_ID: u8 = 0xA3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipId {
    FT6206 = 0x06,
    FT5x16 = 0x0A,
    FT6236 = 0x36,
    FT5x46 = 0x54,
    FT5x06 = 0x55,
    FT6336 = 0x64,
}

impl Display for ChipId {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ChipId::FT6206 => write!(f, "FT6206"),
            ChipId::FT5x16 => write!(f, "FT5x16"),
            ChipId::FT6236 => write!(f, "FT6236"),
            ChipId::FT5x46 => write!(f, "FT5x46"),
            ChipId::FT5x06 => write!(f, "FT5x06"),
            ChipId::FT6336 => write!(f, "FT6336"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    Down = 0,
    Up = 1,
    Contact = 2,
    None = 3,
}

/// Interrupt behaviour selected through `ID_G_MODE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptMode {
    /// INT stays low while touched
    Polling = 0x00,
    /// INT pulses on every new sample
    Trigger = 0x01,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchPoint {
    pub x: u16,
    pub y: u16,
    pub event: Event,
}

/// Detection thresholds written at init
const THRESHOLDS: [(u8, u8); 9] = [
    (REG_TH_GROUP, 70),
    (REG_TH_PEAK, 60),
    (REG_TH_CAL, 16),
    (REG_TH_WATER, 60),
    (REG_TH_TEMP, 10),
    (REG_TH_DIFF, 20),
    (REG_TIME_ENTER_MONITOR, 2),
    (REG_PERIOD_ACTIVE, 12),
    (REG_PERIOD_MONITOR, 40),
];

#[derive(Debug)]
pub struct Ft5x06<I2C> {
    dev: AsyncRegisterDevice<I2C>,
}

impl<I2C> Ft5x06<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            dev: AsyncRegisterDevice::new(i2c, address),
        }
    }

    /// Checks the chip identity and writes the detection thresholds.
    pub async fn begin(&mut self) -> Result<ChipId, TouchSensorError> {
        let chip_id = self.get_chip_id().await?;
        self.dev.write_register(&[REG_DEVICE_MODE, 0x00]).await?;
        for (register, value) in THRESHOLDS {
            self.dev.write_register(&[register, value]).await?;
        }
        self.set_interrupt_mode(InterruptMode::Polling).await?;
        Ok(chip_id)
    }

    pub async fn get_chip_id(&mut self) -> Result<ChipId, TouchSensorError> {
        let id = self.dev.read_register(REG_CHIP_ID).await?;
        ChipId::try_from(id).map_err(|_| TouchSensorError::UnknownChip(id))
    }

    pub async fn get_firmware_version(&mut self) -> Result<u8, TouchSensorError> {
        Ok(self.dev.read_register(REG_FIRMWARE_ID).await?)
    }

    pub async fn set_interrupt_mode(&mut self, mode: InterruptMode) -> Result<(), TouchSensorError> {
        self.dev.write_register(&[REG_MODE, mode.into()]).await?;
        Ok(())
    }

    /// Number of points currently touched.
    pub async fn touch_count(&mut self) -> Result<u8, TouchSensorError> {
        let status = self.dev.read_register(REG_TD_STATUS).await?;
        Ok(status & 0x0F)
    }

    /// First touch point, `None` when nothing touches the panel.
    pub async fn read_touch(&mut self) -> Result<Option<TouchPoint>, TouchSensorError> {
        let count = self.touch_count().await?;
        // Counts above the maximum show up while the controller boots
        if count == 0 || count > MAX_POINTS {
            return Ok(None);
        }

        let mut data = [0u8; 4];
        self.dev.read_register_buffer(REG_P1_XH, &mut data).await?;
        let event = Event::try_from(data[0] >> 6).unwrap_or(Event::None);
        let x = (u16::from(data[0] & 0x0F) << 8) | u16::from(data[1]);
        let y = (u16::from(data[2] & 0x0F) << 8) | u16::from(data[3]);
        if event == Event::Up {
            return Ok(None);
        }
        Ok(Some(TouchPoint { x, y, event }))
    }

    pub fn release(self) -> I2C {
        self.dev.release()
    }
}
