use core::fmt::{Display, Formatter};

// https://github.com/fbiego/CST816S
use bitflags::bitflags;
use embedded_hal_async::i2c::I2c;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{AsyncRegisterDevice, TouchSensorError};

pub const CST816S_ADDRESS: u8 = 0x15;

/// Number of bytes for a single touch event
pub const RAW_TOUCH_EVENT_LEN: usize = 6;

const REG_GESTURE_ID: u8 = 0x01;
const REG_MOTION_MASK: u8 = 0xEC;
pub const REG_CHIP_ID: u8 = 0xA7;
const REG_FIRMWARE_VERSION: u8 = 0xA9;
const REG_IRQ_CONTROL: u8 = 0xFA;
const REG_DISABLE_AUTO_SLEEP: u8 = 0xFE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    None = 0x00,
    SwipeUp = 0x01,
    SwipeDown = 0x02,
    SwipeLeft = 0x03,
    SwipeRight = 0x04,
    SingleClick = 0x05,
    DoubleClick = 0x0B,
    LongPress = 0x0C,
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipID {
    CST816S = 0xB4,
    CST816T = 0xB5,
    CST816D = 0xB6,
}

impl Display for ChipID {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ChipID::CST816S => write!(f, "CST816S"),
            ChipID::CST816T => write!(f, "CST816T"),
            ChipID::CST816D => write!(f, "CST816D"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchData {
    pub gesture: Gesture,
    pub points: u8,
    pub event: Event,
    pub x: u16,
    pub y: u16,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IrqControl: u8 {
        /// Bit 7: EnTest (Enable test, periodically sends low pulses)
        const EN_TEST   = 1 << 7;
        /// Bit 6: EnTouch (Sends low pulse on touch detection)
        const EN_TOUCH  = 1 << 6;
        /// Bit 5: EnChange (Sends low pulse on touch state change)
        const EN_CHANGE = 1 << 5;
        /// Bit 4: EnMotion (Sends low pulse on gesture detection)
        const EN_MOTION = 1 << 4;
        /// Bit 0: OnceWLP (Sends one low pulse on long press)
        const ONCE_WLP  = 1 << 0;
    }
}

impl Default for IrqControl {
    fn default() -> Self {
        IrqControl::EN_TOUCH | IrqControl::EN_CHANGE | IrqControl::EN_MOTION
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MotionMask: u8 {
        /// Enable double-click detection
        const DOUBLE_CLICK = 1 << 0;
        /// Enable continuous up/down swipe
        const CONTINUOUS_UPDOWN = 1 << 1;
        /// Enable continuous left/right swipe
        const CONTINUOUS_LEFTRIGHT = 1 << 2;
    }
}

impl Default for MotionMask {
    fn default() -> Self {
        MotionMask::DOUBLE_CLICK
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MotionMask {
    fn format(&self, f: defmt::Formatter) {
        self.iter_names().for_each(|name| {
            defmt::write!(f, "{}", name);
        });
    }
}

#[derive(Debug)]
pub struct CST816x<I2C> {
    dev: AsyncRegisterDevice<I2C>,
}

impl<I2C> CST816x<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            dev: AsyncRegisterDevice::new(i2c, address),
        }
    }

    /// Checks the chip identity and applies the default interrupt setup.
    pub async fn begin(&mut self) -> Result<ChipID, TouchSensorError> {
        let chip_id = self.get_chip_id().await?;
        self.set_irq_control(&IrqControl::default()).await?;
        self.set_motion_mask(&MotionMask::default()).await?;
        // Stay awake so polling keeps returning fresh samples
        self.disable_auto_sleep().await?;
        Ok(chip_id)
    }

    pub async fn get_chip_id(&mut self) -> Result<ChipID, TouchSensorError> {
        let id = self.dev.read_register(REG_CHIP_ID).await?;
        ChipID::try_from(id).map_err(|_| TouchSensorError::UnknownChip(id))
    }

    pub async fn get_version(&mut self) -> Result<u8, TouchSensorError> {
        Ok(self.dev.read_register(REG_FIRMWARE_VERSION).await?)
    }

    pub async fn disable_auto_sleep(&mut self) -> Result<(), TouchSensorError> {
        self.dev
            .write_register(&[REG_DISABLE_AUTO_SLEEP, 0x01])
            .await?;
        Ok(())
    }

    pub async fn set_irq_control(&mut self, control: &IrqControl) -> Result<(), TouchSensorError> {
        self.dev
            .write_register(&[REG_IRQ_CONTROL, control.bits()])
            .await?;
        Ok(())
    }

    pub async fn set_motion_mask(&mut self, mask: &MotionMask) -> Result<(), TouchSensorError> {
        self.dev
            .write_register(&[REG_MOTION_MASK, mask.bits()])
            .await?;
        Ok(())
    }

    pub async fn read_touch(&mut self) -> Result<TouchData, TouchSensorError> {
        let mut buffer = [0u8; RAW_TOUCH_EVENT_LEN];
        self.dev
            .read_register_buffer(REG_GESTURE_ID, &mut buffer)
            .await?;

        let gesture =
            Gesture::try_from(buffer[0]).map_err(|_| TouchSensorError::UnknownGesture(buffer[0]))?;
        let points = buffer[1] & 0x0F;
        let event = Event::try_from(buffer[2] >> 6).unwrap_or(Event::None);
        let x = (u16::from(buffer[2] & 0x0F) << 8) | u16::from(buffer[3]);
        let y = (u16::from(buffer[4] & 0x0F) << 8) | u16::from(buffer[5]);

        Ok(TouchData {
            gesture,
            points,
            event,
            x,
            y,
        })
    }

    pub fn release(self) -> I2C {
        self.dev.release()
    }
}
