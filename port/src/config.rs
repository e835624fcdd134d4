use crate::backlight::BacklightLevel;
use crate::error::ConfigError;
use crate::geometry::PanelGeometry;
use crate::input::InputConfig;
use crate::render::{check_strip, RenderConfig};
use crate::rotation::PanelOrientation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelController {
    St7796,
    St7789,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchController {
    Ft5x06,
    Cst816x,
}

/// GPIO numbers of the panel's SPI bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiPins {
    pub sclk: u8,
    pub mosi: u8,
    pub miso: Option<u8>,
    pub dc: u8,
    pub rst: Option<u8>,
    pub cs: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    pub controller: PanelController,
    pub geometry: PanelGeometry,
    pub pins: SpiPins,
    pub clock_hz: u32,
    pub cmd_bits: u8,
    pub param_bits: u8,
    /// Scan flags that show the image upright at 0 degrees
    pub upright: PanelOrientation,
    pub max_transfer_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchConfig {
    pub controller: TouchController,
    pub sda: u8,
    pub scl: u8,
    pub int: Option<u8>,
    pub rst: Option<u8>,
    pub cs: Option<u8>,
    pub clock_hz: u32,
    /// 7-bit I2C address
    pub address: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BacklightConfig {
    pub pin: u8,
    pub level: BacklightLevel,
}

/// Everything the firmware needs to know about the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardConfig {
    pub panel: PanelConfig,
    pub touch: TouchConfig,
    pub backlight: BacklightConfig,
    pub render: RenderConfig,
    pub input: InputConfig,
    /// Accept a touch chip-select wired to the LCD chip-select
    pub shared_chip_select_confirmed: bool,
}

impl BoardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let panel = &self.panel;
        panel.geometry.validate()?;
        for bits in [panel.cmd_bits, panel.param_bits] {
            if bits != 8 {
                return Err(ConfigError::UnsupportedBusWidth(bits));
            }
        }
        if panel.clock_hz == 0 || self.touch.clock_hz == 0 {
            return Err(ConfigError::ZeroClock);
        }
        check_strip(&panel.geometry, &self.render, panel.max_transfer_bytes)?;
        if self.input.period.as_ticks() == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        let calibration = &self.input.calibration;
        if calibration.x_max == 0 || calibration.y_max == 0 {
            return Err(ConfigError::EmptyGeometry);
        }
        self.check_pins()
    }

    fn check_pins(&self) -> Result<(), ConfigError> {
        let panel = &self.panel.pins;
        let touch = &self.touch;

        let touch_cs = match touch.cs {
            Some(cs) if cs == panel.cs => {
                if !self.shared_chip_select_confirmed {
                    return Err(ConfigError::SharedChipSelect(cs));
                }
                log::warn!("touch and LCD share chip-select GPIO{cs}");
                None
            }
            cs => cs,
        };

        let assigned = [
            Some(panel.sclk),
            Some(panel.mosi),
            panel.miso,
            Some(panel.dc),
            panel.rst,
            Some(panel.cs),
            Some(touch.sda),
            Some(touch.scl),
            touch.int,
            touch.rst,
            touch_cs,
            Some(self.backlight.pin),
        ];
        let mut seen: heapless::Vec<u8, 12> = heapless::Vec::new();
        for pin in assigned.into_iter().flatten() {
            if seen.contains(&pin) {
                return Err(ConfigError::PinConflict(pin));
            }
            let _ = seen.push(pin);
        }
        Ok(())
    }
}
