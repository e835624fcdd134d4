use embedded_hal::digital::OutputPin;

/// Pin level that lights the backlight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BacklightLevel {
    #[default]
    ActiveHigh,
    ActiveLow,
}

pub struct Backlight<P> {
    pin: P,
    level: BacklightLevel,
    on: bool,
}

impl<P: OutputPin> Backlight<P> {
    /// Takes the pin and switches the backlight off.
    pub fn new(pin: P, level: BacklightLevel) -> Result<Self, P::Error> {
        let mut backlight = Self {
            pin,
            level,
            on: true,
        };
        backlight.off()?;
        Ok(backlight)
    }

    pub fn on(&mut self) -> Result<(), P::Error> {
        self.set(true)
    }

    pub fn off(&mut self) -> Result<(), P::Error> {
        self.set(false)
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    fn set(&mut self, on: bool) -> Result<(), P::Error> {
        let high = on == (self.level == BacklightLevel::ActiveHigh);
        if high {
            self.pin.set_high()?;
        } else {
            self.pin.set_low()?;
        }
        self.on = on;
        Ok(())
    }
}
