//! Register-file I2C target for driver tests

use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};
use embedded_hal_async::i2c::I2c;

pub struct FakeI2c {
    pub address: u8,
    pub registers: [u8; 256],
    /// Every write as (register, values)
    pub writes: Vec<(u8, Vec<u8>)>,
    pub fail: bool,
    pointer: u8,
}

impl FakeI2c {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            registers: [0; 256],
            writes: Vec::new(),
            fail: false,
            pointer: 0,
        }
    }

    pub fn set(&mut self, register: u8, values: &[u8]) {
        for (offset, value) in values.iter().enumerate() {
            self.registers[register as usize + offset] = *value;
        }
    }

    pub fn written(&self, register: u8) -> Option<u8> {
        self.writes
            .iter()
            .rev()
            .find(|(r, _)| *r == register)
            .and_then(|(_, values)| values.first().copied())
    }
}

impl ErrorType for FakeI2c {
    type Error = ErrorKind;
}

impl I2c for FakeI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail || address != self.address {
            return Err(ErrorKind::Other);
        }
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    let Some((register, values)) = bytes.split_first() else {
                        continue;
                    };
                    self.pointer = *register;
                    if !values.is_empty() {
                        self.set(*register, values);
                        self.writes.push((*register, values.to_vec()));
                    }
                }
                Operation::Read(buffer) => {
                    for byte in buffer.iter_mut() {
                        *byte = self.registers[self.pointer as usize];
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Panel bus recording commands and pixel bytes
#[derive(Debug, Default)]
pub struct FakeBus {
    pub commands: Vec<(u8, Vec<u8>)>,
    pub pixels: Vec<u8>,
    pub fail: bool,
}

impl crate::panel::DcsBus for FakeBus {
    type Error = ();

    fn send_command(&mut self, command: u8, params: &[u8]) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.commands.push((command, params.to_vec()));
        Ok(())
    }

    fn send_pixels(&mut self, bytes: &[u8]) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.pixels.extend_from_slice(bytes);
        Ok(())
    }
}

/// Delay that only adds up the requested time
#[derive(Debug, Default)]
pub struct FakeDelay {
    pub total_ns: u64,
}

impl embedded_hal_async::delay::DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

#[derive(Debug, Default)]
pub struct FakePin {
    pub levels: Vec<bool>,
}

impl embedded_hal::digital::ErrorType for FakePin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.push(true);
        Ok(())
    }
}
