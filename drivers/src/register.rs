use embedded_hal_async::i2c::I2c;

/// Register access on a 7-bit I2C device
#[derive(Debug)]
pub struct AsyncRegisterDevice<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> AsyncRegisterDevice<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub async fn read_register(&mut self, register: u8) -> Result<u8, I2C::Error> {
        let mut buffer = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut buffer)
            .await?;
        Ok(buffer[0])
    }

    /// Reads consecutive registers starting at `register`.
    pub async fn read_register_buffer(
        &mut self,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), I2C::Error> {
        self.i2c.write_read(self.address, &[register], buffer).await
    }

    /// Writes `buffer[1..]` starting at register `buffer[0]`.
    pub async fn write_register(&mut self, buffer: &[u8]) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, buffer).await
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}
