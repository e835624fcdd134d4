//! MIPI-DCS panel controllers on a command/parameter bus
//!
//! [`DcsPanel`] drives any of the supported [`Controller`]s: reset, the init
//! sequence, orientation through `MADCTL` and windowed pixel writes. The bus
//! is abstracted by [`DcsBus`]; [`DcsInterface`] adapts a `mipidsi`
//! interface such as `SpiInterface`.

use core::fmt::Debug;

use bitflags::bitflags;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use mipidsi::interface::Interface;

pub mod st7789;
pub mod st7796;

pub const SWRESET: u8 = 0x01;
pub const SLPOUT: u8 = 0x11;
pub const INVON: u8 = 0x21;
pub const DISPON: u8 = 0x29;
pub const CASET: u8 = 0x2A;
pub const RASET: u8 = 0x2B;
pub const RAMWR: u8 = 0x2C;
pub const MADCTL: u8 = 0x36;
pub const COLMOD: u8 = 0x3A;

/// `COLMOD` value for 16 bit RGB565 on both interfaces
const PIXEL_FORMAT_RGB565: u8 = 0x55;

/// Byte-oriented command bus of a display controller
pub trait DcsBus {
    type Error: Debug;

    fn send_command(&mut self, command: u8, params: &[u8]) -> Result<(), Self::Error>;

    /// Sends raw pixel bytes, already in controller byte order.
    fn send_pixels(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// [`DcsBus`] over a `mipidsi` interface with byte words
pub struct DcsInterface<DI>(DI);

impl<DI> DcsInterface<DI> {
    pub fn new(interface: DI) -> Self {
        Self(interface)
    }

    pub fn release(self) -> DI {
        self.0
    }
}

impl<DI> DcsBus for DcsInterface<DI>
where
    DI: Interface<Word = u8>,
    DI::Error: Debug,
{
    type Error = DI::Error;

    fn send_command(&mut self, command: u8, params: &[u8]) -> Result<(), Self::Error> {
        self.0.send_command(command, params)
    }

    fn send_pixels(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.0
            .send_pixels(bytes.chunks_exact(2).map(|pair| [pair[0], pair[1]]))
    }
}

bitflags! {
    /// Memory access control register
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Madctl: u8 {
        /// Row address order, mirrors Y
        const MY = 1 << 7;
        /// Column address order, mirrors X
        const MX = 1 << 6;
        /// Row/column exchange
        const MV = 1 << 5;
        const ML = 1 << 4;
        const BGR = 1 << 3;
        const MH = 1 << 2;
    }
}

impl Madctl {
    pub fn new(mirror_x: bool, mirror_y: bool, swap_xy: bool, bgr: bool) -> Self {
        let mut madctl = Madctl::empty();
        madctl.set(Madctl::MX, mirror_x);
        madctl.set(Madctl::MY, mirror_y);
        madctl.set(Madctl::MV, swap_xy);
        madctl.set(Madctl::BGR, bgr);
        madctl
    }
}

/// One step of a vendor init sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitCmd {
    Cmd(u8, &'static [u8]),
    Delay(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Controller {
    St7796,
    St7789,
}

impl Controller {
    /// Vendor commands sent after sleep-out and pixel format setup
    pub fn init_sequence(self) -> &'static [InitCmd] {
        match self {
            Controller::St7796 => st7796::INIT_CMDS,
            Controller::St7789 => st7789::INIT_CMDS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError<B, P> {
    Bus(B),
    Pin(P),
}

pub struct DcsPanel<BUS, RST> {
    bus: BUS,
    reset: Option<RST>,
    controller: Controller,
    bgr: bool,
    madctl: Madctl,
}

impl<BUS, RST> DcsPanel<BUS, RST>
where
    BUS: DcsBus,
    RST: OutputPin,
{
    pub fn new(bus: BUS, reset: Option<RST>, controller: Controller, bgr: bool) -> Self {
        Self {
            bus,
            reset,
            controller,
            bgr,
            madctl: Madctl::new(false, false, false, bgr),
        }
    }

    pub fn controller(&self) -> Controller {
        self.controller
    }

    pub fn madctl(&self) -> Madctl {
        self.madctl
    }

    /// Pulses the reset line, or sends `SWRESET` without one.
    pub async fn reset<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<(), PanelError<BUS::Error, RST::Error>> {
        match self.reset.as_mut() {
            Some(pin) => {
                pin.set_low().map_err(PanelError::Pin)?;
                delay.delay_ms(10).await;
                pin.set_high().map_err(PanelError::Pin)?;
            }
            None => self.command(SWRESET, &[])?,
        }
        delay.delay_ms(120).await;
        Ok(())
    }

    /// Sleep out, RGB565, current `MADCTL`, then the vendor sequence.
    /// The display stays off until [`display_on`](Self::display_on).
    pub async fn init<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<(), PanelError<BUS::Error, RST::Error>> {
        self.command(SLPOUT, &[])?;
        delay.delay_ms(120).await;
        self.command(MADCTL, &[self.madctl.bits()])?;
        self.command(COLMOD, &[PIXEL_FORMAT_RGB565])?;
        for step in self.controller.init_sequence() {
            match *step {
                InitCmd::Cmd(command, params) => self.command(command, params)?,
                InitCmd::Delay(ms) => delay.delay_ms(ms).await,
            }
        }
        Ok(())
    }

    pub fn display_on(&mut self) -> Result<(), PanelError<BUS::Error, RST::Error>> {
        self.command(DISPON, &[])
    }

    pub fn set_orientation(
        &mut self,
        mirror_x: bool,
        mirror_y: bool,
        swap_xy: bool,
    ) -> Result<(), PanelError<BUS::Error, RST::Error>> {
        let madctl = Madctl::new(mirror_x, mirror_y, swap_xy, self.bgr);
        self.command(MADCTL, &[madctl.bits()])?;
        self.madctl = madctl;
        Ok(())
    }

    pub fn write_command(
        &mut self,
        command: u8,
        params: &[u8],
    ) -> Result<(), PanelError<BUS::Error, RST::Error>> {
        self.command(command, params)
    }

    /// Sets the address window to the area and streams `bytes` into it.
    pub fn write_area(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        bytes: &[u8],
    ) -> Result<(), PanelError<BUS::Error, RST::Error>> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let [x0h, x0l] = x.to_be_bytes();
        let [x1h, x1l] = (x + width - 1).to_be_bytes();
        let [y0h, y0l] = y.to_be_bytes();
        let [y1h, y1l] = (y + height - 1).to_be_bytes();
        self.command(CASET, &[x0h, x0l, x1h, x1l])?;
        self.command(RASET, &[y0h, y0l, y1h, y1l])?;
        self.command(RAMWR, &[])?;
        self.bus.send_pixels(bytes).map_err(PanelError::Bus)
    }

    pub fn release(self) -> (BUS, Option<RST>) {
        (self.bus, self.reset)
    }

    fn command(
        &mut self,
        command: u8,
        params: &[u8],
    ) -> Result<(), PanelError<BUS::Error, RST::Error>> {
        self.bus
            .send_command(command, params)
            .map_err(PanelError::Bus)
    }
}
