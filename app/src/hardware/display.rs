//! ST7796/ST7789 panel over SPI2 with DMA
//!
//! The DMA bus is driven in blocking mode, so a submitted strip has already
//! left the bus when [`Panel::write_pixels`] returns. The completion is kept
//! until the render port collects it through `wait_transfer`.

use core::fmt::Debug;

use drivers::panel::{Controller, DcsInterface, DcsPanel, PanelError};
use embassy_time::Delay;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use esp_hal::dma::{DmaRxBuf, DmaTxBuf};
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::peripherals::{DMA_SPI2, GPIO13, GPIO14, GPIO15, GPIO21, GPIO22, SPI2};
use esp_hal::spi::master::{Config as SpiConfig, Spi, SpiDmaBus};
use esp_hal::spi::Mode;
use esp_hal::time::Rate;
use esp_hal::{dma_buffers, Blocking};
use log::{debug, info};
use mipidsi::interface::SpiInterface;
use port::{
    Area, ByteOrder, ColorSpace, Completion, FrameBuffer, PanelConfig, PanelController,
    PanelOrientation, PanelTransport, Rejected,
};
use static_cell::StaticCell;

type SpiDevice = ExclusiveDevice<SpiDmaBus<'static, Blocking>, Output<'static>, NoDelay>;
type Bus = DcsInterface<SpiInterface<'static, SpiDevice, Output<'static>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// SPI or DMA could not be set up
    Setup,
    Bus,
    ResetPin,
    /// A transfer is still waiting to be collected
    Busy,
}

impl<B: Debug, P> From<PanelError<B, P>> for DisplayError {
    fn from(error: PanelError<B, P>) -> Self {
        match error {
            PanelError::Bus(e) => {
                debug!("panel bus error: {e:?}");
                DisplayError::Bus
            }
            PanelError::Pin(_) => DisplayError::ResetPin,
        }
    }
}

pub struct Panel {
    panel: DcsPanel<Bus, Output<'static>>,
    max_transfer: usize,
    done: Option<Completion<DisplayError>>,
}

impl Panel {
    pub fn display_on(&mut self) -> Result<(), DisplayError> {
        self.panel.display_on()?;
        Ok(())
    }
}

/// Brings up SPI2 with a DMA buffer of `max_transfer_bytes` and wraps the
/// panel controller selected in `config`. Nothing is sent to the panel yet.
#[allow(clippy::too_many_arguments)]
pub fn open(
    config: &PanelConfig,
    spi: SPI2<'static>,
    dma: DMA_SPI2<'static>,
    sclk: GPIO14<'static>,
    mosi: GPIO13<'static>,
    dc: GPIO21<'static>,
    rst: GPIO22<'static>,
    cs: GPIO15<'static>,
) -> Result<Panel, DisplayError> {
    let dc = Output::new(dc, Level::Low, OutputConfig::default());
    let cs = Output::new(cs, Level::High, OutputConfig::default());
    let rst = Output::new(rst, Level::High, OutputConfig::default());

    let spi_dma = Spi::new(
        spi,
        SpiConfig::default()
            .with_frequency(Rate::from_hz(config.clock_hz))
            .with_mode(Mode::_0),
    )
    .map_err(|_| DisplayError::Setup)?
    .with_sck(sclk)
    .with_mosi(mosi)
    .with_dma(dma);

    // Write-only bus, the receive side gets a token buffer
    #[allow(clippy::manual_div_ceil)]
    let (rx_buffer, rx_descriptors, tx_buffer, tx_descriptors) = dma_buffers!(4, 32000);
    let dma_rx_buf = DmaRxBuf::new(rx_descriptors, rx_buffer).map_err(|_| DisplayError::Setup)?;
    let dma_tx_buf = DmaTxBuf::new(tx_descriptors, tx_buffer).map_err(|_| DisplayError::Setup)?;
    let spi = SpiDmaBus::new(spi_dma, dma_rx_buf, dma_tx_buf);

    let spi_device = ExclusiveDevice::new_no_delay(spi, cs).map_err(|_| DisplayError::Setup)?;

    static DISPLAY_BUFFER: StaticCell<[u8; 512]> = StaticCell::new();
    let buffer = DISPLAY_BUFFER.init([0_u8; 512]);
    let interface = DcsInterface::new(SpiInterface::new(spi_device, dc, buffer));

    let controller = match config.controller {
        PanelController::St7796 => Controller::St7796,
        PanelController::St7789 => Controller::St7789,
    };
    let bgr = config.geometry.color_space == ColorSpace::Bgr;
    info!(
        "{:?} on SPI2 at {} Hz, transfers up to {} bytes",
        controller, config.clock_hz, config.max_transfer_bytes
    );

    Ok(Panel {
        panel: DcsPanel::new(interface, Some(rst), controller, bgr),
        max_transfer: config.max_transfer_bytes,
        done: None,
    })
}

impl PanelTransport for Panel {
    type Error = DisplayError;

    fn max_transfer_bytes(&self) -> usize {
        self.max_transfer
    }

    fn pixel_order(&self) -> ByteOrder {
        ByteOrder::BigEndian
    }

    async fn reset(&mut self) -> Result<(), DisplayError> {
        self.panel.reset(&mut Delay).await?;
        Ok(())
    }

    async fn init(&mut self) -> Result<(), DisplayError> {
        self.panel.init(&mut Delay).await?;
        Ok(())
    }

    async fn write_command(&mut self, command: u8, params: &[u8]) -> Result<(), DisplayError> {
        self.panel.write_command(command, params)?;
        Ok(())
    }

    async fn set_orientation(&mut self, orientation: PanelOrientation) -> Result<(), DisplayError> {
        self.panel.set_orientation(
            orientation.mirror_x,
            orientation.mirror_y,
            orientation.swap_xy,
        )?;
        Ok(())
    }

    fn write_pixels(
        &mut self,
        area: Area,
        buffer: FrameBuffer,
    ) -> Result<(), Rejected<DisplayError>> {
        if self.done.is_some() {
            return Err(Rejected {
                error: DisplayError::Busy,
                buffer,
            });
        }
        let result = self
            .panel
            .write_area(area.x, area.y, area.width, area.height, buffer.as_bytes())
            .map_err(DisplayError::from);
        self.done = Some(Completion { buffer, result });
        Ok(())
    }

    async fn wait_transfer(&mut self) -> Option<Completion<DisplayError>> {
        self.done.take()
    }
}
