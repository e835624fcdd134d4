//! Contracts of the panel and touch bindings

use core::fmt::Debug;

use crate::frame_buffer::FrameBuffer;
use crate::geometry::{Area, ByteOrder};
use crate::rotation::PanelOrientation;

/// Current touch position in the controller's raw coordinate range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Contact {
    pub x: u16,
    pub y: u16,
}

impl Contact {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// A submit the transport refused, the buffer goes back to the caller.
#[derive(Debug)]
pub struct Rejected<E> {
    pub error: E,
    pub buffer: FrameBuffer,
}

/// Outcome of a finished pixel transfer
#[derive(Debug)]
pub struct Completion<E> {
    pub buffer: FrameBuffer,
    pub result: Result<(), E>,
}

/// Display controller binding over a byte-oriented bus
///
/// At most one pixel transfer is outstanding. [`write_pixels`] either takes
/// the buffer until [`wait_transfer`] hands it back, or rejects it at once.
///
/// [`write_pixels`]: PanelTransport::write_pixels
/// [`wait_transfer`]: PanelTransport::wait_transfer
pub trait PanelTransport {
    type Error: Debug;

    /// Largest pixel payload a single transfer may carry
    fn max_transfer_bytes(&self) -> usize;

    /// Byte order the controller expects for RGB565
    fn pixel_order(&self) -> ByteOrder;

    async fn reset(&mut self) -> Result<(), Self::Error>;

    async fn init(&mut self) -> Result<(), Self::Error>;

    async fn write_command(&mut self, command: u8, params: &[u8]) -> Result<(), Self::Error>;

    async fn set_orientation(&mut self, orientation: PanelOrientation) -> Result<(), Self::Error>;

    /// Starts sending `buffer` into `area` of the controller's frame memory.
    fn write_pixels(&mut self, area: Area, buffer: FrameBuffer) -> Result<(), Rejected<Self::Error>>;

    /// Waits for the outstanding transfer, `None` if there is none.
    async fn wait_transfer(&mut self) -> Option<Completion<Self::Error>>;
}

/// Touch controller binding over a register-addressed bus
pub trait TouchTransport {
    type Error: Debug;

    async fn read_contact(&mut self) -> Result<Option<Contact>, Self::Error>;
}
