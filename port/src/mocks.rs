//! Test doubles for the transports, the scene and GPIO

use std::collections::VecDeque;

use embedded_hal::digital::{ErrorType, OutputPin};

use crate::canvas::{Canvas, DirtyRegions};
use crate::frame_buffer::FrameBuffer;
use crate::geometry::{Area, ByteOrder, Size};
use crate::rotation::PanelOrientation;
use crate::transport::{Completion, Contact, PanelTransport, Rejected, TouchTransport};
use crate::ui::{PointerEvent, Scene, UiEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    Bus,
    Busy,
}

/// Panel that completes transfers on `wait_transfer` and records them
pub struct MockPanel<'a> {
    pub max_transfer: usize,
    pub order: ByteOrder,
    pub calls: Vec<&'static str>,
    pub orientations: Vec<PanelOrientation>,
    /// Bytes as handed over on submit
    pub submitted: Vec<(Area, Vec<u8>)>,
    /// Successfully completed transfers
    pub transfers: Vec<(Area, Vec<u8>)>,
    pub max_outstanding: usize,
    pub fail_init: bool,
    pub fail_submits: usize,
    pub fail_completions: usize,
    pub fail_orientations: usize,
    pub on_write: Option<Box<dyn FnMut() + 'a>>,
    pending: Option<(Area, FrameBuffer, Result<(), MockError>)>,
}

impl MockPanel<'_> {
    pub fn new(max_transfer: usize) -> Self {
        Self {
            max_transfer,
            order: ByteOrder::BigEndian,
            calls: Vec::new(),
            orientations: Vec::new(),
            submitted: Vec::new(),
            transfers: Vec::new(),
            max_outstanding: 0,
            fail_init: false,
            fail_submits: 0,
            fail_completions: 0,
            fail_orientations: 0,
            on_write: None,
            pending: None,
        }
    }
}

impl PanelTransport for MockPanel<'_> {
    type Error = MockError;

    fn max_transfer_bytes(&self) -> usize {
        self.max_transfer
    }

    fn pixel_order(&self) -> ByteOrder {
        self.order
    }

    async fn reset(&mut self) -> Result<(), MockError> {
        self.calls.push("reset");
        Ok(())
    }

    async fn init(&mut self) -> Result<(), MockError> {
        self.calls.push("init");
        if self.fail_init {
            return Err(MockError::Bus);
        }
        Ok(())
    }

    async fn write_command(&mut self, _command: u8, _params: &[u8]) -> Result<(), MockError> {
        self.calls.push("write_command");
        Ok(())
    }

    async fn set_orientation(&mut self, orientation: PanelOrientation) -> Result<(), MockError> {
        if self.fail_orientations > 0 {
            self.fail_orientations -= 1;
            return Err(MockError::Bus);
        }
        self.orientations.push(orientation);
        Ok(())
    }

    fn write_pixels(
        &mut self,
        area: Area,
        buffer: FrameBuffer,
    ) -> Result<(), Rejected<MockError>> {
        if self.pending.is_some() {
            return Err(Rejected {
                error: MockError::Busy,
                buffer,
            });
        }
        if self.fail_submits > 0 {
            self.fail_submits -= 1;
            return Err(Rejected {
                error: MockError::Bus,
                buffer,
            });
        }
        if let Some(hook) = self.on_write.as_mut() {
            hook();
        }
        let result = if self.fail_completions > 0 {
            self.fail_completions -= 1;
            Err(MockError::Bus)
        } else {
            Ok(())
        };
        self.submitted.push((area, buffer.as_bytes().to_vec()));
        self.pending = Some((area, buffer, result));
        self.max_outstanding = self.max_outstanding.max(1);
        Ok(())
    }

    async fn wait_transfer(&mut self) -> Option<Completion<MockError>> {
        let (area, buffer, result) = self.pending.take()?;
        if result.is_ok() {
            self.transfers.push((area, buffer.as_bytes().to_vec()));
        }
        Some(Completion { buffer, result })
    }
}

/// Touch controller replaying canned samples, then reporting no contact
#[derive(Debug, Default)]
pub struct MockTouch {
    samples: VecDeque<Result<Option<Contact>, ()>>,
}

impl MockTouch {
    pub fn with_samples<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = Result<Option<Contact>, ()>>,
    {
        Self {
            samples: samples.into_iter().collect(),
        }
    }
}

impl TouchTransport for MockTouch {
    type Error = ();

    async fn read_contact(&mut self) -> Result<Option<Contact>, ()> {
        self.samples.pop_front().unwrap_or(Ok(None))
    }
}

/// Scene that fills painted areas with a solid color
#[derive(Debug)]
pub struct PatternScene {
    pub size: Size,
    pub resizes: Vec<Size>,
    pub dispatched: Vec<PointerEvent>,
    pub events: VecDeque<UiEvent>,
    pub rotate_on_press: bool,
    painted: Vec<(Area, u16)>,
}

impl PatternScene {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            resizes: Vec::new(),
            dispatched: Vec::new(),
            events: VecDeque::new(),
            rotate_on_press: false,
            painted: Vec::new(),
        }
    }

    /// Scene whose whole surface acts as the rotate button.
    pub fn rotating() -> Self {
        Self {
            rotate_on_press: true,
            ..Self::new(Size::new(320, 480))
        }
    }

    pub fn paint(&mut self, area: Area, color: u16) {
        self.painted.push((area, color));
    }
}

impl Scene for PatternScene {
    type Pixel = u16;

    fn resize(&mut self, size: Size) {
        self.size = size;
        self.resizes.push(size);
    }

    fn redraw(&mut self, canvas: &mut Canvas<u16>, dirty: &mut DirtyRegions) {
        for (area, color) in self.painted.drain(..) {
            canvas.fill(area, color);
            dirty.add(area);
        }
    }

    fn dispatch(&mut self, event: PointerEvent) {
        if self.rotate_on_press && matches!(event, PointerEvent::Pressed { .. }) {
            self.events.push_back(UiEvent::RotateRequested);
        }
        self.dispatched.push(event);
    }

    fn poll_event(&mut self) -> Option<UiEvent> {
        self.events.pop_front()
    }
}

/// Output pin remembering its level
#[derive(Debug, Default)]
pub struct FakePin {
    pub high: bool,
    pub writes: usize,
}

impl ErrorType for FakePin {
    type Error = core::convert::Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        self.writes += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        self.writes += 1;
        Ok(())
    }
}
