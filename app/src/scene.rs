//! The slint `AppWindow` as the scene of the render and input ports

use alloc::rc::Rc;
use core::cell::RefCell;

use heapless::Deque;
use log::{debug, warn};
use port::{Area, Canvas, DirtyRegions, PointerEvent, Scene, Size, UiEvent};
use slint::platform::software_renderer::{MinimalSoftwareWindow, Rgb565Pixel};
use slint::platform::{PointerEventButton, WindowEvent};
use slint::{ComponentHandle, LogicalPosition, PhysicalSize, PlatformError};
use slint_generated::AppWindow;

/// Widget callbacks raised during one dispatch pass
type EventQueue = Rc<RefCell<Deque<UiEvent, 4>>>;

pub struct SlintScene {
    window: Rc<MinimalSoftwareWindow>,
    // Keeps the component alive
    _app: AppWindow,
    events: EventQueue,
}

impl SlintScene {
    /// Builds and shows the app window. Must run after the platform is set.
    pub fn new(window: Rc<MinimalSoftwareWindow>) -> Result<Self, PlatformError> {
        let app = AppWindow::new()?;
        let events = EventQueue::default();

        let queue = events.clone();
        app.on_rotate_requested(move || {
            if queue
                .borrow_mut()
                .push_back(UiEvent::RotateRequested)
                .is_err()
            {
                warn!("ui event queue full, dropping rotate request");
            }
        });
        app.show()?;

        Ok(Self {
            window,
            _app: app,
            events,
        })
    }

    fn send(&self, event: WindowEvent) {
        debug!("dispatching {event:?}");
        if let Err(e) = self.window.try_dispatch_event(event) {
            warn!("pointer dispatch failed: {e:?}");
        }
    }
}

impl Scene for SlintScene {
    type Pixel = Rgb565Pixel;

    fn resize(&mut self, size: Size) {
        self.window
            .set_size(PhysicalSize::new(size.width.into(), size.height.into()));
        self.window.request_redraw();
    }

    fn redraw(&mut self, canvas: &mut Canvas<Rgb565Pixel>, dirty: &mut DirtyRegions) {
        slint::platform::update_timers_and_animations();

        let stride = canvas.stride();
        self.window.draw_if_needed(|renderer| {
            let region = renderer.render(canvas.pixels_mut(), stride);
            let origin = region.bounding_box_origin();
            let size = region.bounding_box_size();
            dirty.add(Area::new(
                origin.x.clamp(0, u16::MAX as i32) as u16,
                origin.y.clamp(0, u16::MAX as i32) as u16,
                size.width.min(u16::MAX as u32) as u16,
                size.height.min(u16::MAX as u32) as u16,
            ));
        });
    }

    fn dispatch(&mut self, event: PointerEvent) {
        let (x, y) = event.position();
        let position = LogicalPosition::new(x.into(), y.into());
        let button = PointerEventButton::Left;
        match event {
            PointerEvent::Pressed { .. } => {
                self.send(WindowEvent::PointerPressed { position, button })
            }
            PointerEvent::Moved { .. } => self.send(WindowEvent::PointerMoved { position }),
            PointerEvent::Released { .. } => {
                self.send(WindowEvent::PointerReleased { position, button });
                // A lifted finger no longer hovers anything
                self.send(WindowEvent::PointerExited);
            }
        }
    }

    fn poll_event(&mut self) -> Option<UiEvent> {
        self.events.borrow_mut().pop_front()
    }
}
