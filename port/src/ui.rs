use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, Receiver};
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Timer};
use log::{debug, info};

use crate::canvas::{Canvas, DirtyRegions, Pixel};
use crate::geometry::Size;
use crate::rotation::RotationControl;
use crate::shutdown::Shutdown;

/// Pointer input in logical display coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PointerEvent {
    Pressed { x: u16, y: u16 },
    Moved { x: u16, y: u16 },
    Released { x: u16, y: u16 },
}

impl PointerEvent {
    pub const fn position(&self) -> (u16, u16) {
        match *self {
            PointerEvent::Pressed { x, y }
            | PointerEvent::Moved { x, y }
            | PointerEvent::Released { x, y } => (x, y),
        }
    }
}

/// Application events raised by widget callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum UiEvent {
    RotateRequested,
}

/// The widget runtime as seen from the ports
pub trait Scene {
    type Pixel: Pixel;

    /// New logical display size, a full redraw follows.
    fn resize(&mut self, size: Size);

    /// Draws everything that changed into `canvas` and records the areas in `dirty`.
    fn redraw(&mut self, canvas: &mut Canvas<Self::Pixel>, dirty: &mut DirtyRegions);

    fn dispatch(&mut self, event: PointerEvent);

    /// Next event raised by a widget callback.
    fn poll_event(&mut self) -> Option<UiEvent>;
}

/// State guarded by the UI lock
pub struct Ui<S> {
    pub scene: S,
    pub rotation: RotationControl,
}

impl<S> Ui<S> {
    pub const fn new(scene: S, rotation: RotationControl) -> Self {
        Self { scene, rotation }
    }
}

pub type UiLock<M, S> = Mutex<M, Ui<S>>;

pub type PointerQueue<M, const N: usize> = Channel<M, PointerEvent, N>;

/// Reacts to application events, always called with the UI lock held
pub trait UiEventHandler<S> {
    fn handle(&mut self, event: UiEvent, ui: &mut Ui<S>);
}

/// Rotate button handler
#[derive(Debug, Default, Clone, Copy)]
pub struct RotateHandler;

impl<S> UiEventHandler<S> for RotateHandler {
    fn handle(&mut self, event: UiEvent, ui: &mut Ui<S>) {
        match event {
            UiEvent::RotateRequested => {
                let rotation = ui.rotation.advance();
                info!("Rotation set to {} degrees", rotation.degrees());
            }
        }
    }
}

/// Event cycle of the widget runtime
pub struct UiRuntime<'a, M: RawMutex, S, H, const N: usize> {
    ui: &'a UiLock<M, S>,
    events: Receiver<'a, M, PointerEvent, N>,
    handler: H,
    idle_period: Duration,
}

impl<'a, M, S, H, const N: usize> UiRuntime<'a, M, S, H, N>
where
    M: RawMutex,
    S: Scene,
    H: UiEventHandler<S>,
{
    pub fn new(
        ui: &'a UiLock<M, S>,
        events: Receiver<'a, M, PointerEvent, N>,
        handler: H,
        idle_period: Duration,
    ) -> Self {
        Self {
            ui,
            events,
            handler,
            idle_period,
        }
    }

    /// Dispatches `first` and everything queued behind it, then runs the
    /// handler for the events the scene raised. One lock scope for all of it.
    pub async fn process(&mut self, first: Option<PointerEvent>) -> usize {
        let mut ui = self.ui.lock().await;
        let mut dispatched = 0;
        let mut next = first;
        while let Some(event) = next {
            ui.scene.dispatch(event);
            dispatched += 1;
            next = if dispatched < N {
                self.events.try_receive().ok()
            } else {
                None
            };
        }
        while let Some(event) = ui.scene.poll_event() {
            debug!("ui event {event:?}");
            self.handler.handle(event, &mut *ui);
        }
        dispatched
    }

    pub async fn run(&mut self, stop: &Shutdown) {
        while !stop.is_requested() {
            let first = match select(self.events.receive(), Timer::after(self.idle_period)).await
            {
                Either::First(event) => Some(event),
                Either::Second(()) => None,
            };
            self.process(first).await;
        }
        info!("ui runtime stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::PatternScene;
    use crate::rotation::{PanelOrientation, Rotation};
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn test_press_on_rotate_button_advances_rotation() {
        let lock: UiLock<NoopRawMutex, _> = Mutex::new(Ui::new(
            PatternScene::rotating(),
            RotationControl::new(Rotation::Deg0, PanelOrientation::default()),
        ));
        let queue: PointerQueue<NoopRawMutex, 4> = Channel::new();
        let mut runtime = UiRuntime::new(
            &lock,
            queue.receiver(),
            RotateHandler,
            Duration::from_millis(20),
        );

        queue.try_send(PointerEvent::Moved { x: 1, y: 1 }).unwrap();
        queue.try_send(PointerEvent::Released { x: 1, y: 1 }).unwrap();
        let dispatched = block_on(runtime.process(Some(PointerEvent::Pressed { x: 1, y: 1 })));
        assert_eq!(dispatched, 3);

        let ui = lock.try_lock().unwrap();
        assert_eq!(ui.rotation.current(), Rotation::Deg90);
        assert_eq!(ui.scene.dispatched.len(), 3);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_idle_pass_still_drains_scene_events() {
        let mut scene = PatternScene::new(Size::new(8, 8));
        scene.events.push_back(UiEvent::RotateRequested);
        scene.events.push_back(UiEvent::RotateRequested);
        let lock: UiLock<NoopRawMutex, _> = Mutex::new(Ui::new(
            scene,
            RotationControl::new(Rotation::Deg270, PanelOrientation::default()),
        ));
        let queue: PointerQueue<NoopRawMutex, 4> = Channel::new();
        let mut runtime = UiRuntime::new(&lock, queue.receiver(), RotateHandler, Duration::from_millis(1));
        assert_eq!(block_on(runtime.process(None)), 0);
        assert_eq!(lock.try_lock().unwrap().rotation.current(), Rotation::Deg90);
    }

    #[test]
    fn test_run_returns_once_stopped() {
        let lock: UiLock<NoopRawMutex, _> = Mutex::new(Ui::new(
            PatternScene::new(Size::new(8, 8)),
            RotationControl::new(Rotation::Deg0, PanelOrientation::default()),
        ));
        let queue: PointerQueue<NoopRawMutex, 4> = Channel::new();
        let mut runtime = UiRuntime::new(&lock, queue.receiver(), RotateHandler, Duration::from_millis(1));
        let stop = Shutdown::new();
        stop.request();
        block_on(runtime.run(&stop));
        assert!(lock.try_lock().unwrap().scene.dispatched.is_empty());
    }
}
