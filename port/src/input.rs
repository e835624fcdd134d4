use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Sender;
use embassy_time::{Duration, Instant, Timer};
use log::{info, warn};

use crate::error::ConfigError;
use crate::geometry::Size;
use crate::render::DisplaySurface;
use crate::rotation::Rotation;
use crate::shutdown::Shutdown;
use crate::throttle::LogThrottle;
use crate::transport::{Contact, TouchTransport};
use crate::ui::{PointerEvent, UiLock};

/// Maps the touch controller's raw range onto the native panel frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchCalibration {
    /// Raw coordinate range, exclusive
    pub x_max: u16,
    pub y_max: u16,
    pub swap_xy: bool,
    pub mirror_x: bool,
    pub mirror_y: bool,
}

impl TouchCalibration {
    pub const fn new(x_max: u16, y_max: u16) -> Self {
        Self {
            x_max,
            y_max,
            swap_xy: false,
            mirror_x: false,
            mirror_y: false,
        }
    }

    /// Native panel coordinates of a raw contact, clamped to the panel.
    pub fn apply(&self, contact: Contact, native: Size) -> (u16, u16) {
        let (mut x, mut y) = (contact.x, contact.y);
        if self.swap_xy {
            core::mem::swap(&mut x, &mut y);
        }
        let x_max = self.x_max.max(1);
        let y_max = self.y_max.max(1);
        x = x.min(x_max - 1);
        y = y.min(y_max - 1);
        if self.mirror_x {
            x = x_max - 1 - x;
        }
        if self.mirror_y {
            y = y_max - 1 - y;
        }
        (
            scale(x, x_max, native.width),
            scale(y, y_max, native.height),
        )
    }
}

fn scale(value: u16, range: u16, target: u16) -> u16 {
    if range == target {
        return value.min(target.saturating_sub(1));
    }
    let scaled = value as u32 * target as u32 / range as u32;
    (scaled as u16).min(target.saturating_sub(1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputConfig {
    pub period: Duration,
    /// Movement in pixels ignored while pressed
    pub jitter: u16,
    pub calibration: TouchCalibration,
    pub error_log_interval: Duration,
}

impl InputConfig {
    pub const fn new(calibration: TouchCalibration) -> Self {
        Self {
            period: Duration::from_millis(20),
            jitter: 2,
            calibration,
            error_log_interval: Duration::from_secs(1),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::new(TouchCalibration::new(320, 480))
    }
}

/// Periodic touch sampling feeding the pointer queue
pub struct InputPort<'a, T, M: RawMutex, const N: usize> {
    touch: T,
    surface: DisplaySurface,
    events: Sender<'a, M, PointerEvent, N>,
    config: InputConfig,
    pressed_at: Option<(u16, u16)>,
    errors: LogThrottle,
}

impl<'a, T, M, const N: usize> InputPort<'a, T, M, N>
where
    T: TouchTransport,
    M: RawMutex,
{
    pub fn new(
        touch: T,
        surface: DisplaySurface,
        events: Sender<'a, M, PointerEvent, N>,
        config: InputConfig,
    ) -> Result<Self, ConfigError> {
        if config.period.as_ticks() == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if config.calibration.x_max == 0 || config.calibration.y_max == 0 {
            return Err(ConfigError::EmptyGeometry);
        }
        Ok(Self {
            touch,
            surface,
            events,
            config,
            pressed_at: None,
            errors: LogThrottle::new(config.error_log_interval),
        })
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed_at.is_some()
    }

    /// Turns one sample into at most one pointer event.
    pub fn sample(&mut self, contact: Option<Contact>, rotation: Rotation) -> Option<PointerEvent> {
        let Some(contact) = contact else {
            let (x, y) = self.pressed_at.take()?;
            return Some(PointerEvent::Released { x, y });
        };

        let native = self.surface.native;
        let (nx, ny) = self.config.calibration.apply(contact, native);
        let (x, y) = rotation.to_logical(native, nx, ny);

        let event = match self.pressed_at {
            None => PointerEvent::Pressed { x, y },
            Some((last_x, last_y)) => {
                if x.abs_diff(last_x).max(y.abs_diff(last_y)) <= self.config.jitter {
                    return None;
                }
                PointerEvent::Moved { x, y }
            }
        };
        self.pressed_at = Some((x, y));
        Some(event)
    }

    /// One sampling pass.
    pub async fn cycle<S>(&mut self, ui: &UiLock<M, S>) -> Option<PointerEvent> {
        let contact = match self.touch.read_contact().await {
            Ok(contact) => contact,
            Err(e) => {
                if let Some(suppressed) = self.errors.permit(Instant::now()) {
                    warn!("touch read failed: {e:?} ({suppressed} suppressed)");
                }
                None
            }
        };
        let rotation = ui.lock().await.rotation.current();

        let event = self.sample(contact, rotation)?;
        if self.events.try_send(event).is_err() {
            warn!("pointer queue full, dropping {event:?}");
        }
        Some(event)
    }

    /// Samples every `period` until `stop` is requested.
    pub async fn run<S>(&mut self, ui: &UiLock<M, S>, stop: &Shutdown) {
        while !stop.is_requested() {
            self.cycle(ui).await;
            Timer::after(self.config.period).await;
        }
        info!("input port stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockTouch, PatternScene};
    use crate::rotation::{PanelOrientation, RotationControl};
    use crate::ui::{PointerQueue, Ui};
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_sync::channel::Channel;
    use embassy_sync::mutex::Mutex;

    const SURFACE: DisplaySurface = DisplaySurface {
        native: Size::new(320, 480),
    };

    fn port<'a>(
        queue: &'a PointerQueue<NoopRawMutex, 8>,
        touch: MockTouch,
    ) -> InputPort<'a, MockTouch, NoopRawMutex, 8> {
        InputPort::new(touch, SURFACE, queue.sender(), InputConfig::default()).unwrap()
    }

    fn ui_lock(rotation: Rotation) -> UiLock<NoopRawMutex, PatternScene> {
        Mutex::new(Ui::new(
            PatternScene::new(Size::new(320, 480)),
            RotationControl::new(rotation, PanelOrientation::default()),
        ))
    }

    #[test]
    fn test_rejects_zero_period() {
        let queue: PointerQueue<NoopRawMutex, 8> = Channel::new();
        let config = InputConfig {
            period: Duration::from_ticks(0),
            ..InputConfig::default()
        };
        let result = InputPort::new(MockTouch::default(), SURFACE, queue.sender(), config);
        assert_eq!(result.err(), Some(ConfigError::ZeroPeriod));
    }

    #[test]
    fn test_jitter_is_debounced() {
        let queue = Channel::new();
        let mut input = port(&queue, MockTouch::default());
        let at = |x, y| Some(Contact::new(x, y));

        assert_eq!(
            input.sample(at(100, 100), Rotation::Deg0),
            Some(PointerEvent::Pressed { x: 100, y: 100 })
        );
        assert_eq!(input.sample(at(100, 100), Rotation::Deg0), None);
        assert_eq!(input.sample(at(102, 99), Rotation::Deg0), None);
        assert_eq!(
            input.sample(at(103, 100), Rotation::Deg0),
            Some(PointerEvent::Moved { x: 103, y: 100 })
        );
        // Measured from the last emitted position
        assert_eq!(input.sample(at(101, 100), Rotation::Deg0), None);
    }

    #[test]
    fn test_single_release_after_lift() {
        let queue = Channel::new();
        let mut input = port(&queue, MockTouch::default());

        input.sample(Some(Contact::new(10, 20)), Rotation::Deg0);
        let events: Vec<_> = (0..3)
            .filter_map(|_| input.sample(None, Rotation::Deg0))
            .collect();
        assert_eq!(events, [PointerEvent::Released { x: 10, y: 20 }]);
        assert!(!input.is_pressed());
        assert_eq!(
            input.sample(Some(Contact::new(10, 20)), Rotation::Deg0),
            Some(PointerEvent::Pressed { x: 10, y: 20 })
        );
    }

    #[test]
    fn test_contact_is_rotated_into_logical_frame() {
        let queue = Channel::new();
        let mut input = port(&queue, MockTouch::default());
        assert_eq!(
            input.sample(Some(Contact::new(10, 20)), Rotation::Deg90),
            Some(PointerEvent::Pressed { x: 20, y: 309 })
        );
    }

    #[test]
    fn test_calibration_swaps_mirrors_and_clamps() {
        let native = Size::new(320, 480);
        let calibration = TouchCalibration {
            swap_xy: true,
            mirror_x: true,
            ..TouchCalibration::new(320, 480)
        };
        assert_eq!(calibration.apply(Contact::new(20, 10), native), (309, 20));
        assert_eq!(
            TouchCalibration::new(320, 480).apply(Contact::new(900, 900), native),
            (319, 479)
        );
        let coarse = TouchCalibration::new(160, 240);
        assert_eq!(coarse.apply(Contact::new(80, 120), native), (160, 240));
    }

    #[test]
    fn test_cycle_queues_events_and_survives_errors() {
        let lock = ui_lock(Rotation::Deg0);
        let queue = Channel::new();
        let touch = MockTouch::with_samples([
            Ok(Some(Contact::new(5, 5))),
            Err(()),
            Err(()),
            Ok(None),
        ]);
        let mut input = port(&queue, touch);

        assert_eq!(
            block_on(input.cycle(&lock)),
            Some(PointerEvent::Pressed { x: 5, y: 5 })
        );
        assert_eq!(
            block_on(input.cycle(&lock)),
            Some(PointerEvent::Released { x: 5, y: 5 })
        );
        assert_eq!(block_on(input.cycle(&lock)), None);
        assert_eq!(block_on(input.cycle(&lock)), None);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.try_receive(), Ok(PointerEvent::Pressed { x: 5, y: 5 }));
    }

    #[test]
    fn test_full_queue_drops_event() {
        let lock = ui_lock(Rotation::Deg0);
        let queue: PointerQueue<NoopRawMutex, 1> = Channel::new();
        let touch = MockTouch::with_samples([
            Ok(Some(Contact::new(5, 5))),
            Ok(Some(Contact::new(50, 50))),
        ]);
        let mut input =
            InputPort::new(touch, SURFACE, queue.sender(), InputConfig::default()).unwrap();
        block_on(input.cycle(&lock));
        block_on(input.cycle(&lock));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.try_receive(), Ok(PointerEvent::Pressed { x: 5, y: 5 }));
    }
}
