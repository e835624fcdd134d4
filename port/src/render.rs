use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Timer};
use log::{debug, error, info, warn};

use crate::canvas::{Canvas, DirtyRegions, Pixel};
use crate::error::{ConfigError, Error};
use crate::frame_buffer::{BufferPool, Buffering, FrameBuffer};
use crate::geometry::{Area, ByteOrder, PanelGeometry, Size};
use crate::rotation::{PanelOrientation, Rotation};
use crate::shutdown::Shutdown;
use crate::transport::{Completion, PanelTransport, Rejected};
use crate::ui::{Scene, Ui, UiLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderConfig {
    pub period: Duration,
    /// Rows per frame buffer
    pub strip_height: u16,
    pub buffering: Buffering,
    /// Extra attempts per strip before it is dropped
    pub max_retries: u8,
}

impl RenderConfig {
    pub const fn new() -> Self {
        Self {
            period: Duration::from_millis(5),
            strip_height: 50,
            buffering: Buffering::Double,
            max_retries: 3,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks the strip setup against the panel and the transport limit.
pub fn check_strip(
    geometry: &PanelGeometry,
    config: &RenderConfig,
    max_transfer_bytes: usize,
) -> Result<(), ConfigError> {
    let strip_height = config.strip_height;
    let strip_error = ConfigError::StripHeight {
        strip_height,
        panel_height: geometry.height,
    };
    if strip_height == 0 || strip_height > geometry.height {
        return Err(strip_error);
    }
    // One full row has to fit in every rotation
    let longest_row = geometry.width.max(geometry.height) as usize;
    let strip_pixels = geometry.width as usize * strip_height as usize;
    if strip_pixels < longest_row {
        return Err(strip_error);
    }
    let required = geometry.strip_bytes(strip_height);
    if required > max_transfer_bytes {
        return Err(ConfigError::TransferTooLarge {
            required,
            max: max_transfer_bytes,
        });
    }
    if config.period.as_ticks() == 0 {
        return Err(ConfigError::ZeroPeriod);
    }
    Ok(())
}

/// What the input port needs to know about the attached display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplaySurface {
    /// Panel resolution at 0 degrees
    pub native: Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderStats {
    pub frames: u32,
    pub strips: u32,
    pub retries: u32,
    pub dropped: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// Nothing to draw, the bus was not touched
    Idle,
    /// The panel orientation could not be applied, retried next cycle
    Deferred,
    Flushed { strips: u32, dropped: u32 },
}

struct InFlight {
    area: Area,
    attempts: u8,
}

/// Pushes the dirty parts of the scene canvas to the panel
pub struct RenderPort<P, X> {
    geometry: PanelGeometry,
    panel: X,
    config: RenderConfig,
    canvas: Canvas<P>,
    dirty: DirtyRegions,
    pool: BufferPool,
    order: ByteOrder,
    applied: Rotation,
    pending_orientation: Option<PanelOrientation>,
    orientation_attempts: u8,
    in_flight: Option<InFlight>,
    stats: RenderStats,
}

impl<P, X> RenderPort<P, X>
where
    P: Pixel,
    X: PanelTransport,
{
    pub fn new(geometry: PanelGeometry, panel: X, config: RenderConfig) -> Result<Self, ConfigError> {
        geometry.validate()?;
        check_strip(&geometry, &config, panel.max_transfer_bytes())?;

        let buffer_bytes = geometry.strip_bytes(config.strip_height);
        let order = panel.pixel_order();
        debug!(
            "render port: {}x{} panel, {} x {} byte buffers, {:?}",
            geometry.width,
            geometry.height,
            config.buffering.count(),
            buffer_bytes,
            order
        );
        Ok(Self {
            geometry,
            panel,
            config,
            canvas: Canvas::new(geometry.size()),
            dirty: DirtyRegions::new(geometry.size()),
            pool: BufferPool::new(config.buffering, buffer_bytes),
            order,
            applied: Rotation::Deg0,
            pending_orientation: None,
            orientation_attempts: 0,
            in_flight: None,
            stats: RenderStats::default(),
        })
    }

    /// Hardware reset followed by the controller init sequence.
    pub async fn bring_up(&mut self) -> Result<(), Error<X::Error>> {
        self.panel.reset().await.map_err(Error::Transport)?;
        self.panel.init().await.map_err(Error::Transport)?;
        info!("panel initialized");
        Ok(())
    }

    /// Sizes the scene for the current rotation and schedules a full redraw.
    /// Called with the UI lock held.
    pub fn attach_display<S>(&mut self, ui: &mut Ui<S>) -> DisplaySurface
    where
        S: Scene<Pixel = P>,
    {
        self.apply_rotation(ui);
        DisplaySurface {
            native: self.geometry.size(),
        }
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn panel(&self) -> &X {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut X {
        &mut self.panel
    }

    pub fn canvas(&self) -> &Canvas<P> {
        &self.canvas
    }

    /// One redraw pass.
    pub async fn cycle<M, S>(&mut self, ui: &UiLock<M, S>) -> CycleOutcome
    where
        M: RawMutex,
        S: Scene<Pixel = P>,
    {
        {
            let mut ui = ui.lock().await;
            if ui.rotation.current() != self.applied {
                self.apply_rotation(&mut *ui);
            }
            ui.scene.redraw(&mut self.canvas, &mut self.dirty);
        }

        if self.dirty.is_empty() && self.pending_orientation.is_none() {
            return CycleOutcome::Idle;
        }

        self.settle().await;

        if let Some(orientation) = self.pending_orientation {
            match self.panel.set_orientation(orientation).await {
                Ok(()) => {
                    debug!("panel orientation {orientation:?}");
                    self.pending_orientation = None;
                    self.orientation_attempts = 0;
                }
                Err(e) if self.orientation_attempts < self.config.max_retries => {
                    warn!("setting panel orientation failed: {e:?}");
                    self.orientation_attempts += 1;
                    self.stats.retries += 1;
                    return CycleOutcome::Deferred;
                }
                Err(e) => {
                    error!("giving up on panel orientation {orientation:?}: {e:?}");
                    self.pending_orientation = None;
                    self.orientation_attempts = 0;
                    self.stats.dropped += 1;
                }
            }
        }

        let before = self.stats;
        let capacity = self.pool.buffer_bytes() / self.geometry.bytes_per_pixel();
        for area in self.dirty.take() {
            let rows = (capacity / area.width as usize).clamp(1, u16::MAX as usize) as u16;
            let mut y = area.y;
            while y < area.bottom() {
                let height = rows.min(area.bottom() - y);
                let strip = Area::new(area.x, y, area.width, height);
                let buffer = self.acquire().await;
                // Loaded while the previous strip may still be on the bus
                let staged = self.stage(strip, buffer);
                self.settle().await;
                if let Some(buffer) = staged {
                    self.submit(strip, buffer, 0);
                }
                yield_now().await;
                y += height;
            }
        }
        self.settle().await;
        self.stats.frames += 1;

        CycleOutcome::Flushed {
            strips: self.stats.strips - before.strips,
            dropped: self.stats.dropped - before.dropped,
        }
    }

    /// Redraws every `period` until `stop` is requested.
    pub async fn run<M, S>(&mut self, ui: &UiLock<M, S>, stop: &Shutdown)
    where
        M: RawMutex,
        S: Scene<Pixel = P>,
    {
        while !stop.is_requested() {
            self.cycle(ui).await;
            Timer::after(self.config.period).await;
        }
        self.settle().await;
        info!("render port stopped after {} frames", self.stats.frames);
    }

    fn apply_rotation<S>(&mut self, ui: &mut Ui<S>)
    where
        S: Scene<Pixel = P>,
    {
        let rotation = ui.rotation.current();
        let size = self.geometry.logical_size(rotation);
        self.canvas.reshape(size);
        self.dirty.set_bounds(size);
        self.dirty.mark_all();
        ui.scene.resize(size);
        self.applied = rotation;
        self.pending_orientation = Some(ui.rotation.panel_orientation());
        self.orientation_attempts = 0;
        info!(
            "display {}x{} at {} degrees",
            size.width,
            size.height,
            rotation.degrees()
        );
    }

    async fn acquire(&mut self) -> FrameBuffer {
        if let Some(buffer) = self.pool.take() {
            return buffer;
        }
        self.settle().await;
        match self.pool.take() {
            Some(buffer) => buffer,
            None => {
                warn!("no idle frame buffer, allocating a replacement");
                FrameBuffer::new(self.pool.buffer_bytes())
            }
        }
    }

    /// Hands `buffer` to the panel, resubmitting a rejected one up to the retry limit.
    fn submit(&mut self, area: Area, mut buffer: FrameBuffer, mut attempts: u8) {
        loop {
            match self.panel.write_pixels(area, buffer) {
                Ok(()) => {
                    self.in_flight = Some(InFlight { area, attempts });
                    return;
                }
                Err(Rejected {
                    error,
                    buffer: rejected,
                }) => {
                    if attempts >= self.config.max_retries {
                        self.drop_strip(area, rejected, error);
                        return;
                    }
                    debug!("strip {area:?} rejected: {error:?}, retrying");
                    attempts += 1;
                    self.stats.retries += 1;
                    buffer = rejected;
                }
            }
        }
    }

    /// Waits until no transfer is outstanding.
    async fn settle(&mut self) {
        while let Some(flight) = self.in_flight.take() {
            match self.panel.wait_transfer().await {
                Some(Completion {
                    buffer,
                    result: Ok(()),
                }) => {
                    self.stats.strips += 1;
                    self.pool.give(buffer);
                }
                Some(Completion {
                    buffer,
                    result: Err(error),
                }) => {
                    if flight.attempts >= self.config.max_retries {
                        self.drop_strip(flight.area, buffer, error);
                    } else {
                        debug!("strip {:?} failed: {error:?}, retrying", flight.area);
                        self.stats.retries += 1;
                        self.submit(flight.area, buffer, flight.attempts + 1);
                    }
                }
                None => warn!("transfer of {:?} vanished", flight.area),
            }
        }
    }

    /// Copies `strip` into `buffer`, or drops it when the canvas cannot supply it.
    fn stage(&mut self, strip: Area, mut buffer: FrameBuffer) -> Option<FrameBuffer> {
        if buffer.load(&self.canvas, strip, self.order) {
            return Some(buffer);
        }
        error!("dropping strip {strip:?}: outside canvas {:?}", self.canvas.size());
        self.stats.dropped += 1;
        self.pool.give(buffer);
        None
    }

    fn drop_strip(&mut self, area: Area, buffer: FrameBuffer, error: X::Error) {
        error!("dropping strip {area:?}: {error:?}");
        self.stats.dropped += 1;
        self.pool.give(buffer);
    }
}
