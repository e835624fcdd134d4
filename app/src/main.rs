#![no_std]
#![no_main]

use alloc::boxed::Box;
use drivers::TouchSensorError;
use embassy_executor::{SpawnError, Spawner};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_time::Duration;
use esp_alloc::psram_allocator;
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::peripherals::{
    DMA_SPI2, GPIO13, GPIO14, GPIO15, GPIO18, GPIO19, GPIO21, GPIO22, GPIO23, I2C0, SPI2,
};
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use esp_hal_embassy::main;
use log::info;
use port::{
    ConfigError, Error, InputPort, PointerQueue, RenderPort, RotateHandler, Rotation,
    RotationControl, Shutdown, Ui, UiLock, UiRuntime,
};
use slint::platform::software_renderer::{MinimalSoftwareWindow, RepaintBufferType};
use slint::platform::SetPlatformError;
use slint::PlatformError;
use static_cell::StaticCell;

use crate::config::BOARD;
use crate::hardware::DisplayError;
use crate::input_task::input_task;
use crate::render_task::render_task;
use crate::scene::SlintScene;
use crate::slint_backend::Backend;

extern crate alloc;

mod config;
mod hardware;
mod input_task;
mod render_task;
mod scene;
mod slint_backend;

esp_bootloader_esp_idf::esp_app_desc!();

pub const POINTER_QUEUE_DEPTH: usize = 8;

/// Wake-up interval of the UI runtime while no pointer events arrive
const UI_IDLE_PERIOD: Duration = Duration::from_millis(10);

pub type AppUi = UiLock<CriticalSectionRawMutex, SlintScene>;

static UI: StaticCell<AppUi> = StaticCell::new();
static POINTER_EVENTS: PointerQueue<CriticalSectionRawMutex, POINTER_QUEUE_DEPTH> =
    Channel::new();
static SHUTDOWN: Shutdown = Shutdown::new();

/// Peripherals wired to the LCD module, GPIO numbers as in [`BOARD`]
struct BoardPeripherals {
    spi2: SPI2<'static>,
    dma: DMA_SPI2<'static>,
    sclk: GPIO14<'static>,
    mosi: GPIO13<'static>,
    dc: GPIO21<'static>,
    rst: GPIO22<'static>,
    cs: GPIO15<'static>,
    i2c0: I2C0<'static>,
    sda: GPIO18<'static>,
    scl: GPIO19<'static>,
    backlight: GPIO23<'static>,
}

#[derive(Debug)]
enum StartupError {
    Display(Error<DisplayError>),
    Touch(Error<TouchSensorError>),
    I2c(esp_hal::i2c::master::ConfigError),
    Platform(SetPlatformError),
    Window(PlatformError),
    Spawn(SpawnError),
}

impl From<ConfigError> for StartupError {
    fn from(error: ConfigError) -> Self {
        Self::Display(Error::Configuration(error))
    }
}

impl From<Error<DisplayError>> for StartupError {
    fn from(error: Error<DisplayError>) -> Self {
        Self::Display(error)
    }
}

impl From<DisplayError> for StartupError {
    fn from(error: DisplayError) -> Self {
        Self::Display(Error::Transport(error))
    }
}

impl From<Error<TouchSensorError>> for StartupError {
    fn from(error: Error<TouchSensorError>) -> Self {
        Self::Touch(error)
    }
}

impl From<esp_hal::i2c::master::ConfigError> for StartupError {
    fn from(error: esp_hal::i2c::master::ConfigError) -> Self {
        Self::I2c(error)
    }
}

impl From<SetPlatformError> for StartupError {
    fn from(error: SetPlatformError) -> Self {
        Self::Platform(error)
    }
}

impl From<PlatformError> for StartupError {
    fn from(error: PlatformError) -> Self {
        Self::Window(error)
    }
}

impl From<SpawnError> for StartupError {
    fn from(error: SpawnError) -> Self {
        Self::Spawn(error)
    }
}

#[main]
async fn main(spawner: Spawner) {
    esp_println::logger::init_logger_from_env();

    let peripherals = esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::_240MHz));

    esp_alloc::heap_allocator!(size: 64 * 1024);
    // The full-screen canvas only fits in PSRAM
    psram_allocator!(peripherals.PSRAM, esp_hal::psram);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);
    info!("Embassy initialized!");

    let board = BoardPeripherals {
        spi2: peripherals.SPI2,
        dma: peripherals.DMA_SPI2,
        sclk: peripherals.GPIO14,
        mosi: peripherals.GPIO13,
        dc: peripherals.GPIO21,
        rst: peripherals.GPIO22,
        cs: peripherals.GPIO15,
        i2c0: peripherals.I2C0,
        sda: peripherals.GPIO18,
        scl: peripherals.GPIO19,
        backlight: peripherals.GPIO23,
    };

    if let Err(e) = start(spawner, board).await {
        panic!("startup failed: {e:?}");
    }
    info!("ui stopped");
}

async fn start(spawner: Spawner, p: BoardPeripherals) -> Result<(), StartupError> {
    BOARD.validate()?;

    let mut backlight = hardware::backlight::open(p.backlight, &BOARD.backlight);

    let panel = hardware::display::open(
        &BOARD.panel,
        p.spi2,
        p.dma,
        p.sclk,
        p.mosi,
        p.dc,
        p.rst,
        p.cs,
    )?;
    let mut render = RenderPort::new(BOARD.panel.geometry, panel, BOARD.render)?;
    render.bring_up().await?;
    render.panel_mut().display_on()?;

    let i2c = I2c::new(
        p.i2c0,
        I2cConfig::default().with_frequency(Rate::from_hz(BOARD.touch.clock_hz)),
    )?
    .with_sda(p.sda)
    .with_scl(p.scl)
    .into_async();
    let touchpad = hardware::touch::open(i2c, &BOARD.touch).await?;

    let window = MinimalSoftwareWindow::new(RepaintBufferType::ReusedBuffer);
    slint::platform::set_platform(Box::new(Backend::new(window.clone())))?;
    let scene = SlintScene::new(window)?;

    let rotation = RotationControl::new(Rotation::Deg0, BOARD.panel.upright);
    let ui: &'static AppUi = UI.init(Mutex::new(Ui::new(scene, rotation)));
    let surface = render.attach_display(&mut *ui.lock().await);
    let input = InputPort::new(touchpad, surface, POINTER_EVENTS.sender(), BOARD.input)?;

    spawner.spawn(render_task(render, ui, &SHUTDOWN))?;
    spawner.spawn(input_task(input, ui, &SHUTDOWN))?;

    match backlight.on() {
        Ok(()) => info!("backlight on"),
        Err(never) => match never {},
    }

    let mut runtime = UiRuntime::new(
        ui,
        POINTER_EVENTS.receiver(),
        RotateHandler,
        UI_IDLE_PERIOD,
    );
    runtime.run(&SHUTDOWN).await;
    Ok(())
}
