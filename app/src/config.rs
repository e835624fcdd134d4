//! Board wiring and tuning of the ST7796 + FT5x06 module

use port::{
    BacklightConfig, BacklightLevel, BoardConfig, ColorSpace, InputConfig, PanelConfig,
    PanelController, PanelGeometry, PanelOrientation, RenderConfig, SpiPins, TouchCalibration,
    TouchConfig, TouchController,
};

pub const LCD_WIDTH: u16 = 320;
pub const LCD_HEIGHT: u16 = 480;

pub const BOARD: BoardConfig = BoardConfig {
    panel: PanelConfig {
        controller: PanelController::St7796,
        geometry: PanelGeometry::new(LCD_WIDTH, LCD_HEIGHT).with_color_space(ColorSpace::Bgr),
        pins: SpiPins {
            sclk: 14,
            mosi: 13,
            miso: None,
            dc: 21,
            rst: Some(22),
            cs: 15,
        },
        clock_hz: 20_000_000,
        cmd_bits: 8,
        param_bits: 8,
        upright: PanelOrientation::new(true, true, false),
        // Matches the DMA buffer handed to the SPI bus
        max_transfer_bytes: 32000,
    },
    touch: TouchConfig {
        controller: TouchController::Ft5x06,
        sda: 18,
        scl: 19,
        int: Some(39),
        rst: None,
        cs: None,
        clock_hz: 400_000,
        address: drivers::ft5x06::FT5X06_ADDRESS,
    },
    backlight: BacklightConfig {
        pin: 23,
        level: BacklightLevel::ActiveHigh,
    },
    render: RenderConfig::new(),
    input: InputConfig::new(TouchCalibration::new(LCD_WIDTH, LCD_HEIGHT)),
    shared_chip_select_confirmed: false,
};
