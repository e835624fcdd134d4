//! Sitronix ST7796S, 320x480

use super::InitCmd;

/// Native resolution
pub const INIT_CMDS: &[InitCmd] = &[
    // Command set control, unlock part 1 and 2
    InitCmd::Cmd(0xF0, &[0xC3]),
    InitCmd::Cmd(0xF0, &[0x96]),
    // Display inversion, 1-dot
    InitCmd::Cmd(0xB4, &[0x01]),
    // Entry mode
    InitCmd::Cmd(0xB7, &[0xC6]),
    // Display output ctrl adjust
    InitCmd::Cmd(0xE8, &[0x40, 0x8A, 0x00, 0x00, 0x29, 0x19, 0xA5, 0x33]),
    // Power control 2 and 3
    InitCmd::Cmd(0xC1, &[0x06]),
    InitCmd::Cmd(0xC2, &[0xA7]),
    // VCOM
    InitCmd::Cmd(0xC5, &[0x18]),
    InitCmd::Delay(120),
    // Positive and negative gamma
    InitCmd::Cmd(
        0xE0,
        &[
            0xF0, 0x09, 0x0B, 0x06, 0x04, 0x15, 0x2F, 0x54, 0x42, 0x3C, 0x17, 0x14, 0x18, 0x1B,
        ],
    ),
    InitCmd::Cmd(
        0xE1,
        &[
            0xE0, 0x09, 0x0B, 0x06, 0x04, 0x03, 0x2B, 0x43, 0x42, 0x3B, 0x16, 0x14, 0x17, 0x1B,
        ],
    ),
    InitCmd::Delay(120),
    // Lock command set again
    InitCmd::Cmd(0xF0, &[0x3C]),
    InitCmd::Cmd(0xF0, &[0x69]),
    InitCmd::Delay(120),
];
