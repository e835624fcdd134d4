//! Sitronix ST7789V, up to 240x320

use super::{InitCmd, INVON};

pub const INIT_CMDS: &[InitCmd] = &[
    // Porch control
    InitCmd::Cmd(0xB2, &[0x0C, 0x0C, 0x00, 0x33, 0x33]),
    // Gate control
    InitCmd::Cmd(0xB7, &[0x35]),
    // VCOM setting
    InitCmd::Cmd(0xBB, &[0x19]),
    InitCmd::Cmd(0xC0, &[0x2C]),
    InitCmd::Cmd(0xC2, &[0x01]),
    InitCmd::Cmd(0xC3, &[0x12]),
    InitCmd::Cmd(0xC4, &[0x20]),
    // 60 Hz frame rate
    InitCmd::Cmd(0xC6, &[0x0F]),
    InitCmd::Cmd(0xD0, &[0xA4, 0xA1]),
    // IPS panels show inverted colors without it
    InitCmd::Cmd(INVON, &[]),
    InitCmd::Delay(10),
];
