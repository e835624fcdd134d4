#![no_std]

slint::include_modules!();
