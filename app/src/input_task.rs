use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use port::{InputPort, Shutdown};

use crate::hardware::Touchpad;
use crate::{AppUi, POINTER_QUEUE_DEPTH};

pub type TouchInput = InputPort<'static, Touchpad, CriticalSectionRawMutex, POINTER_QUEUE_DEPTH>;

#[embassy_executor::task]
pub async fn input_task(mut input: TouchInput, ui: &'static AppUi, stop: &'static Shutdown) {
    input.run(ui, stop).await;
}
