use core::sync::atomic::{AtomicBool, Ordering};

/// Stop signal shared by the periodic loops
#[derive(Debug, Default)]
pub struct Shutdown {
    requested: AtomicBool,
}

impl Shutdown {
    pub const fn new() -> Self {
        Self {
            requested: AtomicBool::new(false),
        }
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_sticky() {
        let stop = Shutdown::new();
        assert!(!stop.is_requested());
        stop.request();
        stop.request();
        assert!(stop.is_requested());
    }
}
