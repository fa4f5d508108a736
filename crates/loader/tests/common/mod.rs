#![allow(dead_code)]

use std::cell::Cell;
use std::time::Duration;

use consolekit_loader::{FetchError, LocalBoxFuture, PageReloader, Timer};

/// Counts waits, then sleeps on tokio's (possibly paused) clock.
#[derive(Default)]
pub struct RecordingTimer {
    pub sleeps: Cell<u32>,
}

impl Timer for RecordingTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        self.sleeps.set(self.sleeps.get() + 1);
        Box::pin(tokio::time::sleep(duration))
    }
}

#[derive(Default)]
pub struct CountingReloader {
    pub reloads: Cell<u32>,
}

impl PageReloader for CountingReloader {
    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }
}

/// Operation that fails its first `failures` calls, then returns the call
/// number.
pub struct FlakyModule {
    pub calls: Cell<u32>,
    failures: u32,
}

impl FlakyModule {
    pub fn failing(failures: u32) -> Self {
        Self {
            calls: Cell::new(0),
            failures,
        }
    }

    pub fn always_failing() -> Self {
        Self::failing(u32::MAX)
    }

    pub fn fetch(&self) -> std::future::Ready<Result<u32, FetchError>> {
        self.calls.set(self.calls.get() + 1);
        let call = self.calls.get();
        std::future::ready(if call <= self.failures {
            Err(FetchError::new(format!("failed to fetch chunk (call {call})")))
        } else {
            Ok(call)
        })
    }
}
