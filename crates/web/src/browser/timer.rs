//! `setTimeout`-backed [`Timer`].

use std::time::Duration;

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use consolekit_loader::{LocalBoxFuture, Timer};

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimer;

impl Timer for BrowserTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let ms = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);

        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let scheduled = web_sys::window().map(|w| {
                w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                    .is_ok()
            });
            if scheduled != Some(true) {
                // No event loop timer available; resolve right away.
                let _ = resolve.call0(&JsValue::NULL);
            }
        });

        // The pending timeout still fires after the future is dropped, but it
        // only resolves a promise nobody is waiting on.
        Box::pin(async move {
            let _ = JsFuture::from(promise).await;
        })
    }
}
