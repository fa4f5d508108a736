//! Dynamic `import()` of a JS chunk.

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use consolekit_loader::FetchError;

/// Fetch and evaluate the module at `specifier`, resolving to its namespace.
///
/// A chunk removed by a newer deployment rejects here like any other fetch
/// failure.
pub async fn dynamic_import(specifier: &str) -> Result<JsValue, FetchError> {
    let import = js_sys::Function::new_with_args("specifier", "return import(specifier)");
    let promise = import
        .call1(&JsValue::NULL, &JsValue::from_str(specifier))
        .map_err(|e| js_fetch_error(specifier, e))?;

    JsFuture::from(js_sys::Promise::from(promise))
        .await
        .map_err(|e| js_fetch_error(specifier, e))
}

fn js_fetch_error(specifier: &str, err: JsValue) -> FetchError {
    FetchError::new(format!("import({specifier}) failed: {err:?}"))
}
