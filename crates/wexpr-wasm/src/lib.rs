//! WASM bindings for wexpr-core.
//!
//! Exposes `encode` and `decode` as `#[wasm_bindgen]` functions that can be
//! called from JavaScript/TypeScript, exchanging documents as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p wexpr-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/wexpr_wasm.wasm
//! ```

use wasm_bindgen::prelude::*;
use wexpr_core::json;

/// Encode a JSON string as a Wexpr document.
///
/// Returns the Wexpr text, or throws a JS error if the input is not valid
/// JSON or cannot be encoded.
#[wasm_bindgen]
pub fn encode(json_text: &str) -> Result<String, JsValue> {
    let parsed: serde_json::Value =
        serde_json::from_str(json_text).map_err(|e| JsValue::from_str(&e.to_string()))?;
    wexpr_core::encode(&json::from_json(&parsed)).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decode a Wexpr document into a compact JSON string.
///
/// Returns the JSON string, or throws a JS error if the input is not valid
/// Wexpr.
#[wasm_bindgen]
pub fn decode(text: &str) -> Result<String, JsValue> {
    let value = wexpr_core::decode(text).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&json::to_json(&value)).map_err(|e| JsValue::from_str(&e.to_string()))
}
