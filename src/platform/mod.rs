//! Platform bindings
//!
//! Browser glue lives in `web` (wasm32 only). Native builds drive
//! `GameSession` directly.

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Seed for a new run when none is configured
#[cfg(target_arch = "wasm32")]
pub fn fresh_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Seed for a new run when none is configured
#[cfg(not(target_arch = "wasm32"))]
pub fn fresh_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
