//! Stage timing for render pipeline logs.
//!
//! Uses `Performance.now()` in the browser and a process-relative
//! `Instant` on native builds.

/// Current high-resolution timestamp in milliseconds.
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub fn now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
pub fn now() -> f64 {
    use std::time::Instant;
    static START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
    let start = START.get_or_init(Instant::now);
    start.elapsed().as_secs_f64() * 1000.0
}

/// Run `f` and log how long it took at `trace` level.
pub fn measure<T, F: FnOnce() -> T>(stage: &'static str, f: F) -> T {
    let start = now();
    let result = f();
    tracing::trace!(stage, elapsed_ms = now() - start, "render stage finished");
    result
}
