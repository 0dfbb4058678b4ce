//! Liveness probe.

/// Returns "ok" whenever the process can answer HTTP. Does not touch the
/// records service or the store.
pub async fn health() -> &'static str {
    "ok"
}
