//! Tracing/logging setup shared by binaries and tests.

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Initialize process-wide tracing with the default `info` filter.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::DEFAULT_FILTER);
}

/// Like [`init`], but with a caller-chosen fallback filter for when
/// `RUST_LOG` is unset (e.g. `"topology_infra=debug"` in tests).
pub fn init_with_default(filter: &str) {
    tracing::init(filter);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
        init_with_default("debug");
    }
}
