pub(crate) const DEFAULT_USER_AGENT: &str = concat!("reqgauge/", env!("CARGO_PKG_VERSION"));

/// Requests kept in flight when `-c` is not given.
pub(super) const DEFAULT_CONCURRENCY: &str = "5";
/// Total requests issued when `-r` is not given.
pub(super) const DEFAULT_REPETITIONS: &str = "300";
pub(super) const DEFAULT_REQUEST_TIMEOUT: &str = "30s";
pub(super) const DEFAULT_CONNECT_TIMEOUT: &str = "10s";
