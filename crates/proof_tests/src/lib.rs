//! Empty crate root; this package exists to host `tests/` integration
//! suites that exercise `proof-kernel` and `proof-search` together.
