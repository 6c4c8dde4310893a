//! Integration tests for the snapshot tree

mod concurrent_writes;
mod properties;
mod session_lifecycle;
mod support;
