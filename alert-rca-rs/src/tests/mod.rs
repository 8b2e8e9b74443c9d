//! Unit tests for the RCA crate
//!
//! Service interactions are exercised against WireMock servers.
