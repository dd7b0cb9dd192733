//! Shared helpers for integration tests: in-memory fakes for the client and
//! saver capabilities, and a guard for tests that need a local socket.

#![allow(dead_code)]

pub mod fakes;
pub mod socket_guard;
