//! FFI crate exposing copyloom core to the Flutter shell.

pub mod api;
