// Library target exists so the integration tests can drive the app against a
// mock provider. The binary entry point is main.rs; this file re-declares the
// module tree. Most code is only exercised through the binary, so suppress
// dead_code warnings.
#![allow(dead_code)]

pub mod app;
pub mod catalog;
pub mod client;
pub mod config;
pub mod event;
pub mod session;
pub mod ui;
