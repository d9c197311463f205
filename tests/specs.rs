//! Behavioral specifications for the Plotline pipeline.
//!
//! These tests are black-box: they spawn a real worker behind a fake
//! HTTP adapter and drive it through the public manager API.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/dispatch.rs"]
mod dispatch;
#[path = "specs/guards.rs"]
mod guards;
#[path = "specs/transforms.rs"]
mod transforms;
