//! Platform abstraction layer
//!
//! Browser bindings live in `web`: canvas lookup, pointer listeners with
//! clean detach, and the animation frame loop. Native builds drive a
//! [`Table`](crate::Table) directly and need nothing from here.

#[cfg(target_arch = "wasm32")]
pub mod web;
