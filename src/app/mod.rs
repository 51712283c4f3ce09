// Application layer: pipelines, rendering and command dispatch.
#[cfg(feature = "cli")]
pub mod commands;
pub mod pipelines;
pub mod render;
