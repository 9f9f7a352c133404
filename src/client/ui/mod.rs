//! Terminal UI rendering for the client.

mod quiz;
mod render;

pub use render::render;
