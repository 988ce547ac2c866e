// linkfolio shared type definitions
// Each submodule defines types used across the crate.

pub mod errors;
pub mod folder;
pub mod link;
pub mod settings;
pub mod view;
