// linkfolio hierarchy engine
// Entity store, tree navigation, mutations, and derived views.

pub mod entity_store;
pub mod mutation_engine;
pub mod tree_navigator;
pub mod view_composer;
