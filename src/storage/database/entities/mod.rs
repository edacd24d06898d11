//! SeaORM entity definitions

pub mod task;

pub use task::Entity as TaskEntity;
