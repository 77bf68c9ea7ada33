mod component;
mod dialogs;
mod render;
pub mod simulation;
mod state;
mod types;
pub mod units;

pub use component::NetworkGraph;
pub use types::{Dataset, Letter, Person, Relationship};
pub use units::Dimension;
