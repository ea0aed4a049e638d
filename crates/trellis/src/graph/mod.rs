//! Graph model, visibility resolution, and query index

mod index;
mod model;
mod visibility;

pub use index::*;
pub use model::*;
pub use visibility::*;
