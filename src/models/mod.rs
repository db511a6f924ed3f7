pub mod media_item;
pub mod placement;
pub mod row_model;

pub use media_item::*;
pub use placement::*;
pub use row_model::*;
