mod area_id;
mod attributes;
mod io;
mod layer;

pub use area_id::AreaId;
pub use attributes::AttributeTable;
pub use layer::{Area, AreaLayer};
