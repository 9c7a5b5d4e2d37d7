pub mod bucket;
pub mod category;
pub mod date_range;
pub mod entity;
pub mod entity_filter;
pub mod filter;
pub mod item;
pub mod placement;
pub mod temporal;
