pub mod creation;
pub mod parametrics;
pub mod query;
