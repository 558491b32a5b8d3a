//! Ordered containers used by the record stores

pub mod ordered_list;

pub use ordered_list::{Iter, RecordList};
