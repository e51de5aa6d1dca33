//! Data module
//!
//! Row/value types, value comparison, the JSON loader and the sortable,
//! pinnable view over a dataset.

pub mod data_view;
pub mod datatable;
pub mod datavalue_compare;
pub mod json_loader;
