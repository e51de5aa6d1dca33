//! Terminal presentation: cell policy, column helpers and the table renderer

pub mod cell_renderer;
pub mod column_utils;
pub mod table_renderer;
