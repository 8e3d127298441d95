//! Reusable template components.

pub mod data_table;

pub use data_table::{DataTable, FilterOption, FormModal, Pager, TableRow, list_href};
