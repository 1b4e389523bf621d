// LogView - ui/panels/mod.rs

pub mod controls;
pub mod detail;
pub mod fields;
pub mod list_view;
pub mod logs_table;
pub mod raw_view;
pub mod table_view;
