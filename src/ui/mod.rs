// LogView - ui/mod.rs
//
// UI layer: presentation only.
// Dependencies: app (state, font observer), core (read-only models), egui.
// Must NOT depend on: platform, direct I/O.

pub mod fonts;
pub mod panels;
pub mod text;
pub mod theme;
pub mod virtual_list;
