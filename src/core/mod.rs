// LogView - core/mod.rs
//
// Core logic layer: data model, store, parsing and the pure render
// selection used by the logs view.
// Must NOT depend on: ui, platform, app, or egui.

pub mod dispatch;
pub mod model;
pub mod parser;
pub mod presentation;
pub mod store;
pub mod virtualize;
