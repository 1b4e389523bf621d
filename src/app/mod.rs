// LogView - app/mod.rs
//
// Application layer: state, background workers (ingest, live tail, font
// lookup) and their lifecycles.
// Dependencies: core, platform.
// Must NOT depend on: ui.

pub mod font_watch;
pub mod ingest;
pub mod state;
pub mod tail;
