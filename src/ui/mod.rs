/// UI module exports

mod components;
mod newtab;
mod settings_panel;

pub use newtab::NewTab;
