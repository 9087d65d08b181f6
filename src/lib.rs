pub mod cli;
pub mod config;
pub mod document;
pub mod i18n;
pub mod localize;
pub mod logging;
pub mod models;
pub mod navigation;
pub mod registry;
pub mod settings;
pub mod state;
pub mod ui;
pub mod viewer;
