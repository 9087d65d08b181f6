pub mod app;
pub mod board;
pub mod chrome;
pub mod windows;
