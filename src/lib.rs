// Library surface for headless/integration tests and reuse.
// Keep this lean; terminal setup and CLI parsing stay in main.rs.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod editor;
pub mod engine;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod seed;
pub mod session;
pub mod summary;
pub mod ui;
pub mod util;
