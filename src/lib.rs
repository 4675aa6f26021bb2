pub mod cli;
pub mod client;
pub mod model;
pub mod server;
pub mod store;
pub mod tui;
pub mod util;
