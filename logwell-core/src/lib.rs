pub mod cli;
pub mod conf;
pub mod decode;
pub mod logging;
pub mod registry;
pub mod server;
pub mod sink;
