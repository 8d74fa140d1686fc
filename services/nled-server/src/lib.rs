//! The network-facing half of nled: the command dispatcher, the five
//! command handlers, and the single-client TCP server.

pub mod command;
pub mod dispatcher;
pub mod error;
pub mod server;

pub use error::CommandError;
pub use server::TcpServer;
