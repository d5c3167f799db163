pub mod control;
pub mod data_socket;
pub mod error;
pub mod network;
pub mod pasv;
pub mod port;

pub use control::ControlStream;
pub use data_socket::{DataSocket, RetryPolicy};
pub use error::DataSocketError;
pub use pasv::PassiveSocket;
pub use port::ActiveSocket;
