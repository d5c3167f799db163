pub mod logger;

pub use logger::SessionLogger;
