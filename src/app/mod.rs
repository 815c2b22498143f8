// Application layer: developer workflows built on top of the servers.

pub mod clean;
pub mod dev;
pub mod probe;

pub use probe::Probe;
