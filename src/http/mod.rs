pub mod requestbody;
pub mod response;
pub mod transport;

// Re-exports for convenience
pub use requestbody::RequestBody;
pub use response::BufferedResponse;
pub use transport::Transport;
