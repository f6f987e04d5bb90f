//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT/Ctrl+C → trigger graceful shutdown
//!
//! Shutdown (shutdown.rs):
//!     signal received → stop accepting → drain background warming → exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
