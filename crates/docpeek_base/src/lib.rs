/* 📖 # Why have docpeek_base as a core library?
docpeek_base provides the error type, tracing setup and the host abstraction used
by the engine and the command line. Keeping them here prevents circular
dependencies between crates.
*/

pub mod error;
mod error_tests;
pub mod host;
pub mod tracing;

// Re-export commonly used types for convenience
pub use error::{DocpeekError, DocpeekResult, ErrorKind, ResultExt};
pub use host::{
    DirectoryEntry, EntryKind, Host, HostHandle, MockHost, RealHost, normalize_path,
};
