/* 📖 # What is the Host abstraction?

The Host trait stands in for the editor that runs docpeek: it answers which file
is active, which workspace folder a file belongs to, lists directories, shows
messages and opens previews. Code depends on the trait, not on a concrete host:
- RealHost: real filesystem, terminal messages and the system viewer
- MockHost: in-memory tree with recorded messages and previews for tests
*/

pub mod mock;
pub mod real_host;
mod traits;

pub use mock::{HostMessage, MockHost};
pub use real_host::RealHost;
pub use traits::{DirectoryEntry, EntryKind, Host, HostHandle, innermost_folder, normalize_path};
