mod error;
mod file;
mod memory;
mod traits;

pub use error::SessionError;
pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
pub use traits::SessionStore;
