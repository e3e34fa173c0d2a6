/// All errors that can be returned by a SessionStore implementation.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The backing storage could not be read or written.
    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted record exists but does not parse as the expected shape.
    #[error("corrupt session record '{key}': {message}")]
    Corrupt { key: String, message: String },

    /// A store lock was poisoned by a panicking writer.
    #[error("session store lock poisoned")]
    LockPoisoned,
}
