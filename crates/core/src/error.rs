/// Local validation errors raised before any request leaves the client.
///
/// These are precondition failures: they are never retried and never
/// carry a server detail message, because no network call was made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A liquidation report was addressed without its category code.
    #[error("liquidation reports require a category code")]
    MissingCategory,

    /// Month outside 1..=12.
    #[error("invalid month: {month} (expected 1-12)")]
    InvalidMonth { month: u8 },

    /// A string did not parse as a known report kind.
    #[error("unknown report kind: '{value}'")]
    UnknownKind { value: String },

    /// A string did not parse as a known report status.
    #[error("unknown report status: '{value}'")]
    UnknownStatus { value: String },
}
