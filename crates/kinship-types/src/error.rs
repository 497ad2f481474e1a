//! Validation errors for the shared types.

/// Errors raised when constructing a shared type from untrusted text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypesError {
    /// An identity key was empty after trimming.
    #[error("identity key must not be empty")]
    EmptyKey,

    /// An identity key contained a character reserved by the snapshot format.
    #[error("identity key {key:?} contains reserved character {found:?}")]
    ReservedCharacter {
        /// The rejected key.
        key: String,
        /// The offending character.
        found: char,
    },

    /// An identity key was too long to name its event file.
    #[error("identity key is {len} bytes long, the limit is {max}")]
    KeyTooLong {
        /// Length of the rejected key in bytes.
        len: usize,
        /// The limit.
        max: usize,
    },

    /// A life event was empty after trimming.
    #[error("life event must not be empty")]
    EmptyEvent,

    /// A life event spanned more than one line.
    #[error("life event must fit on a single line")]
    MultilineEvent,

    /// A date of birth did not match `YYYY-MM-DD`.
    #[error("invalid date of birth {value:?}: expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input.
        value: String,
    },
}
