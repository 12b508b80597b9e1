//! Rejection reasons shared by every mutating operation.

/// Why an operation was refused. Success is `Ok(())`.
///
/// When several reasons apply, parameter problems are reported before
/// emptiness problems, which are reported before rule violations (each
/// operation documents its exact order).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayError {
    /// A cell (or the hand) is empty when it should be occupied, or the
    /// reverse.
    Empty,
    /// Well-formed request that the rules disallow.
    Forbidden,
    /// Malformed or out-of-range input.
    Param,
}

impl std::fmt::Display for PlayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayError::Empty => write!(f, "position or hand is not in the expected empty/occupied state"),
            PlayError::Forbidden => write!(f, "forbidden by the rules"),
            PlayError::Param => write!(f, "invalid parameter"),
        }
    }
}

impl std::error::Error for PlayError {}
