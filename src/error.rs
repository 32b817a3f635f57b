use std::collections::TryReserveError;
use std::error;
use std::fmt;
use std::io;
use std::result;

/// An enum representing the ways an operation on a tree or a benchmark run can fail.
///
/// A key that is not present is never an error: lookups and removals report it with `None`.
#[derive(Debug)]
pub enum Error {
    /// Storage for a new node could not be reserved.
    AllocationFailure(TryReserveError),
    /// The tree already holds the maximum number of nodes it was configured with.
    CapacityExceeded(usize),
    IOError(io::Error),
    InvalidArgument(String),
    BenchmarkFailure(String),
}

impl From<TryReserveError> for Error {
    fn from(err: TryReserveError) -> Error {
        Error::AllocationFailure(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IOError(err)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::AllocationFailure(error) => Some(error),
            Error::IOError(error) => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::AllocationFailure(error) => write!(f, "node allocation failed: {}", error),
            Error::CapacityExceeded(limit) => {
                write!(f, "tree is limited to {} nodes", limit)
            },
            Error::IOError(error) => write!(f, "{}", error),
            Error::InvalidArgument(message) => write!(f, "invalid argument: {}", message),
            Error::BenchmarkFailure(message) => write!(f, "benchmark failed: {}", message),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

/// A structural defect found by `validate`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A child does not point back to its parent, or the root has a parent.
    BrokenParentLink,
    /// An in-order traversal produced a decreasing pair.
    OutOfOrder,
    /// The stored balance factor of an avl node differs from the real height difference.
    StaleBalance { stored: i8, actual: isize },
    /// The height difference of an avl node is outside of `-1..=1`.
    Unbalanced { balance: isize },
    RedRoot,
    /// A red node has a red child.
    RedViolation,
    /// Two paths from the same node to an absent child have different black counts.
    BlackHeightMismatch { left: usize, right: usize },
    /// The number of reachable nodes differs from the number of allocated nodes.
    SizeMismatch { reachable: usize, allocated: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvariantViolation::BrokenParentLink => write!(f, "parent link is inconsistent"),
            InvariantViolation::OutOfOrder => write!(f, "in-order sequence is decreasing"),
            InvariantViolation::StaleBalance { stored, actual } => write!(
                f,
                "stored balance {} differs from actual balance {}",
                stored, actual,
            ),
            InvariantViolation::Unbalanced { balance } => {
                write!(f, "node has balance factor {}", balance)
            },
            InvariantViolation::RedRoot => write!(f, "root is red"),
            InvariantViolation::RedViolation => write!(f, "red node has a red child"),
            InvariantViolation::BlackHeightMismatch { left, right } => write!(
                f,
                "black height {} on the left differs from {} on the right",
                left, right,
            ),
            InvariantViolation::SizeMismatch { reachable, allocated } => write!(
                f,
                "{} nodes reachable but {} allocated",
                reachable, allocated,
            ),
        }
    }
}

impl error::Error for InvariantViolation {}
