use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn scope_disposed() -> Error {
        Error(ErrorKind::ScopeDisposed.into())
    }

    pub fn pool_disposed() -> Error {
        Error(ErrorKind::PoolDisposed.into())
    }

    pub fn not_owned(address: usize) -> Error {
        Error(ErrorKind::NotOwned { address }.into())
    }

    pub fn insufficient_capacity(requested: usize, available: usize) -> Error {
        Error(
            ErrorKind::InsufficientCapacity {
                requested,
                available,
            }
            .into(),
        )
    }

    pub fn index_out_of_range(index: usize, length: usize) -> Error {
        Error(ErrorKind::IndexOutOfRange { index, length }.into())
    }

    pub fn corruption_detected(address: usize) -> Error {
        Error(ErrorKind::CorruptionDetected { address }.into())
    }

    pub fn unsupported_width(width: usize) -> Error {
        Error(ErrorKind::UnsupportedWidth { width }.into())
    }

    pub fn invalid_tag(tag: u64) -> Error {
        Error(ErrorKind::InvalidTag { tag }.into())
    }

    pub fn capacity_exceeded(requested: usize, capacity: usize) -> Error {
        Error(ErrorKind::CapacityExceeded {
            requested,
            capacity,
        }
        .into())
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("scope is disposed")]
    ScopeDisposed,

    #[error("pool is disposed")]
    PoolDisposed,

    #[error("address {address:#x} is not owned by this allocator")]
    NotOwned { address: usize },

    #[error("insufficient capacity: requested {requested}, available {available}")]
    InsufficientCapacity { requested: usize, available: usize },

    #[error("index {index} out of range (length {length})")]
    IndexOutOfRange { index: usize, length: usize },

    #[error("memory corruption detected around block at {address:#x}")]
    CorruptionDetected { address: usize },

    #[error("unsupported value width: {width} bytes")]
    UnsupportedWidth { width: usize },

    #[error("invalid tag value {tag}")]
    InvalidTag { tag: u64 },

    #[error("capacity exceeded: requested {requested}, capacity {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_roundtrip() {
        let err = Error::not_owned(0x1000);
        assert!(matches!(
            err.kind(),
            ErrorKind::NotOwned { address: 0x1000 }
        ));
        assert!(matches!(
            err.into_kind(),
            ErrorKind::NotOwned { address: 0x1000 }
        ));
    }

    #[test]
    fn test_error_display() {
        let err = Error::insufficient_capacity(8, 3);
        assert_eq!(
            err.to_string(),
            "insufficient capacity: requested 8, available 3"
        );
        let err = Error::unsupported_width(3);
        assert_eq!(err.to_string(), "unsupported value width: 3 bytes");
    }
}
