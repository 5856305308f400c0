use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BiMapError {
    /// `try_put` was asked to bind a value that already belongs to another key.
    #[error("value is already bound to the key at position {position}")]
    ValueCollision { position: usize },

    #[error("iterator advanced past its end")]
    IteratorExhausted,

    #[error("duplicate key at position {0}")]
    DuplicateKey(usize),

    #[error("duplicate value at position {0}")]
    DuplicateValue(usize),
}

#[test]
fn test_error_messages() {
    assert_eq!(
        BiMapError::ValueCollision { position: 3 }.to_string(),
        "value is already bound to the key at position 3"
    );
    assert_eq!(
        BiMapError::IteratorExhausted.to_string(),
        "iterator advanced past its end"
    );
    assert_eq!(BiMapError::DuplicateValue(1).to_string(), "duplicate value at position 1");
}
