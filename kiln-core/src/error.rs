use thiserror::Error;

/// Loud counterpart to the boolean/`Option` registry surface.
///
/// The primary operations stay silent on a miss (`register` returns `false`,
/// `create` returns `None`); `try_register` and `try_create` report the same
/// conditions as errors for callers that want a message to propagate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no creator registered for key `{0}`")]
    UnknownKey(String),
    #[error("key `{0}` is already registered")]
    DuplicateKey(String),
}
