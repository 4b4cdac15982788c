use thiserror::Error;

/// An exception raised by host code during an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{type_name}: {message}")]
pub struct HostException {
    pub type_name: String,
    pub message: String,
}

impl HostException {
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}

/// Failure to read, write, invoke or construct through a resolved member.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AccessError {
    #[error("cannot access instance member `{member}` through a null target")]
    NullTarget { member: String },
    #[error("target of type `{actual}` is not an instance of `{expected}`")]
    WrongInstance { expected: String, actual: String },
    #[error("illegal access to `{member}`: {reason}")]
    IllegalAccess { member: String, reason: String },
    #[error("`{member}` takes {expected} argument(s) but {actual} were supplied")]
    ArgumentCount {
        member: String,
        expected: usize,
        actual: usize,
    },
    #[error("argument {index} of `{member}` must be `{expected}`, got {actual}")]
    ArgumentType {
        member: String,
        index: usize,
        expected: String,
        actual: String,
    },
    #[error("cannot instantiate `{type_name}`: {reason}")]
    Instantiation { type_name: String, reason: String },
    #[error("`{member}` has no implementation bound")]
    NoBody { member: String },
    #[error("host code threw {0}")]
    Thrown(#[from] HostException),
    #[error("value transform failed: {0}")]
    Transform(String),
    #[error("unknown member {0}")]
    UnknownMember(String),
}
