pub mod access;
pub mod attribute;
pub mod class;
pub mod constant;
pub mod field;
pub mod format;
pub mod method;
mod mutf8;
pub mod parse;

pub use crate::class::{parse_class, Class, ClassStatus, Version};
pub use crate::constant::{Constant, ConstantPool, PoolIndex};
pub use crate::parse::{ByteParser, ParseError};

use thiserror::Error;

pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors raised while turning raw class-file bytes into a [`Class`].
///
/// Every variant means the class being decoded is unusable; the caller
/// decides whether that aborts one load or the whole program. `Internal` is
/// the exception: it marks a state this crate asserts cannot be reached from
/// any input, and points at a bug here rather than in the class file.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum DecodeError {
    #[error("class file ends early, {0} more bytes needed")]
    Truncated(usize),
    #[error("bad magic number: 0x{0:08X}")]
    BadMagic(u32),
    #[error("unsupported class file version {0}.{1}")]
    UnsupportedVersion(u16, u16),
    #[error("declared constant pool count {0} is below the minimum of 2")]
    PoolCountTooSmall(u16),
    #[error("unknown constant tag {tag} in pool slot {slot}")]
    UnknownConstantTag { slot: u16, tag: u8 },
    #[error("unknown method handle kind {kind} in pool slot {slot}")]
    UnknownMethodHandleKind { slot: u16, kind: u8 },
    #[error("wide constant in pool slot {0} overruns the declared pool count")]
    BadWideEntry(u16),
    #[error("pool slot {slot}: invalid modified UTF-8 byte 0x{byte:02X} at offset {offset}")]
    InvalidUtf8 { slot: u16, offset: usize, byte: u8 },
    #[error("constant pool index {0} does not address a usable entry")]
    BadPoolIndex(u16),
    #[error("constant pool index {slot} holds {found}, expected {expected}")]
    WrongPoolType {
        slot: u16,
        expected: &'static str,
        found: &'static str,
    },
    #[error("pool slot {slot}: {entry} points at slot {target} holding {found}, expected {expected}")]
    BadReference {
        slot: u16,
        entry: &'static str,
        target: u16,
        expected: &'static str,
        found: &'static str,
    },
    #[error("pool slot {slot}: method reference is named {name:?}; `<`-names other than <init> are forbidden")]
    BadRefName { slot: u16, name: String },
    #[error("pool slot {slot}: {entry} requires class file version {needs} or later")]
    VersionGated {
        slot: u16,
        entry: &'static str,
        needs: u16,
    },
    #[error("attribute {name} does not fill its declared {declared} bytes")]
    BadAttributeLength { name: String, declared: u32 },
    #[error("bootstrap method table is empty")]
    EmptyBootstrapTable,
    #[error("{0} trailing bytes after the last class attribute")]
    TrailingBytes(usize),
    #[error("internal decoder invariant violated: {0}")]
    Internal(&'static str),
}

impl From<ParseError> for DecodeError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Incomplete(needed) => DecodeError::Truncated(needed),
        }
    }
}

/// Format-checker violations: the bytes decoded cleanly, but the decoded
/// structure breaks a structural rule of the JVM specification.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum VerificationError {
    #[error("method {method} in {class} sets more than one of public/private/protected")]
    VisibilityConflict { class: String, method: String },
    #[error("interface method {method} in {class} must not be {flag}")]
    BadInterfaceMethodFlag {
        class: String,
        method: String,
        flag: &'static str,
    },
    #[error("abstract method {method} in {class} must not be {flag}")]
    BadAbstractMethodFlag {
        class: String,
        method: String,
        flag: &'static str,
    },
    #[error("<clinit> in {class} must be static in class files of version 51 or later")]
    NonStaticClinit { class: String },
    #[error("method {method} in {class} holds {actual} code bytes but declares {declared}")]
    CodeLengthMismatch {
        class: String,
        method: String,
        declared: u32,
        actual: usize,
    },
    #[error("method {method} in {class} declares {declared} code bytes, over the 65535 limit")]
    CodeTooLong {
        class: String,
        method: String,
        declared: u32,
    },
    #[error("method {method} in {class}: exception handler range {start_pc}..{end_pc} exceeds the code length")]
    BadHandlerRange {
        class: String,
        method: String,
        start_pc: u16,
        end_pc: u16,
    },
    #[error("method {method} in {class}: handler pc {handler_pc} is past the last code index")]
    BadHandlerPc {
        class: String,
        method: String,
        handler_pc: u16,
    },
    #[error("method {method} in {class}: catch type {index} is not a class entry")]
    BadCatchType {
        class: String,
        method: String,
        index: u16,
    },
}
