//! ```txt
//! MethodInfo {
//!     access_flags: u16,
//!     name_index: u16,
//!     descriptor_index: u16,
//!     attributes_count: u16,
//!     attributes: [AttributeInfo; attributes_count],
//! }
//! ```
//!
//! The `Code` attribute is flattened into the method itself: max stack, max
//! locals, the code bytes and the exception table are direct method state,
//! since that is how every consumer reads them. A method without code (an
//! abstract or native one) keeps the empty defaults.

use crate::{
    access::MethodAccess,
    attribute::{parse_attribute, Attribute, ExceptionHandler, LineNumber, MethodParameter},
    constant::{ConstantPool, PoolIndex},
    parse::ByteParser,
    DecodeResult,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Method {
    pub access: MethodAccess,
    pub name: String,
    /// The method's signature descriptor, verbatim (e.g. `(I)V`).
    pub descriptor: String,

    pub max_stack: u16,
    pub max_locals: u16,
    /// The code length declared by the Code attribute; the format checker
    /// compares it against `code.len()`.
    pub declared_code_length: u32,
    pub code: Box<[u8]>,
    pub exception_table: Box<[ExceptionHandler]>,
    pub line_numbers: Box<[LineNumber]>,

    pub parameters: Box<[MethodParameter]>,
    /// Checked exceptions from the Exceptions attribute, as pool indices.
    pub thrown_exceptions: Box<[PoolIndex]>,

    pub is_deprecated: bool,
    pub is_synthetic: bool,
}

pub fn parse_method(input: &mut ByteParser<'_>, pool: &ConstantPool) -> DecodeResult<Method> {
    let access = MethodAccess::from_raw(input.parse_u16()?);
    let name = pool.utf8(input.parse_u16()?)?.to_owned();
    let descriptor = pool.utf8(input.parse_u16()?)?.to_owned();

    let mut method = Method {
        access,
        name,
        descriptor,
        max_stack: 0,
        max_locals: 0,
        declared_code_length: 0,
        code: Box::default(),
        exception_table: Box::default(),
        line_numbers: Box::default(),
        parameters: Box::default(),
        thrown_exceptions: Box::default(),
        is_deprecated: false,
        is_synthetic: false,
    };

    let attributes_len = input.parse_u16()? as usize;
    for _ in 0..attributes_len {
        match parse_attribute(input, pool)? {
            Attribute::Code(code) => {
                method.max_stack = code.max_stack;
                method.max_locals = code.max_locals;
                method.declared_code_length = code.declared_length;
                method.code = code.code;
                method.exception_table = code.exception_table;
                method.line_numbers = code.line_numbers;
            }
            Attribute::Exceptions(indices) => method.thrown_exceptions = indices,
            Attribute::MethodParameters(params) => method.parameters = params,
            Attribute::Deprecated => method.is_deprecated = true,
            Attribute::Synthetic => method.is_synthetic = true,
            // anything else was already skipped by its declared length
            _ => {}
        }
    }

    Ok(method)
}
