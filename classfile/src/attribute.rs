//! # Attribute decoding
//!
//! Every attribute opens the same way: a pool index naming it, then the byte
//! length of the payload that follows.
//!
//! ```txt
//! AttributeInfo {
//!     name_index: u16,
//!     length: u32,
//!     info: [u8; length],
//! }
//! ```
//!
//! Only the attributes this front end acts on are decoded: `SourceFile` and
//! `BootstrapMethods` at class level; `Code`, `Exceptions`,
//! `MethodParameters`, `Deprecated` and `Synthetic` on methods;
//! `ConstantValue` on fields; `LineNumberTable` nested inside `Code`.
//! Everything else is skipped by its declared length, which is also why an
//! unknown name is never an error: the length makes the skip exact.
//!
//! Each decoder is bounded by the declared length. A decoder that does not
//! land exactly on the declared end has hit a malformed attribute, and the
//! mismatch is fatal: continuing from a misplaced cursor would misread
//! everything after it.

use crate::{
    constant::{ConstantPool, PoolIndex},
    parse::{ByteParser, ParseResult},
    DecodeError, DecodeResult,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Attribute {
    /// An attribute this front end does not interpret, carried as raw bytes.
    Other(Box<[u8]>),

    /// The value of a constant field, as a pool index. The field extractor
    /// materializes it according to the entry it points at.
    ConstantValue(PoolIndex),

    /// Bytecode and its tables for one method.
    Code(Code),

    /// Checked exceptions a method declares, as class-constant pool indices.
    /// The indices are recorded verbatim; names are not resolved here.
    Exceptions(Box<[PoolIndex]>),

    /// Formal parameter names and masks, in declaration order.
    MethodParameters(Box<[MethodParameter]>),

    /// Marks the item as deprecated. Carries no payload.
    Deprecated,

    /// Marks the item as compiler-generated. Carries no payload.
    Synthetic,

    /// Pool index of the utf8 entry naming the source file.
    SourceFile(PoolIndex),

    /// Bootstrap methods for dynamically computed call sites and constants.
    BootstrapMethods(Box<[BootstrapMethod]>),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ExceptionHandler {
    /// First instruction covered by this handler.
    pub start_pc: u16,
    /// One past the last instruction covered.
    pub end_pc: u16,
    /// Where the handler's code starts.
    pub handler_pc: u16,
    /// Class constant of the caught type; 0 catches everything.
    pub catch_type: PoolIndex,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct LineNumber {
    pub start_pc: u16,
    pub line: u16,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct MethodParameter {
    /// Resolved parameter name; empty for an anonymous parameter (name
    /// index 0 in the class file).
    pub name: String,
    pub access: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Code {
    pub max_stack: u16,
    pub max_locals: u16,
    /// The code length the attribute declared. Kept alongside the bytes so
    /// the format checker can cross-check the two.
    pub declared_length: u32,
    pub code: Box<[u8]>,
    pub exception_table: Box<[ExceptionHandler]>,
    pub line_numbers: Box<[LineNumber]>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct BootstrapMethod {
    /// Pool index of the method handle to invoke.
    pub method_ref: PoolIndex,
    /// Pool indices of the static arguments, in order.
    pub arguments: Box<[PoolIndex]>,
}

fn parse_exception_handler(input: &mut ByteParser<'_>) -> ParseResult<ExceptionHandler> {
    Ok(ExceptionHandler {
        start_pc: input.parse_u16()?,
        end_pc: input.parse_u16()?,
        handler_pc: input.parse_u16()?,
        catch_type: input.parse_u16()?,
    })
}

// LineNumberTable {
//     line_number_table_length: u16,
//     { start_pc: u16, line_number: u16 } [line_number_table_length],
// }
fn parse_line_number_table(input: &mut ByteParser<'_>) -> ParseResult<Vec<LineNumber>> {
    let len = input.parse_u16()? as usize;
    input.seq(len, |input| {
        Ok(LineNumber {
            start_pc: input.parse_u16()?,
            line: input.parse_u16()?,
        })
    })
}

// Code {
//     max_stack: u16,
//     max_locals: u16,
//     code_length: u32,
//     code: [u8; code_length],
//     exception_table_length: u16,
//     exception_table: [ExceptionHandler; exception_table_length],
//     attributes_count: u16,
//     attributes: [AttributeInfo; attributes_count],
// }
pub fn parse_code(input: &mut ByteParser<'_>, pool: &ConstantPool) -> DecodeResult<Code> {
    let max_stack = input.parse_u16()?;
    let max_locals = input.parse_u16()?;
    let declared_length = input.parse_u32()?;
    let code = input.take(declared_length as usize)?;

    let exceptions_len = input.parse_u16()? as usize;
    let exception_table = input.seq(exceptions_len, parse_exception_handler)?;

    // Of the nested attributes only LineNumberTable is decoded. The others
    // are skipped by their declared length and scanning continues, so a
    // StackMapTable ahead of a LineNumberTable does not hide it.
    let nested_len = input.parse_u16()? as usize;
    let mut line_numbers = Vec::new();
    for _ in 0..nested_len {
        let name_index = input.parse_u16()?;
        let declared = input.parse_u32()?;
        let end = input.offset + declared as usize;
        match pool.utf8(name_index)? {
            "LineNumberTable" => line_numbers.extend(parse_line_number_table(input)?),
            other => {
                tracing::debug!("skipping code attribute {} ({} bytes)", other, declared);
                input.skip(declared as usize)?;
            }
        }
        if input.offset != end {
            return Err(DecodeError::BadAttributeLength {
                name: pool.utf8(name_index)?.to_owned(),
                declared,
            });
        }
    }

    Ok(Code {
        max_stack,
        max_locals,
        declared_length,
        code: code.into(),
        exception_table: exception_table.into(),
        line_numbers: line_numbers.into(),
    })
}

// Exceptions {
//     number_of_exceptions: u16,
//     exception_index_table: [u16; number_of_exceptions],
// }
fn parse_exceptions(input: &mut ByteParser<'_>) -> DecodeResult<Box<[PoolIndex]>> {
    let len = input.parse_u16()? as usize;
    Ok(input.seq(len, |input| input.parse_u16())?.into())
}

// MethodParameters {
//     parameters_count: u8,
//     { name_index: u16, access_flags: u16 } [parameters_count],
// }
fn parse_method_parameters(
    input: &mut ByteParser<'_>,
    pool: &ConstantPool,
) -> DecodeResult<Box<[MethodParameter]>> {
    let len = input.parse_u8()? as usize;
    let params = input.seq(len, |input| {
        let name_index = input.parse_u16()?;
        let name = if name_index == 0 {
            String::new()
        } else {
            pool.utf8(name_index)?.to_owned()
        };
        Ok::<_, DecodeError>(MethodParameter {
            name,
            access: input.parse_u16()?,
        })
    })?;
    Ok(params.into())
}

// BootstrapMethods {
//     num_bootstrap_methods: u16,
//     {
//         bootstrap_method_ref: u16,
//         num_bootstrap_arguments: u16,
//         bootstrap_arguments: [u16; num_bootstrap_arguments],
//     } [num_bootstrap_methods],
// }
fn parse_bootstrap_methods(input: &mut ByteParser<'_>) -> DecodeResult<Box<[BootstrapMethod]>> {
    let len = input.parse_u16()? as usize;
    if len == 0 {
        // a class only carries this attribute when something refers into it
        return Err(DecodeError::EmptyBootstrapTable);
    }

    let methods = input.seq(len, |input| {
        let method_ref = input.parse_u16()?;
        if method_ref == 0 {
            return Err(DecodeError::BadPoolIndex(0));
        }
        let args_len = input.parse_u16()? as usize;
        let arguments = input.seq(args_len, |input| input.parse_u16())?;
        Ok(BootstrapMethod {
            method_ref,
            arguments: arguments.into(),
        })
    })?;
    Ok(methods.into())
}

/// Decodes one attribute at the cursor, dispatching on its name. The cursor
/// always lands exactly `length` bytes past the header, whether the
/// attribute was interpreted or skipped.
pub fn parse_attribute(input: &mut ByteParser<'_>, pool: &ConstantPool) -> DecodeResult<Attribute> {
    let name_index = input.parse_u16()?;
    let declared = input.parse_u32()?;
    let end = input.offset + declared as usize;

    let attr = match pool.utf8(name_index)? {
        "ConstantValue" => Attribute::ConstantValue(input.parse_u16()?),
        "Code" => Attribute::Code(parse_code(input, pool)?),
        "Exceptions" => Attribute::Exceptions(parse_exceptions(input)?),
        "MethodParameters" => Attribute::MethodParameters(parse_method_parameters(input, pool)?),
        "Deprecated" => Attribute::Deprecated,
        "Synthetic" => Attribute::Synthetic,
        "SourceFile" => Attribute::SourceFile(input.parse_u16()?),
        "BootstrapMethods" => Attribute::BootstrapMethods(parse_bootstrap_methods(input)?),
        other => {
            tracing::debug!("skipping attribute {} ({} bytes)", other, declared);
            Attribute::Other(input.take(declared as usize)?.into())
        }
    };

    if input.offset != end {
        return Err(DecodeError::BadAttributeLength {
            name: pool.utf8(name_index)?.to_owned(),
            declared,
        });
    }

    Ok(attr)
}
