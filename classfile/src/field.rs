//! ```txt
//! FieldInfo {
//!     access_flags: u16,
//!     name_index: u16,
//!     descriptor_index: u16,
//!     attributes_count: u16,
//!     attributes: [AttributeInfo; attributes_count],
//! }
//! ```

use crate::{
    access::FieldAccess,
    attribute::{parse_attribute, Attribute},
    constant::{Constant, ConstantPool, PoolIndex},
    parse::ByteParser,
    DecodeError, DecodeResult,
};

/// A field initializer from a `ConstantValue` attribute, materialized by
/// value for every shape the attribute can carry.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldConstant {
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub access: FieldAccess,
    pub name: String,
    /// The field's type descriptor, verbatim (e.g. `I`, `[Ljava/lang/String;`).
    pub descriptor: String,
    pub constant: Option<FieldConstant>,
}

fn materialize_constant(pool: &ConstantPool, index: PoolIndex) -> DecodeResult<FieldConstant> {
    Ok(match pool.entry(index)? {
        Constant::Integer(value) => FieldConstant::Integer(*value),
        Constant::Long(value) => FieldConstant::Long(*value),
        Constant::Float(value) => FieldConstant::Float(*value),
        Constant::Double(value) => FieldConstant::Double(*value),
        Constant::String(utf8) => FieldConstant::String(pool.utf8(*utf8)?.to_owned()),
        other => {
            return Err(DecodeError::WrongPoolType {
                slot: index,
                expected: "a loadable constant",
                found: other.describe(),
            })
        }
    })
}

pub fn parse_field(input: &mut ByteParser<'_>, pool: &ConstantPool) -> DecodeResult<Field> {
    let access = FieldAccess::from_raw(input.parse_u16()?);
    let name = pool.utf8(input.parse_u16()?)?.to_owned();
    let descriptor = pool.utf8(input.parse_u16()?)?.to_owned();

    let attributes_len = input.parse_u16()? as usize;
    let mut constant = None;
    for _ in 0..attributes_len {
        if let Attribute::ConstantValue(index) = parse_attribute(input, pool)? {
            constant = Some(materialize_constant(pool, index)?);
        }
    }

    Ok(Field {
        access,
        name,
        descriptor,
        constant,
    })
}
