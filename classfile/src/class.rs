//! # Class file binary format
//!
//! All numbers in this format are big-endian.
//!
//! ```txt
//! ClassFile {
//!     // 0xCAFEBABE
//!     magic: u32,
//!     minor_version: u16,
//!     major_version: u16,
//!
//!     constant_pool_count: u16,
//!     constant_pool: [Constant; constant_pool_count - 1],
//!
//!     access_flags: u16,
//!     this_class: u16,
//!     super_class: u16,
//!
//!     interfaces_count: u16,
//!     interfaces: [u16; interfaces_count],
//!
//!     fields_count: u16,
//!     fields: [FieldInfo; fields_count],
//!
//!     methods_count: u16,
//!     methods: [MethodInfo; methods_count],
//!
//!     attributes_count: u16,
//!     attributes: [AttributeInfo; attributes_count],
//! }
//! ```
//!
//! Decoding is one strictly forward pass over one cursor. The constant pool
//! is loaded and cross-reference verified before anything downstream of it
//! resolves a name through it.

use crate::{
    access::ClassAccess,
    attribute::{parse_attribute, Attribute, BootstrapMethod},
    constant::{parse_constant_pool, verify_pool, ConstantPool},
    field::{parse_field, Field},
    method::{parse_method, Method},
    parse::ByteParser,
    DecodeError, DecodeResult,
};

/// The class file magic: `0xCAFEBABE`.
pub const CLASS_MAGIC: u32 = 0xCAFE_BABE;

/// The newest class file major version this front end accepts (Java 11).
pub const MAX_SUPPORTED_MAJOR: u16 = 55;

/// The one class that legitimately has no superclass.
pub const JAVA_LANG_OBJECT: &str = "java/lang/Object";

/// Class file version, ordered lexicographically by (major, minor).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
}

/// Where a class stands in its load lifecycle. Transitions only ever move
/// forward. This pipeline produces `PrelimVerified` (header checks passed)
/// and `Checked` (format check passed); the later states belong to the
/// surrounding runtime's linking machinery.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ClassStatus {
    NotVerified,
    PrelimVerified,
    Checked,
    Verified,
    Linked,
    Prepared,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Class {
    /// Where the bytes came from, for diagnostics.
    pub path: String,
    /// The raw class file, untouched after loading.
    pub bytes: Box<[u8]>,

    pub version: Version,
    pub pool: ConstantPool,
    pub access: ClassAccess,

    /// Internal-form name, e.g. `java/lang/String`.
    pub name: String,
    /// Internal-form superclass name; empty exactly when this class is
    /// `java/lang/Object`.
    pub super_name: String,
    pub interfaces: Box<[String]>,

    pub fields: Box<[Field]>,
    pub methods: Box<[Method]>,

    pub source_file: Option<String>,
    pub bootstrap_methods: Box<[BootstrapMethod]>,

    pub status: ClassStatus,
}

impl Class {
    pub fn parse(path: &str, bytes: Vec<u8>) -> DecodeResult<Class> {
        parse_class(path, bytes)
    }
}

fn parse_version(input: &mut ByteParser<'_>) -> DecodeResult<Version> {
    let minor = input.parse_u16()?;
    let major = input.parse_u16()?;
    Ok(Version { major, minor })
}

/// Decodes a whole class file. On success the class has reached
/// [`ClassStatus::PrelimVerified`]: magic and version were checked and the
/// constant pool is loaded and verified. The format check is a separate,
/// policy-gated pass (see `format`).
pub fn parse_class(path: &str, bytes: Vec<u8>) -> DecodeResult<Class> {
    let mut input = ByteParser::new(&bytes);

    let magic = input.parse_u32()?;
    if magic != CLASS_MAGIC {
        return Err(DecodeError::BadMagic(magic));
    }

    // The version gate runs before the pool count is even read; nothing of
    // an unsupported file is decoded.
    let version = parse_version(&mut input)?;
    if version.major > MAX_SUPPORTED_MAJOR {
        return Err(DecodeError::UnsupportedVersion(version.major, version.minor));
    }

    let pool = parse_constant_pool(&mut input)?;
    verify_pool(&pool, version)?;

    let access = ClassAccess::from_raw(input.parse_u16()?);

    let this_index = input.parse_u16()?;
    let name = pool.class_name(this_index)?.to_owned();

    let super_index = input.parse_u16()?;
    let super_name = if name == JAVA_LANG_OBJECT {
        String::new()
    } else {
        pool.class_name(super_index)?.to_owned()
    };

    // A bad interface index is logged and skipped rather than failing the
    // whole class; the list keeps its file order otherwise.
    let interfaces_len = input.parse_u16()? as usize;
    let mut interfaces = Vec::with_capacity(interfaces_len);
    for _ in 0..interfaces_len {
        let index = input.parse_u16()?;
        match pool.class_name(index) {
            Ok(interface) => interfaces.push(interface.to_owned()),
            Err(err) => {
                tracing::warn!("{}: skipping interface entry {}: {}", name, index, err);
            }
        }
    }

    let fields_len = input.parse_u16()? as usize;
    let fields = input.seq(fields_len, |input| parse_field(input, &pool))?;

    let methods_len = input.parse_u16()? as usize;
    let methods = input.seq(methods_len, |input| parse_method(input, &pool))?;
    tracing::debug!(
        "{}: {} fields, {} methods",
        name,
        fields.len(),
        methods.len()
    );

    let mut source_file = None;
    let mut bootstrap_methods = Vec::new();
    let attributes_len = input.parse_u16()? as usize;
    for _ in 0..attributes_len {
        match parse_attribute(&mut input, &pool)? {
            Attribute::SourceFile(index) => source_file = Some(pool.utf8(index)?.to_owned()),
            Attribute::BootstrapMethods(table) => bootstrap_methods = table.into_vec(),
            _ => {}
        }
    }

    // The format requires the file to end exactly at the last attribute.
    if input.remaining() > 0 {
        return Err(DecodeError::TrailingBytes(input.remaining()));
    }

    Ok(Class {
        path: path.to_owned(),
        bytes: bytes.into(),
        version,
        pool,
        access,
        name,
        super_name,
        interfaces: interfaces.into(),
        fields: fields.into(),
        methods: methods.into(),
        source_file,
        bootstrap_methods: bootstrap_methods.into(),
        status: ClassStatus::PrelimVerified,
    })
}
