//! # Constant pool
//!
//! Entries in the constant pool start at 1, and indices into the pool are
//! likewise 1-based. Each entry is a 1-byte tag followed by a payload whose
//! shape the tag decides. Two oddities of the format matter everywhere:
//!
//! * `Long` and `Double` entries occupy their own slot *plus* the following
//!   slot, which exists only on paper: it holds nothing, and no valid index
//!   may ever name it. The declared pool count includes these phantom slots.
//! * `Utf8` payloads are "modified UTF-8", not UTF-8 (see `mutf8`).
//!
//! Loading the pool and verifying its cross-references are two separate
//! passes: every entry must exist before any reference between entries can be
//! judged, since references point forward as freely as backward.

use crate::{
    class::Version,
    mutf8,
    parse::ByteParser,
    DecodeError, DecodeResult,
};

/// A 1-based index into the constant pool.
pub type PoolIndex = u16;

pub const CONSTANT_UTF8: u8 = 1;
pub const CONSTANT_INTEGER: u8 = 3;
pub const CONSTANT_FLOAT: u8 = 4;
pub const CONSTANT_LONG: u8 = 5;
pub const CONSTANT_DOUBLE: u8 = 6;
pub const CONSTANT_CLASS: u8 = 7;
pub const CONSTANT_STRING: u8 = 8;
pub const CONSTANT_FIELD_REF: u8 = 9;
pub const CONSTANT_METHOD_REF: u8 = 10;
pub const CONSTANT_INTERFACE_METHOD_REF: u8 = 11;
pub const CONSTANT_NAME_AND_TYPE: u8 = 12;
pub const CONSTANT_METHOD_HANDLE: u8 = 15;
pub const CONSTANT_METHOD_TYPE: u8 = 16;
pub const CONSTANT_DYNAMIC: u8 = 17;
pub const CONSTANT_INVOKE_DYNAMIC: u8 = 18;
pub const CONSTANT_MODULE: u8 = 19;
pub const CONSTANT_PACKAGE: u8 = 20;

/// Which of the three member-reference tags an entry was read from. The
/// payload is identical for all three; only the kind differs.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RefKind {
    Field,
    Method,
    InterfaceMethod,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MethodHandleKind {
    /// getfield C.f:T
    GetField = 1,
    /// getstatic C.f:T
    GetStatic = 2,
    /// putfield C.f:T
    PutField = 3,
    /// putstatic C.f:T
    PutStatic = 4,
    /// invokevirtual C.m:(A*)T
    InvokeVirtual = 5,
    /// invokestatic C.m:(A*)T
    InvokeStatic = 6,
    /// invokespecial C.m:(A*)T
    InvokeSpecial = 7,
    /// new C; dup; invokespecial C.<init>:(A*)void
    NewInvokeSpecial = 8,
    /// invokeinterface C.m:(A*)T
    InvokeInterface = 9,
}

impl MethodHandleKind {
    pub fn from_raw(kind: u8) -> Option<MethodHandleKind> {
        Some(match kind {
            1 => MethodHandleKind::GetField,
            2 => MethodHandleKind::GetStatic,
            3 => MethodHandleKind::PutField,
            4 => MethodHandleKind::PutStatic,
            5 => MethodHandleKind::InvokeVirtual,
            6 => MethodHandleKind::InvokeStatic,
            7 => MethodHandleKind::InvokeSpecial,
            8 => MethodHandleKind::NewInvokeSpecial,
            9 => MethodHandleKind::InvokeInterface,
            _ => return None,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    /// Occupies slot 0 and the upper slot of every `Long`/`Double` entry.
    /// Not part of the format itself; no valid reference resolves to it.
    Dummy,

    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),

    Class(PoolIndex),
    String(PoolIndex),

    Ref {
        kind: RefKind,
        class: PoolIndex,
        name_and_type: PoolIndex,
    },
    NameAndType {
        name: PoolIndex,
        descriptor: PoolIndex,
    },

    MethodHandle {
        kind: MethodHandleKind,
        index: PoolIndex,
    },
    MethodType(PoolIndex),

    Dynamic {
        bootstrap: PoolIndex,
        name_and_type: PoolIndex,
    },
    InvokeDynamic {
        bootstrap: PoolIndex,
        name_and_type: PoolIndex,
    },

    Module(PoolIndex),
    Package(PoolIndex),
}

impl Constant {
    /// Whether this entry occupies two pool slots.
    pub fn is_wide(&self) -> bool {
        matches!(self, Constant::Long(_) | Constant::Double(_))
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Constant::Dummy => "a dummy slot",
            Constant::Utf8(_) => "utf8 text",
            Constant::Integer(_) => "an integer constant",
            Constant::Float(_) => "a float constant",
            Constant::Long(_) => "a long constant",
            Constant::Double(_) => "a double constant",
            Constant::Class(_) => "a class constant",
            Constant::String(_) => "a string constant",
            Constant::Ref {
                kind: RefKind::Field,
                ..
            } => "a field reference",
            Constant::Ref {
                kind: RefKind::Method,
                ..
            } => "a method reference",
            Constant::Ref {
                kind: RefKind::InterfaceMethod,
                ..
            } => "an interface method reference",
            Constant::NameAndType { .. } => "a name-and-type",
            Constant::MethodHandle { .. } => "a method handle",
            Constant::MethodType(_) => "a method type",
            Constant::Dynamic { .. } => "a dynamic constant",
            Constant::InvokeDynamic { .. } => "an invokedynamic constant",
            Constant::Module(_) => "a module name",
            Constant::Package(_) => "a package name",
        }
    }

    pub fn as_utf8(&self) -> Option<&str> {
        match self {
            Constant::Utf8(text) => Some(text),
            _ => None,
        }
    }
}

/// The verified, read-only pool. Slot 0 is always [`Constant::Dummy`].
#[derive(Clone, Debug, PartialEq)]
pub struct ConstantPool {
    entries: Box<[Constant]>,
}

impl ConstantPool {
    pub(crate) fn from_entries(entries: Vec<Constant>) -> ConstantPool {
        ConstantPool {
            entries: entries.into(),
        }
    }

    /// Total number of slots, dummy slots included. Matches the count
    /// declared in the class-file header.
    pub fn slot_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Constant] {
        &self.entries
    }

    /// Raw slot access; dummy slots are visible here.
    pub fn lookup(&self, index: PoolIndex) -> Option<&Constant> {
        self.entries.get(usize::from(index))
    }

    /// Resolves an index the way references do: slot 0, out-of-range slots
    /// and the upper halves of wide entries are all unusable.
    pub fn entry(&self, index: PoolIndex) -> DecodeResult<&Constant> {
        match self.lookup(index) {
            None | Some(Constant::Dummy) => Err(DecodeError::BadPoolIndex(index)),
            Some(constant) => Ok(constant),
        }
    }

    pub fn utf8(&self, index: PoolIndex) -> DecodeResult<&str> {
        let entry = self.entry(index)?;
        entry.as_utf8().ok_or(DecodeError::WrongPoolType {
            slot: index,
            expected: "utf8 text",
            found: entry.describe(),
        })
    }

    /// Resolves `index` through a `Class` entry to the class name it carries.
    pub fn class_name(&self, index: PoolIndex) -> DecodeResult<&str> {
        match self.entry(index)? {
            Constant::Class(name) => self.utf8(*name),
            other => Err(DecodeError::WrongPoolType {
                slot: index,
                expected: "a class constant",
                found: other.describe(),
            }),
        }
    }
}

fn ref_entry(input: &mut ByteParser<'_>, kind: RefKind) -> DecodeResult<Constant> {
    Ok(Constant::Ref {
        kind,
        class: input.parse_u16()?,
        name_and_type: input.parse_u16()?,
    })
}

pub fn parse_constant(input: &mut ByteParser<'_>, slot: u16) -> DecodeResult<Constant> {
    Ok(match input.parse_u8()? {
        CONSTANT_UTF8 => {
            let len = input.parse_u16()? as usize;
            let text = mutf8::decode_mutf8(input.take(len)?).map_err(|err| {
                DecodeError::InvalidUtf8 {
                    slot,
                    offset: err.offset,
                    byte: err.byte,
                }
            })?;
            Constant::Utf8(text.into_owned())
        }
        CONSTANT_INTEGER => input.parse_i32().map(Constant::Integer)?,
        CONSTANT_FLOAT => input.parse_f32().map(Constant::Float)?,
        CONSTANT_LONG => input.parse_i64().map(Constant::Long)?,
        CONSTANT_DOUBLE => input.parse_f64().map(Constant::Double)?,

        CONSTANT_CLASS => input.parse_u16().map(Constant::Class)?,
        CONSTANT_STRING => input.parse_u16().map(Constant::String)?,

        CONSTANT_FIELD_REF => ref_entry(input, RefKind::Field)?,
        CONSTANT_METHOD_REF => ref_entry(input, RefKind::Method)?,
        CONSTANT_INTERFACE_METHOD_REF => ref_entry(input, RefKind::InterfaceMethod)?,

        CONSTANT_NAME_AND_TYPE => Constant::NameAndType {
            name: input.parse_u16()?,
            descriptor: input.parse_u16()?,
        },

        CONSTANT_METHOD_HANDLE => {
            let raw = input.parse_u8()?;
            let kind = MethodHandleKind::from_raw(raw)
                .ok_or(DecodeError::UnknownMethodHandleKind { slot, kind: raw })?;
            Constant::MethodHandle {
                kind,
                index: input.parse_u16()?,
            }
        }
        CONSTANT_METHOD_TYPE => input.parse_u16().map(Constant::MethodType)?,

        CONSTANT_DYNAMIC => Constant::Dynamic {
            bootstrap: input.parse_u16()?,
            name_and_type: input.parse_u16()?,
        },
        CONSTANT_INVOKE_DYNAMIC => Constant::InvokeDynamic {
            bootstrap: input.parse_u16()?,
            name_and_type: input.parse_u16()?,
        },

        CONSTANT_MODULE => input.parse_u16().map(Constant::Module)?,
        CONSTANT_PACKAGE => input.parse_u16().map(Constant::Package)?,

        tag => return Err(DecodeError::UnknownConstantTag { slot, tag }),
    })
}

/// Reads the declared entry count and then the entries themselves, leaving
/// the cursor on the first byte after the pool.
///
/// The declared count includes slot 0 and every phantom upper slot, so the
/// loop compares slots filled against the declared total; the two quantities
/// are tracked separately and nothing is decremented in place.
pub fn parse_constant_pool(input: &mut ByteParser<'_>) -> DecodeResult<ConstantPool> {
    let declared = input.parse_u16()?;
    if declared < 2 {
        return Err(DecodeError::PoolCountTooSmall(declared));
    }

    let slots = usize::from(declared);
    let mut entries = Vec::with_capacity(slots);
    entries.push(Constant::Dummy);

    while entries.len() < slots {
        let slot = entries.len() as u16;
        let constant = parse_constant(input, slot)?;
        let wide = constant.is_wide();
        entries.push(constant);
        if wide {
            // the phantom upper slot must itself fit under the declared count
            if entries.len() == slots {
                return Err(DecodeError::BadWideEntry(slot));
            }
            entries.push(Constant::Dummy);
        }
    }

    // The loop above fills exactly the declared slot count; anything else is
    // a bug in this loader, not in the input.
    if entries.len() != slots {
        return Err(DecodeError::Internal("constant pool slot accounting diverged"));
    }

    tracing::debug!("constant pool loaded: {} slots", entries.len());
    Ok(ConstantPool::from_entries(entries))
}

fn gate(version: Version, slot: u16, entry: &'static str, needs: u16) -> DecodeResult<()> {
    if version.major < needs {
        Err(DecodeError::VersionGated { slot, entry, needs })
    } else {
        Ok(())
    }
}

fn expect_target(
    pool: &ConstantPool,
    slot: u16,
    entry: &'static str,
    target: PoolIndex,
    expected: &'static str,
    accepts: impl Fn(&Constant) -> bool,
) -> DecodeResult<()> {
    match pool.lookup(target) {
        Some(found) if accepts(found) => Ok(()),
        found => Err(DecodeError::BadReference {
            slot,
            entry,
            target,
            expected,
            found: found.map_or("nothing (index out of range)", Constant::describe),
        }),
    }
}

fn is_utf8(constant: &Constant) -> bool {
    matches!(constant, Constant::Utf8(_))
}

fn is_class(constant: &Constant) -> bool {
    matches!(constant, Constant::Class(_))
}

fn is_name_and_type(constant: &Constant) -> bool {
    matches!(constant, Constant::NameAndType { .. })
}

fn is_ref(kind: RefKind) -> impl Fn(&Constant) -> bool {
    move |constant| matches!(constant, Constant::Ref { kind: k, .. } if *k == kind)
}

/// Confirms every cross-reference in the pool is well-typed and every
/// version-gated entry is allowed by `version`. Scans slots 1.. in order and
/// fails on the first violation; each error names the offending slot.
///
/// The modified-UTF-8 byte restrictions are enforced earlier, while the raw
/// bytes are still in hand (`mutf8`); by this point the pool holds decoded
/// strings, in which a NUL may legitimately appear via the `C0 80` escape.
pub fn verify_pool(pool: &ConstantPool, version: Version) -> DecodeResult<()> {
    for (slot, constant) in pool.entries().iter().enumerate().skip(1) {
        let slot = slot as u16;
        match constant {
            Constant::Dummy
            | Constant::Utf8(_)
            | Constant::Integer(_)
            | Constant::Float(_)
            | Constant::Long(_)
            | Constant::Double(_) => {}

            Constant::Class(name) => {
                expect_target(pool, slot, "a class constant", *name, "utf8 text", is_utf8)?;
            }
            Constant::String(index) => {
                expect_target(pool, slot, "a string constant", *index, "utf8 text", is_utf8)?;
            }

            Constant::Ref {
                kind,
                class,
                name_and_type,
            } => {
                let entry = constant.describe();
                expect_target(pool, slot, entry, *class, "a class constant", is_class)?;
                expect_target(
                    pool,
                    slot,
                    entry,
                    *name_and_type,
                    "a name-and-type",
                    is_name_and_type,
                )?;

                // Of the `<`-prefixed special names, only <init> may be the
                // target of a method reference. The name itself is validated
                // as utf8 when its NameAndType slot comes up in this scan.
                if *kind == RefKind::Method {
                    if let Some(Constant::NameAndType { name, .. }) = pool.lookup(*name_and_type) {
                        if let Some(Constant::Utf8(text)) = pool.lookup(*name) {
                            if text.starts_with('<') && text != "<init>" {
                                return Err(DecodeError::BadRefName {
                                    slot,
                                    name: text.clone(),
                                });
                            }
                        }
                    }
                }
            }

            Constant::NameAndType { name, descriptor } => {
                expect_target(pool, slot, "a name-and-type", *name, "utf8 text", is_utf8)?;
                expect_target(
                    pool,
                    slot,
                    "a name-and-type",
                    *descriptor,
                    "utf8 text",
                    is_utf8,
                )?;
            }

            Constant::MethodHandle { kind, index } => {
                gate(version, slot, "a method handle", 51)?;
                match kind {
                    MethodHandleKind::GetField
                    | MethodHandleKind::GetStatic
                    | MethodHandleKind::PutField
                    | MethodHandleKind::PutStatic => expect_target(
                        pool,
                        slot,
                        "a method handle",
                        *index,
                        "a field reference",
                        is_ref(RefKind::Field),
                    )?,

                    MethodHandleKind::InvokeVirtual | MethodHandleKind::NewInvokeSpecial => {
                        expect_target(
                            pool,
                            slot,
                            "a method handle",
                            *index,
                            "a method reference",
                            is_ref(RefKind::Method),
                        )?
                    }

                    // invokestatic and invokespecial handles may also name
                    // interface methods from version 52 on
                    MethodHandleKind::InvokeStatic | MethodHandleKind::InvokeSpecial => {
                        let interface_ok = version.major >= 52;
                        expect_target(
                            pool,
                            slot,
                            "a method handle",
                            *index,
                            "a method reference",
                            |c| {
                                is_ref(RefKind::Method)(c)
                                    || (interface_ok && is_ref(RefKind::InterfaceMethod)(c))
                            },
                        )?
                    }

                    MethodHandleKind::InvokeInterface => expect_target(
                        pool,
                        slot,
                        "a method handle",
                        *index,
                        "an interface method reference",
                        is_ref(RefKind::InterfaceMethod),
                    )?,
                }
            }

            Constant::MethodType(descriptor) => {
                gate(version, slot, "a method type", 51)?;
                expect_target(pool, slot, "a method type", *descriptor, "utf8 text", is_utf8)?;
            }

            Constant::Dynamic { name_and_type, .. } => {
                gate(version, slot, "a dynamic constant", 55)?;
                expect_target(
                    pool,
                    slot,
                    "a dynamic constant",
                    *name_and_type,
                    "a name-and-type",
                    is_name_and_type,
                )?;
            }
            Constant::InvokeDynamic { name_and_type, .. } => {
                gate(version, slot, "an invokedynamic constant", 51)?;
                expect_target(
                    pool,
                    slot,
                    "an invokedynamic constant",
                    *name_and_type,
                    "a name-and-type",
                    is_name_and_type,
                )?;
            }

            Constant::Module(name) => {
                gate(version, slot, "a module name", 53)?;
                expect_target(pool, slot, "a module name", *name, "utf8 text", is_utf8)?;
            }
            Constant::Package(name) => {
                gate(version, slot, "a package name", 53)?;
                expect_target(pool, slot, "a package name", *name, "utf8 text", is_utf8)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const V55: Version = Version {
        major: 55,
        minor: 0,
    };

    fn utf8(text: &str) -> Vec<u8> {
        let mut bytes = vec![CONSTANT_UTF8];
        bytes.extend_from_slice(&(text.len() as u16).to_be_bytes());
        bytes.extend_from_slice(text.as_bytes());
        bytes
    }

    fn u16_entry(tag: u8, value: u16) -> Vec<u8> {
        let mut bytes = vec![tag];
        bytes.extend_from_slice(&value.to_be_bytes());
        bytes
    }

    fn pair_entry(tag: u8, first: u16, second: u16) -> Vec<u8> {
        let mut bytes = vec![tag];
        bytes.extend_from_slice(&first.to_be_bytes());
        bytes.extend_from_slice(&second.to_be_bytes());
        bytes
    }

    fn pool_bytes(declared: u16, entries: &[Vec<u8>]) -> Vec<u8> {
        let mut bytes = declared.to_be_bytes().to_vec();
        for entry in entries {
            bytes.extend_from_slice(entry);
        }
        bytes
    }

    fn load(bytes: &[u8]) -> DecodeResult<ConstantPool> {
        parse_constant_pool(&mut ByteParser::new(bytes))
    }

    #[test]
    fn test_minimal_pool() {
        let pool = load(&pool_bytes(2, &[utf8("Foo")])).unwrap();
        assert_eq!(pool.slot_count(), 2);
        assert_eq!(pool.entries()[0], Constant::Dummy);
        assert_eq!(pool.utf8(1).unwrap(), "Foo");
    }

    #[test]
    fn test_pool_count_below_two_rejected() {
        assert_eq!(
            load(&pool_bytes(1, &[])),
            Err(DecodeError::PoolCountTooSmall(1))
        );
        assert_eq!(
            load(&pool_bytes(0, &[])),
            Err(DecodeError::PoolCountTooSmall(0))
        );
    }

    #[test]
    fn test_long_occupies_two_slots() {
        let mut long = vec![CONSTANT_LONG];
        long.extend_from_slice(&0x1122_3344_5566_7788u64.to_be_bytes());
        let pool = load(&pool_bytes(4, &[long, utf8("tail")])).unwrap();

        assert_eq!(pool.entries()[1], Constant::Long(0x1122_3344_5566_7788));
        assert_eq!(pool.entries()[2], Constant::Dummy);
        assert_eq!(pool.utf8(3).unwrap(), "tail");
        // the phantom upper slot never resolves
        assert_eq!(pool.entry(2), Err(DecodeError::BadPoolIndex(2)));
    }

    #[test]
    fn test_wide_entry_at_declared_end_rejected() {
        let mut double = vec![CONSTANT_DOUBLE];
        double.extend_from_slice(&1.5f64.to_be_bytes());
        // declared count 2 leaves one usable slot, but a double needs two
        assert_eq!(
            load(&pool_bytes(2, &[double])),
            Err(DecodeError::BadWideEntry(1))
        );
    }

    #[test]
    fn test_unknown_tag_is_fatal() {
        assert_eq!(
            load(&pool_bytes(2, &[vec![2, 0, 0]])),
            Err(DecodeError::UnknownConstantTag { slot: 1, tag: 2 })
        );
    }

    #[test]
    fn test_slot_zero_never_resolves() {
        let pool = load(&pool_bytes(2, &[utf8("Foo")])).unwrap();
        assert_eq!(pool.entry(0), Err(DecodeError::BadPoolIndex(0)));
    }

    #[test]
    fn test_raw_nul_in_utf8_rejected_at_load() {
        let mut entry = vec![CONSTANT_UTF8, 0, 3];
        entry.extend_from_slice(b"a\0b");
        assert_eq!(
            load(&pool_bytes(2, &[entry])),
            Err(DecodeError::InvalidUtf8 {
                slot: 1,
                offset: 1,
                byte: 0
            })
        );
    }

    #[test]
    fn test_class_ref_must_name_utf8() {
        let mut int_entry = vec![CONSTANT_INTEGER];
        int_entry.extend_from_slice(&7i32.to_be_bytes());
        let pool = load(&pool_bytes(
            3,
            &[u16_entry(CONSTANT_CLASS, 2), int_entry],
        ))
        .unwrap();

        assert_eq!(
            verify_pool(&pool, V55),
            Err(DecodeError::BadReference {
                slot: 1,
                entry: "a class constant",
                target: 2,
                expected: "utf8 text",
                found: "an integer constant",
            })
        );
    }

    #[test]
    fn test_method_ref_special_names() {
        // slots: 1 = ref, 2 = class, 3 = class name, 4 = nat, 5 = name, 6 = desc
        let build = |name: &str| {
            load(&pool_bytes(
                7,
                &[
                    pair_entry(CONSTANT_METHOD_REF, 2, 4),
                    u16_entry(CONSTANT_CLASS, 3),
                    utf8("Foo"),
                    pair_entry(CONSTANT_NAME_AND_TYPE, 5, 6),
                    utf8(name),
                    utf8("()V"),
                ],
            ))
            .unwrap()
        };

        assert_eq!(verify_pool(&build("<init>"), V55), Ok(()));
        assert_eq!(verify_pool(&build("bar"), V55), Ok(()));
        assert_eq!(
            verify_pool(&build("<clinit>"), V55),
            Err(DecodeError::BadRefName {
                slot: 1,
                name: "<clinit>".to_owned(),
            })
        );
    }

    fn handle_pool(kind: u8, ref_tag: u8) -> ConstantPool {
        // slots: 1 = handle, 2 = ref, 3 = class, 4 = class name, 5 = nat,
        //        6 = name, 7 = desc
        let mut handle = vec![CONSTANT_METHOD_HANDLE, kind];
        handle.extend_from_slice(&2u16.to_be_bytes());
        load(&pool_bytes(
            8,
            &[
                handle,
                pair_entry(ref_tag, 3, 5),
                u16_entry(CONSTANT_CLASS, 4),
                utf8("Foo"),
                pair_entry(CONSTANT_NAME_AND_TYPE, 6, 7),
                utf8("bar"),
                utf8("()V"),
            ],
        ))
        .unwrap()
    }

    #[test]
    fn test_invoke_interface_handle_needs_interface_ref() {
        let pool = handle_pool(9, CONSTANT_METHOD_REF);
        assert!(matches!(
            verify_pool(&pool, V55),
            Err(DecodeError::BadReference { slot: 1, .. })
        ));

        let pool = handle_pool(9, CONSTANT_INTERFACE_METHOD_REF);
        assert_eq!(verify_pool(&pool, V55), Ok(()));
    }

    #[test]
    fn test_invoke_static_handle_interface_target_is_version_gated() {
        let pool = handle_pool(6, CONSTANT_INTERFACE_METHOD_REF);
        assert_eq!(verify_pool(&pool, V55), Ok(()));
        assert!(matches!(
            verify_pool(
                &pool,
                Version {
                    major: 51,
                    minor: 0
                }
            ),
            Err(DecodeError::BadReference { slot: 1, .. })
        ));
    }

    #[test]
    fn test_method_handle_below_51_rejected() {
        let pool = handle_pool(5, CONSTANT_METHOD_REF);
        assert_eq!(
            verify_pool(
                &pool,
                Version {
                    major: 50,
                    minor: 0
                }
            ),
            Err(DecodeError::VersionGated {
                slot: 1,
                entry: "a method handle",
                needs: 51,
            })
        );
    }

    #[test]
    fn test_unknown_method_handle_kind_rejected_at_load() {
        let mut handle = vec![CONSTANT_METHOD_HANDLE, 10];
        handle.extend_from_slice(&2u16.to_be_bytes());
        assert_eq!(
            load(&pool_bytes(2, &[handle])),
            Err(DecodeError::UnknownMethodHandleKind { slot: 1, kind: 10 })
        );
    }

    #[test]
    fn test_version_gates() {
        let gated = |entries: &[Vec<u8>], declared: u16, major: u16| {
            let pool = load(&pool_bytes(declared, entries)).unwrap();
            verify_pool(
                &pool,
                Version { major, minor: 0 },
            )
        };

        // Dynamic needs 55
        let dynamic = &[
            pair_entry(CONSTANT_DYNAMIC, 0, 2),
            pair_entry(CONSTANT_NAME_AND_TYPE, 3, 4),
            utf8("x"),
            utf8("I"),
        ];
        assert_eq!(gated(dynamic, 5, 55), Ok(()));
        assert_eq!(
            gated(dynamic, 5, 54),
            Err(DecodeError::VersionGated {
                slot: 1,
                entry: "a dynamic constant",
                needs: 55,
            })
        );

        // Module and Package need 53
        let module = &[u16_entry(CONSTANT_MODULE, 2), utf8("m")];
        assert_eq!(gated(module, 3, 53), Ok(()));
        assert!(gated(module, 3, 52).is_err());
    }
}
