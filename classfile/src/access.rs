//! Access-flag bitmasks for classes, fields, and methods.
//!
//! The three kinds share most bit positions but not all: `0x0020` is SUPER on
//! a class and SYNCHRONIZED on a method, `0x0080` is TRANSIENT on a field and
//! VARARGS on a method. One newtype per kind keeps a flag from being tested
//! against the wrong table.
//!
//! Flag *combination* rules (visibility conflicts, interface and abstract
//! method restrictions) are not enforced here; they belong to the format
//! checker, which reports them per method.

macro_rules! access_flags {
    ($name:ident { $($(#[$doc:meta])* $flag:ident = $value:expr;)* }) => {
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub struct $name(u16);

        impl $name {
            $($(#[$doc])* pub const $flag: $name = $name($value);)*

            pub fn from_raw(flags: u16) -> $name {
                $name(flags)
            }

            pub fn into_raw(self) -> u16 {
                self.0
            }

            /// Single-bit test: true if every bit of `flag` is set.
            pub fn is(self, flag: $name) -> bool {
                self.0 & flag.0 == flag.0
            }
        }
    };
}

access_flags!(ClassAccess {
    /// Marked or implicitly public in source.
    PUBLIC = 0x0001;
    /// Declared final; must not be subclassed.
    FINAL = 0x0010;
    /// Treat superclass methods specially under invokespecial.
    SUPER = 0x0020;
    /// Is an interface, not a class.
    INTERFACE = 0x0200;
    /// Declared abstract; must not be instantiated.
    ABSTRACT = 0x0400;
    /// Declared synthetic; not present in the source code.
    SYNTHETIC = 0x1000;
    /// Declared as an annotation type.
    ANNOTATION = 0x2000;
    /// Declared as an enum type.
    ENUM = 0x4000;
    /// Is a module, not a class or interface.
    MODULE = 0x8000;
});

access_flags!(FieldAccess {
    PUBLIC = 0x0001;
    PRIVATE = 0x0002;
    PROTECTED = 0x0004;
    STATIC = 0x0008;
    FINAL = 0x0010;
    /// Declared volatile; cannot be cached.
    VOLATILE = 0x0040;
    /// Declared transient; skipped by persistent object managers.
    TRANSIENT = 0x0080;
    SYNTHETIC = 0x1000;
    /// Declared as an element of an enum.
    ENUM = 0x4000;
});

access_flags!(MethodAccess {
    PUBLIC = 0x0001;
    PRIVATE = 0x0002;
    PROTECTED = 0x0004;
    STATIC = 0x0008;
    FINAL = 0x0010;
    /// Declared synchronized; invocation is wrapped in a monitor.
    SYNCHRONIZED = 0x0020;
    /// A bridge method, generated by the compiler.
    BRIDGE = 0x0040;
    /// Declared with a variable number of arguments.
    VARARGS = 0x0080;
    /// Declared native; implemented outside Java.
    NATIVE = 0x0100;
    /// Declared abstract; no implementation is provided.
    ABSTRACT = 0x0400;
    /// Declared strictfp; floating-point mode is FP-strict.
    STRICT = 0x0800;
    SYNTHETIC = 0x1000;
});

impl MethodAccess {
    /// How many of the three visibility bits are set. The format checker
    /// requires at most one.
    pub fn visibility_count(self) -> u32 {
        let mask = MethodAccess::PUBLIC.0 | MethodAccess::PRIVATE.0 | MethodAccess::PROTECTED.0;
        (self.0 & mask).count_ones()
    }
}
