//! The format check: a second pass over a fully decoded class that enforces
//! the structural rules of JVMS §4.8 not already implied by decoding: flag
//! consistency on every method, and bounds on code and exception tables.
//!
//! This is not bytecode verification; no instruction is inspected. Whether
//! the pass runs at all is the caller's decision (the loader gates it on its
//! verification policy), which is why nothing here mutates the class: the
//! caller advances the lifecycle status after a clean pass.
//!
//! Every method is evaluated even after a violation is found; later
//! violations are logged, and the first one in method-table order is
//! returned.

use crate::{
    access::{ClassAccess, MethodAccess},
    class::Class,
    constant::Constant,
    method::Method,
    VerificationError,
};

pub fn check_class(class: &Class) -> Result<(), VerificationError> {
    let mut first = None;
    for method in class.methods.iter() {
        if let Err(err) = check_method(class, method) {
            tracing::warn!("{}: format check violation: {}", class.path, err);
            if first.is_none() {
                first = Some(err);
            }
        }
    }

    match first {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn check_method(class: &Class, method: &Method) -> Result<(), VerificationError> {
    check_access_flags(class, method)?;
    check_code(class, method)
}

const INTERFACE_BANNED: &[(MethodAccess, &str)] = &[
    (MethodAccess::PROTECTED, "protected"),
    (MethodAccess::FINAL, "final"),
    (MethodAccess::NATIVE, "native"),
    (MethodAccess::SYNCHRONIZED, "synchronized"),
];

const ABSTRACT_BANNED: &[(MethodAccess, &str)] = &[
    (MethodAccess::PRIVATE, "private"),
    (MethodAccess::STATIC, "static"),
    (MethodAccess::FINAL, "final"),
    (MethodAccess::NATIVE, "native"),
    (MethodAccess::STRICT, "strictfp"),
    (MethodAccess::SYNCHRONIZED, "synchronized"),
];

fn check_access_flags(class: &Class, method: &Method) -> Result<(), VerificationError> {
    let access = method.access;

    if access.visibility_count() > 1 {
        return Err(VerificationError::VisibilityConflict {
            class: class.name.clone(),
            method: method.name.clone(),
        });
    }

    if class.access.is(ClassAccess::INTERFACE) {
        for &(flag, word) in INTERFACE_BANNED {
            if access.is(flag) {
                return Err(VerificationError::BadInterfaceMethodFlag {
                    class: class.name.clone(),
                    method: method.name.clone(),
                    flag: word,
                });
            }
        }
    }

    if access.is(MethodAccess::ABSTRACT) {
        for &(flag, word) in ABSTRACT_BANNED {
            if access.is(flag) {
                return Err(VerificationError::BadAbstractMethodFlag {
                    class: class.name.clone(),
                    method: method.name.clone(),
                    flag: word,
                });
            }
        }
    }

    if class.version.major >= 51 && method.name == "<clinit>" && !access.is(MethodAccess::STATIC) {
        return Err(VerificationError::NonStaticClinit {
            class: class.name.clone(),
        });
    }

    Ok(())
}

fn check_code(class: &Class, method: &Method) -> Result<(), VerificationError> {
    let declared = method.declared_code_length;
    if declared == 0 && method.code.is_empty() {
        return Ok(());
    }

    if method.code.len() != declared as usize {
        return Err(VerificationError::CodeLengthMismatch {
            class: class.name.clone(),
            method: method.name.clone(),
            declared,
            actual: method.code.len(),
        });
    }

    if declared >= 65536 {
        return Err(VerificationError::CodeTooLong {
            class: class.name.clone(),
            method: method.name.clone(),
            declared,
        });
    }

    for handler in method.exception_table.iter() {
        if handler.start_pc > handler.end_pc || u32::from(handler.end_pc) > declared {
            return Err(VerificationError::BadHandlerRange {
                class: class.name.clone(),
                method: method.name.clone(),
                start_pc: handler.start_pc,
                end_pc: handler.end_pc,
            });
        }

        // the handler entry point must land on an actual code index
        if u32::from(handler.handler_pc) > declared - 1 {
            return Err(VerificationError::BadHandlerPc {
                class: class.name.clone(),
                method: method.name.clone(),
                handler_pc: handler.handler_pc,
            });
        }

        if handler.catch_type != 0 {
            match class.pool.lookup(handler.catch_type) {
                Some(Constant::Class(_)) => {}
                _ => {
                    return Err(VerificationError::BadCatchType {
                        class: class.name.clone(),
                        method: method.name.clone(),
                        index: handler.catch_type,
                    })
                }
            }
        }
    }

    Ok(())
}
