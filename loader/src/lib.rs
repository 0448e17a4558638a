//! The class cache side of the front end: a method area mapping internal
//! class names to parsed classes, and the load path that feeds it.
//! A load reads the file eagerly, decodes, format-checks per policy, inserts.
//!
//! Everything here is single-threaded by design. Loads are sequential, the
//! method area is plain owned state, and callers that want concurrent
//! loading wrap it in their own synchronization.
//!
//! Failures never terminate the process and never leave a partial class in
//! the cache: a class that fails decoding or the format check simply is not
//! inserted, and the typed error travels up to whoever asked for the load.

use std::collections::HashMap;
use std::path::Path;

use classfile::{format, Class, ClassStatus, DecodeError, VerificationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read class file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Verify(#[from] VerificationError),
}

/// Which loader in the hierarchy asked for a class. The bootstrap loader
/// brings in the runtime's own classes; everything an application names
/// arrives through the application loader.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LoaderKind {
    Bootstrap,
    Application,
}

impl LoaderKind {
    /// Application-loaded classes are the "remote" ones for verification
    /// purposes; bootstrap classes are trusted local input.
    pub fn is_remote(self) -> bool {
        matches!(self, LoaderKind::Application)
    }
}

/// How much format checking to apply, selected once by the embedder and
/// threaded through every load.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum VerifyPolicy {
    /// Check nothing.
    None,
    /// Check classes from the application loader only.
    Remote,
    /// Check everything, bootstrap classes included.
    All,
}

impl Default for VerifyPolicy {
    fn default() -> Self {
        VerifyPolicy::Remote
    }
}

impl VerifyPolicy {
    pub fn applies_to(self, loader: LoaderKind) -> bool {
        match self {
            VerifyPolicy::None => false,
            VerifyPolicy::Remote => loader.is_remote(),
            VerifyPolicy::All => true,
        }
    }
}

/// The method area: every class the runtime has loaded, by internal name.
#[derive(Debug, Default)]
pub struct MethodArea {
    classes: HashMap<String, Class>,
}

impl MethodArea {
    pub fn new() -> MethodArea {
        MethodArea {
            classes: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Class> {
        self.classes.get(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Inserts the class unless its name is already mapped; the first
    /// mapping always wins. Returns the class now in the map.
    pub fn insert_if_absent(&mut self, class: Class) -> &Class {
        self.classes.entry(class.name.clone()).or_insert(class)
    }
}

/// Loads one class file into the method area and returns its internal name.
///
/// The file is read completely before any decoding starts. The format check
/// runs only when `policy` covers `loader`; a clean check advances the class
/// to [`ClassStatus::Checked`], a skipped one leaves it at
/// [`ClassStatus::PrelimVerified`].
pub fn load_class_from_file(
    area: &mut MethodArea,
    loader: LoaderKind,
    policy: VerifyPolicy,
    path: &Path,
) -> Result<String, LoadError> {
    let bytes = std::fs::read(path)?;
    tracing::debug!("read {} bytes from {}", bytes.len(), path.display());

    let mut class = Class::parse(&path.display().to_string(), bytes)?;

    if policy.applies_to(loader) {
        format::check_class(&class)?;
        class.status = ClassStatus::Checked;
        tracing::debug!("{} format-checked", class.name);
    }

    let name = class.name.clone();
    area.insert_if_absent(class);
    Ok(name)
}
