//! Schema lock-file subsystem.
//!
//! Tracks the state of a package's schema sources across generation runs:
//!
//! 1. Every schema file is canonicalized and content-hashed
//! 2. Each generation target gets a lock entry with its own hash and version
//! 3. Versions only ever move forward, negotiated against the prior lock
//! 4. A monorepo root can aggregate all package lock files into one record

pub mod entry;
pub mod hash;
pub mod lock;
pub mod monorepo;
pub mod source;
pub mod version;

pub use entry::{GenerationEntry, GenerationEntryBuilder, SourceSet};
pub use lock::{LockFile, LOCK_FILE_NAME};
pub use monorepo::{MonorepoLockFile, MonorepoPackage};
pub use source::{SchemaSource, SchemaSourceReader};
pub use version::Version;
