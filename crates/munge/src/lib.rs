//! Release source filter for CircuitPython libraries
//!
//! Rewrites a library module before it is handed to `mpy-cross`: imports and
//! guards that only matter to type checkers are removed, platform checks are
//! folded into constant branches, and `__version__` is stamped with the
//! release version. Line numbers are preserved so tracebacks from the device
//! still point at the original source.

pub mod canonical;
pub mod config;
pub mod diff;
pub mod munge;
pub mod replacements;
pub mod source_unit;
pub mod statement;

pub use munge::{MungeOptions, munge, munge_file, munge_with_options};
