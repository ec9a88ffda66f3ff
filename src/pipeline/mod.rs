//! Pipeline stages for one image file.
//!
//! Each submodule implements exactly one step, so each is testable on its own
//! and the batch processor stays a thin driver.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ decode ──▶ filter ──▶ resolve ──▶ rename
//! (bytes)   (texts)    (valid?)   (target)    (move)
//! ```
//!
//! 1. [`input`]  : read the file and split its path; expand folders
//! 2. [`decode`] : run the barcode decoder on the blocking pool, never failing
//! 3. [`filter`] : tag candidates with the length policy, pick the first valid
//! 4. [`resolve`]: apply the filename policy, detect "already named", pick a
//!    free `_N` suffix
//! 5. [`rename`] : move the file, retrying transient "busy" errors

pub mod decode;
pub mod filter;
pub mod input;
pub mod rename;
pub mod resolve;
