//! CLI Exit Code Registry
//!
//! Single source of truth for `bparam` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                            |
//! |------|----------------------------------------------------|
//! | 0    | Success                                            |
//! | 1    | General error (unspecified)                        |
//! | 2    | Usage error (bad args, missing file)               |
//! | 3    | Duplicate identifier or alias in a binding         |
//! | 4    | Manifest could not be parsed or has a bad entry    |
//! | 5    | Unknown binding                                    |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unreadable manifest file.
pub const EXIT_USAGE: u8 = 2;

/// A binding declares an identifier or alias twice.
pub const EXIT_DUPLICATE: u8 = 3;

/// Manifest TOML is malformed or a parameter entry is invalid.
pub const EXIT_MANIFEST: u8 = 4;

/// Requested binding is not in the manifest.
pub const EXIT_UNKNOWN_BINDING: u8 = 5;
