//! CLI Exit Code Registry
//!
//! Single source of truth for the `crosscheck` exit codes. Exit codes are
//! part of the shell contract — the task runner sequencing these reports
//! branches on them.
//!
//! | Code | Meaning                                            |
//! |------|----------------------------------------------------|
//! | 0    | Success, datasets reconciled clean                 |
//! | 1    | Discrepancies found (diff(1) semantics)            |
//! | 2    | CLI usage error (reserved for clap)                |
//! | 3    | Input error (bad path, wrong extension, duplicate) |
//! | 4    | Normalization error (missing column, bad amount)   |
//! | 5    | IO error (unreadable input, unwritable output)     |

use crosscheck_recon::ReconError;

/// Success - run completed and the datasets agree.
pub const EXIT_CLEAN: u8 = 0;

/// Run completed but found missing keys, variances, or fund
/// inconsistencies. Like `diff(1)`, exit 1 means "the inputs differ."
pub const EXIT_DISCREPANCIES: u8 = 1;

/// Bad input submission.
pub const EXIT_INPUT: u8 = 3;

/// Normalization failure.
pub const EXIT_NORMALIZE: u8 = 4;

/// IO failure.
pub const EXIT_IO: u8 = 5;

/// Map an engine error to its exit code.
pub fn exit_code_for(err: &ReconError) -> u8 {
    match err {
        ReconError::Input(_) => EXIT_INPUT,
        ReconError::SourceDetect(_)
        | ReconError::MissingColumn { .. }
        | ReconError::AmountParse { .. } => EXIT_NORMALIZE,
        ReconError::Io(_) => EXIT_IO,
    }
}
