//! CLI Exit Code Registry
//!
//! This is the single source of truth for all `tally` exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Description                                                  |
//! |------|--------------------------------------------------------------|
//! | 0    | Success                                                      |
//! | 1    | Disagreements found (only with `--strict`/`fail_on_mismatch`) |
//! | 2    | CLI usage error (bad args)                                   |
//! | 3    | Duplicate references found (only with `fail_on_duplicates`)  |
//! | 4    | Invalid config file                                          |
//! | 5    | Input file could not be read or parsed                       |
//! | 6    | Output could not be written                                  |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant here
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use tally_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Reconciliation ran but found amount/status disagreements or one-sided
/// records, and the run was asked to fail on them.
/// Like `diff(1)`, exit 1 means "inputs differ."
pub const EXIT_MISMATCH: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// A reference repeats within one input and the config forbids it.
pub const EXIT_DUPLICATE: u8 = 3;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// Input CSV unreadable or malformed.
pub const EXIT_INPUT: u8 = 5;

/// Output file or directory could not be written.
pub const EXIT_OUTPUT: u8 = 6;

/// Map a library error raised while reading inputs or config.
pub fn input_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReconError::Csv { .. } | ReconError::Io { .. } => EXIT_INPUT,
        ReconError::Export(_) => EXIT_OUTPUT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_MISMATCH,
            EXIT_USAGE,
            EXIT_DUPLICATE,
            EXIT_INVALID_CONFIG,
            EXIT_INPUT,
            EXIT_OUTPUT,
        ];
        let mut sorted = codes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }

    #[test]
    fn library_errors_map_to_codes() {
        assert_eq!(input_exit_code(&ReconError::ConfigParse("x".into())), EXIT_INVALID_CONFIG);
        assert_eq!(
            input_exit_code(&ReconError::Csv { source_name: "a.csv".into(), message: "bad".into() }),
            EXIT_INPUT
        );
        assert_eq!(input_exit_code(&ReconError::Export("x".into())), EXIT_OUTPUT);
    }
}
