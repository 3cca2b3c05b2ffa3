//! CLI exit code registry. Exit codes are part of the shell contract —
//! scripts rely on them.

/// Success - report written without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, unreadable input path.
pub const EXIT_USAGE: u8 = 2;

/// Input error - a payload failed to parse, a sheet or column is missing.
pub const EXIT_INPUT: u8 = 3;

/// Config error - the TOML config failed to parse or validate.
pub const EXIT_CONFIG: u8 = 4;

/// Output error - the report workbook could not be written.
pub const EXIT_OUTPUT: u8 = 5;
