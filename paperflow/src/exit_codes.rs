//! Stable exit codes for paperflow CLI commands.

/// Command succeeded or the checked action is allowed.
pub const OK: i32 = 0;
/// Command failed due to invalid config/board/arguments or other errors.
pub const INVALID: i32 = 1;
/// `paperflow can-submit` / `can-delete`: the action is not allowed.
pub const DENIED: i32 = 2;
/// The chair directory could not be reached in strict mode.
pub const LOOKUP_FAILED: i32 = 3;
