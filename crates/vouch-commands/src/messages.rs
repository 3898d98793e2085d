//! Reply texts shown to command users.

/// `/vouch` used outside the configured channel.
pub const WRONG_CHANNEL: &str = "This command can only be used in the designated vouch channel.";

/// Caller lacks the role a command requires.
pub const NO_PERMISSION: &str = "You do not have permission to use this command.";

/// Rating outside the accepted range.
pub const STARS_OUT_OF_RANGE: &str = "Stars must be between 1 and 5.";

/// Reason over the length limit.
pub const REASON_TOO_LONG: &str = "Reason must be 1000 characters or less.";

/// Product channel label over the length limit.
pub const PRODUCT_CHANNEL_TOO_LONG: &str = "Product channel must be 100 characters or less.";

/// Restore requested for a guild without vouches.
pub const NOTHING_TO_RESTORE: &str = "No vouches found to restore.";

/// Restore could not find the destination channel.
pub const DESTINATION_MISSING: &str = "Could not find the configured vouch channel.";

/// Reply for internal failures; details only go to the log.
pub const GENERIC_FAILURE: &str = "Something went wrong while running this command.";

/// Restore summary.
#[must_use]
pub fn restore_summary(restored: usize, total: usize) -> String {
    format!("Successfully restored {restored} out of {total} vouches.")
}
