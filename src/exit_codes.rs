//! Exit code constants for the sitedeploy CLI.
//!
//! - 0: Success
//! - 1: Configuration error (missing option, invalid signature, bad config file)
//! - 2: Site build failure
//! - 3: Git operation failure
//! - 4: Filesystem failure while copying deployment files
//! - 5: Temporary workspace could not be created

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Configuration error: missing required option or invalid combination.
pub const CONFIG_ERROR: i32 = 1;

/// The site builder failed.
pub const BUILD_FAILURE: i32 = 2;

/// Git operation failure: clone, checkout, commit or push errors.
pub const GIT_FAILURE: i32 = 3;

/// Copying or removing files in the workspace failed.
pub const FILESYSTEM_FAILURE: i32 = 4;

/// The temporary workspace directory could not be created.
pub const WORKSPACE_FAILURE: i32 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            CONFIG_ERROR,
            BUILD_FAILURE,
            GIT_FAILURE,
            FILESYSTEM_FAILURE,
            WORKSPACE_FAILURE,
        ];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn success_is_zero() {
        assert_eq!(SUCCESS, 0);
    }
}
