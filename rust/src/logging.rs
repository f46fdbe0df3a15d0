//! Logging macros for network evaluation with verbosity level control.
//!
//! Provides zero-cost logging when disabled (verbosity=0).
//! - 0: SILENT
//! - 1: PHASES (project length, rounds used, verified length)
//! - 2: ROUNDS (per-round sweep and relaxation progress)
//! - 3: DEBUG (individual node and activity assignments)

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_PHASES: u8 = 1;
pub const VERBOSITY_ROUNDS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at PHASES level (verbosity >= 1).
#[macro_export]
macro_rules! log_phases {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_PHASES {
            eprintln!($($arg)*);
        }
    };
}

/// Log at ROUNDS level (verbosity >= 2).
#[macro_export]
macro_rules! log_rounds {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_ROUNDS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(VERBOSITY_SILENT < VERBOSITY_PHASES);
        assert!(VERBOSITY_PHASES < VERBOSITY_ROUNDS);
        assert!(VERBOSITY_ROUNDS < VERBOSITY_DEBUG);
    }

    #[test]
    fn test_log_macros_silent() {
        let verbosity = VERBOSITY_SILENT;
        log_phases!(verbosity, "length {}", 16);
        log_rounds!(verbosity, "round {}", 2);
        log_debug!(verbosity, "node {}", 3);
    }
}
