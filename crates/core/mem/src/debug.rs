//! Debug macros for the memory subsystem
//!
//! These macros compile to nothing when the `debug-mem` feature is disabled.

/// Per-page trace output, routed through the `log` facade
#[cfg(feature = "debug-mem")]
macro_rules! debug_mem {
    ($($arg:tt)*) => {
        log::debug!(target: "pagesim::mem", $($arg)*)
    };
}

#[cfg(not(feature = "debug-mem"))]
macro_rules! debug_mem {
    ($($arg:tt)*) => {};
}
