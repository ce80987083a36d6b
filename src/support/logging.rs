//! Logging shim
//!
//! - `defmt` feature: forwards to defmt
//! - host tests: stdout
//! - otherwise: no-op, arguments are still type-checked

macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        println!("[DEBUG] {}", format!($($arg)*));

        #[cfg(all(not(feature = "defmt"), not(test)))]
        let _ = core::format_args!($($arg)*);
    }};
}

macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        println!("[WARN] {}", format!($($arg)*));

        #[cfg(all(not(feature = "defmt"), not(test)))]
        let _ = core::format_args!($($arg)*);
    }};
}

macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        eprintln!("[ERROR] {}", format!($($arg)*));

        #[cfg(all(not(feature = "defmt"), not(test)))]
        let _ = core::format_args!($($arg)*);
    }};
}
