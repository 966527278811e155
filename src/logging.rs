//! Crate-wide logging entry point, forwarding to `tracing`.
//!
//! Call sites import it by path: `use crate::app_log;`.

#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}
