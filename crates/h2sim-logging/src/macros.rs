//! ---
//! ems_section: "03-persistence-logging"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Structured logging adapters for simulation runs."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
/// Emit an informational log enriched with run context.
#[macro_export]
macro_rules! h2_info {
    (context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            tracing::Level::INFO,
            scenario = ctx.scenario.unwrap_or(""),
            month = ctx.month.unwrap_or(""),
            mode = ctx.mode.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
    ($($arg:tt)+) => {{
        $crate::h2_info!(context = $crate::LogContext::default(), $($arg)+)
    }};
}

/// Emit a warning enriched with run context.
#[macro_export]
macro_rules! h2_warn {
    (context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            tracing::Level::WARN,
            scenario = ctx.scenario.unwrap_or(""),
            month = ctx.month.unwrap_or(""),
            mode = ctx.mode.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
    ($($arg:tt)+) => {{
        $crate::h2_warn!(context = $crate::LogContext::default(), $($arg)+)
    }};
}

/// Emit a debug log enriched with run context.
#[macro_export]
macro_rules! h2_debug {
    (context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            tracing::Level::DEBUG,
            scenario = ctx.scenario.unwrap_or(""),
            month = ctx.month.unwrap_or(""),
            mode = ctx.mode.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
    ($($arg:tt)+) => {{
        $crate::h2_debug!(context = $crate::LogContext::default(), $($arg)+)
    }};
}
