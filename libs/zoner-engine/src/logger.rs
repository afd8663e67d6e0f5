use std::fmt;

use zoner_api::Value;

/// Diagnostic sink consulted at fixed points of a conversion.
///
/// The engine never branches on anything a logger does, and nothing here
/// can fail a conversion.
pub trait MapLogger {
    fn is_log_enabled(&self) -> bool;

    fn is_verbose_enabled(&self) -> bool;

    fn log_impl(&self, msg: &str);

    fn verbose_impl(&self, msg: &str, value: &Value);

    fn log(&self, msg: fmt::Arguments<'_>) {
        if self.is_log_enabled() {
            self.log_impl(&msg.to_string());
        }
    }

    fn verbose_log(&self, msg: fmt::Arguments<'_>, value: &Value) {
        if self.is_verbose_enabled() {
            self.verbose_impl(&msg.to_string(), value);
        }
    }
}

impl<L: MapLogger + ?Sized> MapLogger for &L {
    fn is_log_enabled(&self) -> bool {
        (**self).is_log_enabled()
    }

    fn is_verbose_enabled(&self) -> bool {
        (**self).is_verbose_enabled()
    }

    fn log_impl(&self, msg: &str) {
        (**self).log_impl(msg)
    }

    fn verbose_impl(&self, msg: &str, value: &Value) {
        (**self).verbose_impl(msg, value)
    }
}

/// Forwards to `tracing`: messages at DEBUG, values at TRACE.
#[derive(Debug, Clone, Copy)]
pub struct TracingLogger {
    enabled: bool,
    verbose: bool,
}

impl TracingLogger {
    pub fn new(enabled: bool, verbose: bool) -> Self {
        Self { enabled, verbose }
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl MapLogger for TracingLogger {
    fn is_log_enabled(&self) -> bool {
        self.enabled && tracing::enabled!(target: "zoner", tracing::Level::DEBUG)
    }

    fn is_verbose_enabled(&self) -> bool {
        self.verbose && tracing::enabled!(target: "zoner", tracing::Level::TRACE)
    }

    fn log_impl(&self, msg: &str) {
        tracing::debug!(target: "zoner", "{msg}");
    }

    fn verbose_impl(&self, msg: &str, value: &Value) {
        tracing::trace!(target: "zoner", value = %value.to_json(), "{msg}");
    }
}

/// Logger with both flags off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl MapLogger for NoopLogger {
    fn is_log_enabled(&self) -> bool {
        false
    }

    fn is_verbose_enabled(&self) -> bool {
        false
    }

    fn log_impl(&self, _msg: &str) {}

    fn verbose_impl(&self, _msg: &str, _value: &Value) {}
}
