/// Sink for messages produced while classifying. Delivery is fire-and-forget.
pub trait Diagnostics {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn info(&self, message: &str) {
        log::info!("{message}");
    }

    fn error(&self, message: &str) {
        log::error!("{message}");
    }
}
