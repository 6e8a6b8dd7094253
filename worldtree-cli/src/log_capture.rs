use log::Log;
use tokio::sync::mpsc;

/// A log record forwarded to the preview's log panel.
pub struct CapturedLog {
    pub level: log::Level,
    pub message: String,
}

/// Logger that filters like `env_logger` but sends records to the TUI
/// instead of stderr, which the alternate screen would garble.
struct ChannelLogger {
    filter: env_logger::Logger,
    tx: mpsc::UnboundedSender<CapturedLog>,
}

impl Log for ChannelLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if self.filter.enabled(record.metadata()) {
            let entry = CapturedLog {
                level: record.level(),
                message: format!("{}: {}", record.target(), record.args()),
            };
            // Receiver gone means the preview is shutting down.
            let _ = self.tx.send(entry);
        }
    }

    fn flush(&self) {}
}

fn filter_builder() -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
}

/// Plain stderr logging for the non-interactive commands.
pub fn install_stderr() -> anyhow::Result<()> {
    filter_builder().try_init()?;
    Ok(())
}

/// Route log records into a channel drained by the preview.
pub fn install_channel() -> anyhow::Result<mpsc::UnboundedReceiver<CapturedLog>> {
    let (tx, rx) = mpsc::unbounded_channel();
    let filter = filter_builder().build();
    let max_level = filter.filter();
    log::set_boxed_logger(Box::new(ChannelLogger { filter, tx }))?;
    log::set_max_level(max_level);
    Ok(rx)
}
