use std::io::Write;

use chrono::Local;
use env_logger::{Builder, Env};
use log::SetLoggerError;

/// Installs the process logger. `RUST_LOG` overrides `default_filter`.
pub fn init(default_filter: &str) -> Result<(), SetLoggerError> {
    Builder::from_env(Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                Local::now().to_rfc3339(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()
}
