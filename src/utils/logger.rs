use crate::utils::error::{Result, SplitError};
use chrono::Local;
use std::fmt;
use std::path::Path;
use tracing::{Event, Subscriber};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::{DefaultFields, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_PREFIX: &str = "logs";
pub const LOG_FILE_SUFFIX: &str = "txt";

/// `2026-10-17 09:30:00 [info]: message`, one event per line.
pub struct DatedLineFormat;

impl<S, N> FormatEvent<S, N> for DatedLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} [{}]: ",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            event.metadata().level().to_string().to_lowercase()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

pub type FileLayer<S> =
    tracing_subscriber::fmt::Layer<S, DefaultFields, DatedLineFormat, RollingFileAppender>;

/// Appender rotating daily into `<dir>/logs.<YYYY-MM-DD>.txt`.
pub fn daily_file_appender(dir: &Path) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(dir)
        .map_err(|e| SplitError::Config {
            message: format!("cannot open log directory '{}': {}", dir.display(), e),
        })
}

pub fn file_layer<S>(appender: RollingFileAppender) -> FileLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .event_format(DatedLineFormat)
        .with_writer(appender)
}

fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose {
        "csv_city_split=debug,info"
    } else {
        "csv_city_split=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Compact stdout logging, plus a dated log file when `log_dir` is set.
pub fn init_cli_logger(verbose: bool, log_dir: Option<&Path>) -> Result<()> {
    let file = log_dir.map(daily_file_appender).transpose()?.map(file_layer);

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .with(file)
        .init();
    Ok(())
}

/// JSON lines on stdout, for runs collected by a log shipper.
pub fn init_json_logger(verbose: bool, log_dir: Option<&Path>) -> Result<()> {
    let file = log_dir.map(daily_file_appender).transpose()?.map(file_layer);

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .with(file)
        .init();
    Ok(())
}
