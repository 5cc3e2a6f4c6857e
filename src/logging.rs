use std::fmt;

use console::Style;
use serde::Deserialize;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Per-level styles in `console` dotted notation, e.g. `"red.on_white.bold"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LevelStyles {
    pub error: String,
    pub warn: String,
    pub info: String,
    pub debug: String,
    pub trace: String,
}

impl Default for LevelStyles {
    fn default() -> Self {
        Self {
            error: "red".into(),
            warn: "yellow".into(),
            info: "green".into(),
            debug: "cyan".into(),
            trace: "dim".into(),
        }
    }
}

impl LevelStyles {
    pub fn style_for(&self, level: Level) -> &str {
        match level {
            Level::ERROR => &self.error,
            Level::WARN => &self.warn,
            Level::INFO => &self.info,
            Level::DEBUG => &self.debug,
            _ => &self.trace,
        }
    }
}

/// `[LEVEL] message fields`, with the level label styled per `LevelStyles`.
pub struct LevelFormat {
    styles: [Style; 5],
}

impl LevelFormat {
    pub fn new(styles: &LevelStyles) -> Self {
        let style = |level| Style::from_dotted_str(styles.style_for(level)).for_stderr();
        Self {
            styles: [
                style(Level::ERROR),
                style(Level::WARN),
                style(Level::INFO),
                style(Level::DEBUG),
                style(Level::TRACE),
            ],
        }
    }

    fn style(&self, level: Level) -> &Style {
        let idx = match level {
            Level::ERROR => 0,
            Level::WARN => 1,
            Level::INFO => 2,
            Level::DEBUG => 3,
            _ => 4,
        };
        &self.styles[idx]
    }
}

impl<S, N> FormatEvent<S, N> for LevelFormat
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
        let level = *event.metadata().level();
        let label = format!("[{}]", level);
        write!(writer, "{} ", self.style(level).apply_to(label))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the `info` default.
pub fn init(styles: &LevelStyles) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .event_format(LevelFormat::new(styles))
        .try_init();
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette() {
        let styles = LevelStyles::default();
        assert_eq!(styles.style_for(Level::DEBUG), "cyan");
        assert_eq!(styles.style_for(Level::INFO), "green");
        assert_eq!(styles.style_for(Level::WARN), "yellow");
        assert_eq!(styles.style_for(Level::ERROR), "red");
    }

    #[test]
    fn partial_override() {
        let styles: LevelStyles = serde_json::from_str(r#"{"error":"red.on_white"}"#).unwrap();
        assert_eq!(styles.error, "red.on_white");
        assert_eq!(styles.info, "green");
    }

    #[test]
    fn format_keeps_plain_label_without_colors() {
        let format = LevelFormat::new(&LevelStyles::default());
        let styled = format.style(Level::WARN).apply_to("[WARN]").force_styling(false);
        assert_eq!(styled.to_string(), "[WARN]");
    }
}
