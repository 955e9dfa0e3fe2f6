use std::fmt::Write as _;
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Tracing layer that prints every event to the browser console (stderr on
/// native builds), routed by level.
struct ConsoleLayer;

impl<S> tracing_subscriber::Layer<S> for ConsoleLayer
where
    S: tracing::Subscriber,
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let level = *metadata.level();

        let mut line = format!("[{}] {}: ", level, metadata.target());
        let mut visitor = MessageVisitor(&mut line);
        event.record(&mut visitor);

        emit(level, &line);
    }
}

struct MessageVisitor<'a>(&'a mut String);

impl<'a> tracing::field::Visit for MessageVisitor<'a> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.0, "{:?}", value);
        } else {
            let _ = write!(self.0, " {}={:?}", field.name(), value);
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.0.push_str(value);
        } else {
            let _ = write!(self.0, " {}={}", field.name(), value);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::ERROR => web_sys::console::error_1(&value),
        Level::WARN => web_sys::console::warn_1(&value),
        Level::INFO => web_sys::console::info_1(&value),
        _ => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{line}");
}

/// Parse a level name, defaulting to `info` for anything unrecognised.
pub fn level_filter(name: &str) -> LevelFilter {
    Level::from_str(name.trim())
        .map(LevelFilter::from_level)
        .unwrap_or(LevelFilter::INFO)
}

/// Install the console subscriber. Safe to call more than once.
pub fn init(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(ConsoleLayer)
        .with(level_filter(level))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_parse_case_insensitively() {
        assert_eq!(level_filter("debug"), LevelFilter::DEBUG);
        assert_eq!(level_filter("WARN"), LevelFilter::WARN);
        assert_eq!(level_filter(" error "), LevelFilter::ERROR);
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        assert_eq!(level_filter("chatty"), LevelFilter::INFO);
        assert_eq!(level_filter(""), LevelFilter::INFO);
    }

    #[test]
    fn init_twice_does_not_panic() {
        init("debug");
        init("info");
        tracing::info!(target: "burnfolder::tests", "logging ready");
    }
}
