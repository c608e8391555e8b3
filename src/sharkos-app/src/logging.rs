// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Parse a level name; `None` for missing or unknown names.
pub fn parse_level(log_level: Option<&str>) -> Option<Level> {
    log_level.and_then(|s| s.trim().parse::<Level>().ok())
}

/// Initialize logging with optional level from config.
/// Falls back to INFO if level is None or invalid.
///
/// Output goes to stderr so stdout can carry decoded messages.
pub fn init_logging(log_level: Option<&str>) {
    let level = parse_level(log_level).unwrap_or(Level::INFO);

    FmtSubscriber::builder()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level(Some("debug")), Some(Level::DEBUG));
        assert_eq!(parse_level(Some(" WARN ")), Some(Level::WARN));
        assert_eq!(parse_level(Some("loud")), None);
        assert_eq!(parse_level(None), None);
    }
}
