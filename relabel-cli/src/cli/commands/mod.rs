pub mod actions;
pub mod apply;
pub mod config;

use anyhow::{Result, bail};
use is_terminal::IsTerminal;

use crate::config::Config;
use crate::rename::ShortRowPolicy;
use crate::rules::RulesFormat;

/// Rules file layout from the config, with command line flags applied on top
pub(crate) fn rules_format(
    config: &Config,
    delimiter: Option<char>,
    has_headers: bool,
    skip_short_rows: bool,
) -> Result<RulesFormat> {
    let mut format = config.rules_format()?;

    if let Some(delimiter) = delimiter {
        if !delimiter.is_ascii() {
            bail!("Delimiter must be an ASCII character, got '{}'", delimiter);
        }
        format.delimiter = delimiter as u8;
    }
    if has_headers {
        format.has_headers = true;
    }
    if skip_short_rows {
        format.short_rows = ShortRowPolicy::Skip;
    }

    Ok(format)
}

/// Turn colors off for --no-color or when stdout is not a terminal
pub(crate) fn configure_colors(no_color: bool) {
    if no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let config = Config::default();

        let format = rules_format(&config, Some(';'), true, true).unwrap();

        assert_eq!(format.delimiter, b';');
        assert!(format.has_headers);
        assert_eq!(format.short_rows, ShortRowPolicy::Skip);
    }

    #[test]
    fn test_config_used_without_flags() {
        let config = Config::default();
        assert_eq!(rules_format(&config, None, false, false).unwrap(), RulesFormat::default());
    }

    #[test]
    fn test_non_ascii_delimiter_flag_is_rejected() {
        assert!(rules_format(&Config::default(), Some('§'), false, false).is_err());
    }
}
