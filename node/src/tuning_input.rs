use ball_tracker_common::params::{Control, ParameterSet};
use ball_tracker_detector::TuningHandle;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// One operator command read from stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Set(Control, u32),
    Show,
    /// Back to the parameters the node started with.
    Reset,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown control '{0}'")]
    UnknownControl(String),
    #[error("invalid value '{0}'")]
    BadValue(String),
    #[error("expected `<control>=<value>`, `<control> <value>`, `show` or `reset`, got '{0}'")]
    Malformed(String),
}

/// Parse `name=value`, `name value`, `show` or `reset`. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    if line.eq_ignore_ascii_case("show") {
        return Ok(Some(Command::Show));
    }
    if line.eq_ignore_ascii_case("reset") {
        return Ok(Some(Command::Reset));
    }

    let (name, value) = line
        .split_once('=')
        .or_else(|| line.split_once(char::is_whitespace))
        .ok_or_else(|| CommandError::Malformed(line.to_string()))?;
    let (name, value) = (name.trim(), value.trim());

    let control =
        Control::from_name(name).ok_or_else(|| CommandError::UnknownControl(name.to_string()))?;
    let value = value
        .parse::<u32>()
        .map_err(|_| CommandError::BadValue(value.to_string()))?;
    Ok(Some(Command::Set(control, value)))
}

/// Apply one command. Returns the parameters in effect afterwards.
pub fn apply(command: Command, handle: &TuningHandle, initial: ParameterSet) -> ParameterSet {
    match command {
        Command::Set(control, value) => {
            let applied = handle.set(control, value);
            info!(control = control.name(), value = applied.get(control), "control updated");
            applied
        }
        Command::Show => {
            let params = handle.current();
            for control in Control::ALL {
                info!(
                    control = control.name(),
                    value = params.get(control),
                    max = control.max()
                );
            }
            params
        }
        Command::Reset => {
            let params = handle.replace(initial);
            info!("parameters reset to startup values");
            params
        }
    }
}

/// Read operator commands until stdin closes, applying each to `handle`.
/// `initial` is what `reset` restores.
pub async fn run(handle: TuningHandle, initial: ParameterSet) {
    let names: Vec<&str> = Control::ALL.iter().map(|c| c.name()).collect();
    info!(
        controls = names.join(","),
        "tuning mode: type `<control>=<value>`, `show` or `reset`"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "failed to read tuning input");
                break;
            }
        };

        match parse_command(&line) {
            Ok(Some(command)) => {
                apply(command, &handle, initial);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "ignoring tuning input"),
        }
    }
    info!("tuning input closed, parameters frozen");
}

#[cfg(test)]
mod tests {
    use super::*;
    use ball_tracker_detector::{LiveTuning, ParameterSource};

    #[test]
    fn parses_both_assignment_forms() {
        assert_eq!(
            parse_command("hue_min=12").unwrap(),
            Some(Command::Set(Control::HueMin, 12))
        );
        assert_eq!(
            parse_command("  sat_max   200 ").unwrap(),
            Some(Command::Set(Control::SatMax, 200))
        );
        assert_eq!(
            parse_command("size_min = 4").unwrap(),
            Some(Command::Set(Control::SizeMin, 4))
        );
    }

    #[test]
    fn show_and_blank_lines() {
        assert_eq!(parse_command("show").unwrap(), Some(Command::Show));
        assert_eq!(parse_command("SHOW").unwrap(), Some(Command::Show));
        assert_eq!(parse_command("reset").unwrap(), Some(Command::Reset));
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            parse_command("brightness=3"),
            Err(CommandError::UnknownControl("brightness".into()))
        );
        assert_eq!(
            parse_command("hue_min=-1"),
            Err(CommandError::BadValue("-1".into()))
        );
        assert_eq!(
            parse_command("hue_min"),
            Err(CommandError::Malformed("hue_min".into()))
        );
    }

    #[test]
    fn reset_restores_startup_parameters() {
        let initial = ParameterSet::default().with(Control::HueMin, 10);
        let live = LiveTuning::new(initial);
        let handle = live.handle();

        let moved = apply(Command::Set(Control::HueMin, 40), &handle, initial);
        assert_eq!(moved.hue_min, 40);
        assert_eq!(live.snapshot().hue_min, 40);

        assert_eq!(apply(Command::Reset, &handle, initial), initial);
        assert_eq!(live.snapshot(), initial);
        assert_eq!(apply(Command::Show, &handle, initial), initial);
    }
}
