//! Console commands
//! This module defines all the commands that can be typed at the prompt.

use crate::core::ConsolePresenter;
use crate::state::AppState;

pub const HELP_TEXT: &str = "\
commands:
  scan          start a scan session (restarts a running one)
  stop          stop scanning
  list          show discovered devices
  select <n>    open device <n> in the detail view
  advertise     advertise this host as a peripheral
  save          write the current settings to the config file
  help          show this text
  quit          exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Scan,
    Stop,
    List,
    Select(usize),
    Advertise,
    Save,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let command = match words.next() {
            Some(word) => word.to_ascii_lowercase(),
            None => return Err("empty command".to_string()),
        };

        let parsed = match command.as_str() {
            "scan" => Self::Scan,
            "stop" => Self::Stop,
            "list" | "ls" => Self::List,
            "select" => {
                let index = words
                    .next()
                    .ok_or_else(|| "select needs a device index".to_string())?;
                let index = index
                    .parse::<usize>()
                    .map_err(|_| format!("invalid device index: {}", index))?;
                Self::Select(index)
            }
            "advertise" => Self::Advertise,
            "save" => Self::Save,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command: {}", other)),
        };
        Ok(parsed)
    }
}

/// Runs one command. Returns false when the tool should exit.
pub async fn execute(command: Command, app_state: &AppState) -> Result<bool, String> {
    match command {
        Command::Scan => start_scan(app_state).await?,
        Command::Stop => stop_scan(app_state).await?,
        Command::List => list_devices(app_state).await?,
        Command::Select(index) => select_device(index, app_state).await?,
        Command::Advertise => start_advertising(app_state).await?,
        Command::Save => save_config(app_state).await?,
        Command::Help => println!("{}", HELP_TEXT),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

/// Starts a scan session. Progress is rendered by the presenter as devices arrive.
pub async fn start_scan(app_state: &AppState) -> Result<(), String> {
    app_state
        .bluetooth_manager
        .start_scan()
        .await
        .map_err(|e| e.to_string())
}

pub async fn stop_scan(app_state: &AppState) -> Result<(), String> {
    app_state
        .bluetooth_manager
        .stop_scan()
        .await
        .map_err(|e| e.to_string())
}

pub async fn list_devices(app_state: &AppState) -> Result<(), String> {
    let view = app_state
        .bluetooth_manager
        .devices()
        .await
        .map_err(|e| e.to_string())?;
    print!("{}", ConsolePresenter::format_view(&view));
    Ok(())
}

/// Hands the selected device off to the detail view
pub async fn select_device(index: usize, app_state: &AppState) -> Result<(), String> {
    let selection = app_state
        .bluetooth_manager
        .select_device(index)
        .await
        .map_err(|e| e.to_string())?;
    match selection {
        Some(selection) => ConsolePresenter::show_detail(&selection),
        None => println!("No device at index {}", index),
    }
    Ok(())
}

pub async fn start_advertising(app_state: &AppState) -> Result<(), String> {
    let in_effect = app_state
        .bluetooth_manager
        .start_advertising()
        .await
        .map_err(|e| e.to_string())?;
    println!(
        "Advertising: mode {:?}, tx power {:?}, timeout {} ms",
        in_effect.mode, in_effect.tx_power, in_effect.timeout_ms
    );
    Ok(())
}

/// Writes the active settings back to the file they were loaded from
pub async fn save_config(app_state: &AppState) -> Result<(), String> {
    app_state
        .bluetooth_manager
        .config()
        .save_config(&app_state.config_path)
        .await
        .map_err(|e| e.to_string())?;
    println!("Settings saved to {}", app_state.config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("scan"), Ok(Command::Scan));
        assert_eq!(Command::parse("  STOP "), Ok(Command::Stop));
        assert_eq!(Command::parse("ls"), Ok(Command::List));
        assert_eq!(Command::parse("select 2"), Ok(Command::Select(2)));
        assert_eq!(Command::parse("exit"), Ok(Command::Quit));
        assert_eq!(Command::parse("save"), Ok(Command::Save));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Command::parse("").is_err());
        assert_eq!(
            Command::parse("select"),
            Err("select needs a device index".to_string())
        );
        assert_eq!(
            Command::parse("select -1"),
            Err("invalid device index: -1".to_string())
        );
        assert_eq!(
            Command::parse("connect"),
            Err("unknown command: connect".to_string())
        );
    }
}
