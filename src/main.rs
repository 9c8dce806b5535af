use ble_scan_session_lib::commands::{self, Command};
use ble_scan_session_lib::config::AppConfig;
use ble_scan_session_lib::logging;
use ble_scan_session_lib::state::AppState;
use ble_scan_session_lib::utils::spawn_line_reader;
use log::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = AppConfig::resolve_path(std::env::args().nth(1));
    // read before the logger exists; the log level comes from the file
    let stored = AppConfig::read_config(&config_path).await?;
    let found = stored.is_some();
    let config = stored.unwrap_or_default();

    if let Err(e) = logging::init(&config.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    if found {
        info!("Config loaded from {:?}", config_path);
    } else {
        warn!("Config file not found at {:?}, using default.", config_path);
    }

    let app_state = AppState::new(config, config_path).await?;
    let config = app_state.bluetooth_manager.config().clone();

    if config.advertise.enabled {
        if let Err(e) = app_state.bluetooth_manager.start_advertising().await {
            warn!("Advertising unavailable: {}", e);
        }
    }
    if config.scanner.auto_start {
        if let Err(e) = commands::start_scan(&app_state).await {
            warn!("Initial scan failed: {}", e);
        }
    }

    println!("{}", commands::HELP_TEXT);
    let mut lines = spawn_line_reader(std::io::BufReader::new(std::io::stdin()));
    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let command = match Command::parse(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                match commands::execute(command, &app_state).await {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => println!("{}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted.");
                break;
            }
        }
    }

    app_state.bluetooth_manager.shutdown().await?;
    Ok(())
}
