//! Build script for picogrove-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml and compiles it into the firmware

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use picogrove_core::config::{BacklightKind, ConfigError, Settings};

fn main() {
    setup_linker();
    let settings = load_settings();
    write_settings(&settings);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Parse and validate board.toml
fn load_settings() -> Settings {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: board.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a board.toml settings file.               ║\n\
            ║  Please create one in the picogrove-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read board.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Syntax errors and unknown values both surface here
    let settings: Settings = match toml::from_str(&config_content) {
        Ok(settings) => settings,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid board.toml                                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    if let Err(e) = settings.validate() {
        let detail = match e {
            ConfigError::SerialBaudrate => {
                "must be greater than zero".to_string()
            }
            ConfigError::I2cFrequency => format!(
                "must be {}-{} Hz",
                Settings::I2C_FREQUENCY_RANGE.start(),
                Settings::I2C_FREQUENCY_RANGE.end()
            ),
            ConfigError::PwmFrequency => format!(
                "must be {}-{} Hz",
                Settings::PWM_FREQUENCY_RANGE.start(),
                Settings::PWM_FREQUENCY_RANGE.end()
            ),
            ConfigError::RangingTimeout => format!(
                "must be {}-{} us",
                Settings::RANGING_TIMEOUT_RANGE.start(),
                Settings::RANGING_TIMEOUT_RANGE.end()
            ),
        };
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid setting in board.toml                            ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            ║  • {:<62} ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format!("{} {}", e.field(), detail)
        );
    }

    println!("cargo:warning=board.toml validated successfully");
    settings
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Emit `SETTINGS` as a constant the firmware includes
fn write_settings(settings: &Settings) {
    let backlight = match settings.display.backlight {
        BacklightKind::Absent => "Absent",
        BacklightKind::Pca9633 => "Pca9633",
        BacklightKind::Sgm31323 => "Sgm31323",
    };

    let source = format!(
        "/// Settings compiled from board.toml\n\
         pub const SETTINGS: Settings = Settings {{\n    \
             serial_baudrate: {},\n    \
             i2c_frequency_hz: {},\n    \
             pwm_frequency_hz: {},\n    \
             ranging_timeout_us: {},\n    \
             display: DisplaySettings {{\n        \
                 enabled: {},\n        \
                 backlight: BacklightKind::{},\n    \
             }},\n\
         }};\n",
        settings.serial_baudrate,
        settings.i2c_frequency_hz,
        settings.pwm_frequency_hz,
        settings.ranging_timeout_us,
        settings.display.enabled,
        backlight,
    );

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("settings.rs"), source).unwrap();
}
