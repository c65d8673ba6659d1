//! Surface probe
//!
//! Boots the WinRT backend on a simulated shell, opens its window and reports
//! what a Vulkan application would see: the window-system info and the
//! instance extensions needed for a surface.
//!
//! Usage: `surface_probe [config.toml|config.ron]`

use std::path::PathBuf;

use native_surface::foundation::logging;
use native_surface::prelude::*;
use native_surface::video::winrt::{DeviceFamily, Orientation};

fn load_config() -> Result<VideoConfig, ConfigError> {
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = VideoConfig::load_or_default(path.as_deref())?;
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    logging::init_with_level(&config.log_level);

    log::info!("Booting simulated WinRT shell...");
    let shell = FixedShell::new(1280.0, 720.0)
        .with_dpi(144.0)
        .with_orientation(Orientation::Landscape)
        .with_device_family(DeviceFamily::Desktop);
    let winrt = WinRtBootstrap::new(shell);

    let mut video = VideoSubsystem::new();
    video.init(&[&winrt], &config)?;
    println!("driver: {}", video.current_driver().unwrap_or("none"));
    for display in video.displays() {
        let mode = display.current_mode;
        println!("display: {}x{} ({:?})", mode.width, mode.height, mode.format);
    }

    let window = video.create_window("surface probe", 100, 100, 640, 480, WindowFlags::VULKAN)?;
    if let Some(state) = video.window(window) {
        println!("window: {:?} at {:?}, flags {:?}", state.size(), state.position(), state.flags());
    }

    let info = video.window_wm_info(window, SYSWM_INFO_VERSION)?;
    println!("window system: {} (subsystem {})", info.identity(), info.identity().subsystem_tag());
    println!("handles: {:?}", info.handles);

    match surface_instance_extensions(&video) {
        Ok(names) => {
            for name in names {
                println!("extension: {}", name.to_string_lossy());
            }
        }
        Err(err) => println!("no Vulkan surface: {err}"),
    }

    if let Err(err) = video.create_window("second", 0, 0, 1, 1, WindowFlags::empty()) {
        println!("second window: {err}");
    }

    video.destroy_window(window)?;
    video.quit();
    log::info!("Surface probe finished");
    Ok(())
}
