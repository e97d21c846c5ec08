use anyhow::{Context, Result, anyhow};
use serde_json::json;

use xrandr_screens::common::config::ScreensConfig;
use xrandr_screens::common::paths;
use xrandr_screens::display::{
    self, CommandLogger, Relation, Rotation, Screen, XrandrExecutor, build_command,
    parse_decimal, parse_gamma, parse_resolution,
};
use xrandr_screens::ui::prelude::*;

/// Everything `xscreens set` can change on one output
#[derive(Debug, Clone, Default)]
pub struct SetRequest {
    pub output: String,
    pub mode: Option<(u32, u32)>,
    pub primary: bool,
    pub enabled: Option<bool>,
    pub rotation: Option<Rotation>,
    pub position: Option<(Relation, String)>,
    pub brightness: Option<f64>,
    pub gamma: Option<(f64, f64, f64)>,
    pub dry_run: bool,
}

impl SetRequest {
    fn touches_details(&self) -> bool {
        self.brightness.is_some() || self.gamma.is_some()
    }
}

pub fn parse_mode_arg(s: &str) -> Result<(u32, u32), String> {
    parse_resolution(s).ok_or_else(|| format!("expected WxH, got '{}'", s))
}

pub fn parse_brightness_arg(s: &str) -> Result<f64, String> {
    parse_decimal(s).ok_or_else(|| format!("expected a number, got '{}'", s))
}

pub fn parse_gamma_arg(s: &str) -> Result<(f64, f64, f64), String> {
    parse_gamma(s).ok_or_else(|| format!("expected R:G:B, got '{}'", s))
}

fn make_executor(config: &ScreensConfig) -> Result<XrandrExecutor> {
    let mut executor = XrandrExecutor::new(config.xrandr_command.clone());
    executor
        .ensure_available()
        .context("xrandr is required to query outputs")?;
    if config.log_commands {
        executor = executor.with_logger(CommandLogger::from_default_dir()?);
    }
    Ok(executor)
}

pub fn handle_list(connected: bool, enabled: bool, details: bool) -> Result<()> {
    let config = ScreensConfig::load()?;
    let executor = make_executor(&config)?;
    let details = details || config.query_details;
    let merge = config.detail_merge();

    let screens = if enabled {
        display::enabled_screens(&executor, details, merge)?
    } else if connected {
        display::connected_screens(&executor, details, merge)?
    } else {
        display::screens(&executor, details, merge)?
    };

    if screens.is_empty() {
        emit(Level::Info, "display.list.empty", "No outputs found", None);
        return Ok(());
    }

    for screen in &screens {
        emit(
            Level::Info,
            "display.list.screen",
            &describe_screen(screen, details),
            Some(screen_json(screen)),
        );
    }
    Ok(())
}

fn describe_screen(screen: &Screen, details: bool) -> String {
    let mut text = screen.to_string();
    for mode in screen.modes() {
        text.push_str(&format!("\n    {}", mode));
    }
    if details {
        for (key, value) in screen.details() {
            text.push_str(&format!("\n    {}: {}", key, value));
        }
    }
    text
}

fn screen_json(screen: &Screen) -> serde_json::Value {
    let mut value = serde_json::to_value(screen).unwrap_or_else(|_| json!({}));
    if let Some(obj) = value.as_object_mut() {
        obj.insert("connected".to_string(), json!(screen.is_connected()));
        obj.insert("enabled".to_string(), json!(screen.is_enabled()));
        obj.insert(
            "current_mode".to_string(),
            json!(screen.current_mode().map(|m| m.mode_arg())),
        );
    }
    value
}

/// Record the request on the screen's pending settings
pub fn stage_request(screen: &mut Screen, request: &SetRequest) -> Result<()> {
    if let Some((width, height)) = request.mode {
        screen.set_resolution(width, height)?;
    }
    if request.primary {
        screen.set_primary(true);
    }
    if let Some(enabled) = request.enabled {
        screen.set_enabled(enabled);
    }
    if let Some(rotation) = request.rotation {
        screen.set_rotation(rotation);
    }
    if let Some((relation, target)) = &request.position {
        screen.set_position(*relation, target.clone());
    }
    if let Some(brightness) = request.brightness {
        screen.set_brightness(brightness);
    }
    if let Some((r, g, b)) = request.gamma {
        screen.set_gamma(r, g, b);
    }
    Ok(())
}

pub fn handle_set(request: SetRequest) -> Result<()> {
    let config = ScreensConfig::load()?;
    let executor = make_executor(&config)?;

    let mut screens =
        display::screens(&executor, request.touches_details(), config.detail_merge())?;
    let screen = screens
        .iter_mut()
        .find(|s| s.name() == request.output)
        .ok_or_else(|| anyhow!("No output named {}", request.output))?;

    stage_request(screen, &request)?;
    let command = build_command(screen)?;
    let line = command.command_line(&config.xrandr_command);

    if request.dry_run {
        emit(
            Level::Info,
            "display.set.dry_run",
            &line,
            Some(json!({ "args": command.args() })),
        );
        return Ok(());
    }

    screen.apply(&executor)?;
    emit(
        Level::Success,
        "display.set.applied",
        &format!("Applied: {}", line),
        None,
    );
    Ok(())
}

fn apply_to_enabled<F>(code: &str, describe: &str, change: F) -> Result<()>
where
    F: FnOnce(&mut [Screen]),
{
    let config = ScreensConfig::load()?;
    let executor = make_executor(&config)?;
    let mut screens = display::enabled_screens(&executor, true, config.detail_merge())?;
    if screens.is_empty() {
        emit(Level::Warn, code, "No enabled outputs", None);
        return Ok(());
    }

    change(&mut screens);
    display::apply_all_settings(&mut screens, &executor)?;

    let names: Vec<&str> = screens.iter().map(Screen::name).collect();
    emit(
        Level::Success,
        code,
        &format!("{} on {}", describe, names.join(", ")),
        Some(json!({ "outputs": names })),
    );
    Ok(())
}

pub fn handle_brightness(value: f64) -> Result<()> {
    apply_to_enabled(
        "display.brightness.applied",
        &format!("Brightness set to {}", value),
        |screens| display::set_all_brightness(screens, value),
    )
}

pub fn handle_gamma((r, g, b): (f64, f64, f64)) -> Result<()> {
    apply_to_enabled(
        "display.gamma.applied",
        &format!("Gamma set to {}:{}:{}", r, g, b),
        |screens| display::set_all_gamma(screens, r, g, b),
    )
}

pub fn handle_config_path() -> Result<()> {
    let path = paths::config_file()?;
    emit(
        Level::Info,
        "config.path",
        &path.display().to_string(),
        Some(json!({ "path": path })),
    );
    Ok(())
}

pub fn handle_config_show() -> Result<()> {
    let config = ScreensConfig::load()?;
    let text = toml::to_string_pretty(&config).context("serializing xscreens config")?;
    emit(
        Level::Info,
        "config.show",
        text.trim_end(),
        serde_json::to_value(&config).ok(),
    );
    Ok(())
}

pub fn handle_log_show(limit: usize) -> Result<()> {
    let logger = CommandLogger::from_default_dir()?;
    let logs = logger.get_logs()?;
    if logs.is_empty() {
        emit(Level::Info, "log.empty", "No commands logged", None);
        return Ok(());
    }

    for log in logs.iter().take(limit) {
        let status = if log.success { "ok" } else { "failed" };
        emit(
            if log.success { Level::Info } else { Level::Warn },
            "log.entry",
            &format!(
                "{} [{}] {} {}",
                log.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                status,
                log.program,
                log.args.join(" ")
            ),
            serde_json::to_value(log).ok(),
        );
    }
    Ok(())
}

pub fn handle_log_clear() -> Result<()> {
    CommandLogger::from_default_dir()?.clear_logs()?;
    emit(Level::Success, "log.cleared", "Command log cleared", None);
    Ok(())
}
