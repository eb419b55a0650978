mod commands;
mod input;
mod menu;
mod retry;
mod shutdown;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use sightline_core::memory::layout::timing;
use sightline_core::{SettingsSnapshot, Viewport};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const FALLBACK_VIEWPORT: (f32, f32) = (1920.0, 1080.0);

#[derive(Parser)]
#[command(name = "sightline")]
#[command(version, about = "Entity overlay core for a running game client")]
struct Cli {
    #[command(flatten)]
    target: TargetArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Where to attach and how to interpret the target's memory.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Offset table (JSON)
    #[arg(
        short,
        long,
        global = true,
        default_value = "offsets.json",
        env = "SIGHTLINE_OFFSETS"
    )]
    pub offsets: PathBuf,

    /// Target executable name
    #[arg(long, global = true, default_value = "cs2.exe", env = "SIGHTLINE_PROCESS")]
    pub process: String,

    /// Module whose base address the offsets are relative to
    #[arg(long, global = true, default_value = "client.dll", env = "SIGHTLINE_MODULE")]
    pub module: String,

    /// Viewport width in pixels (defaults to the primary screen)
    #[arg(long, global = true)]
    pub width: Option<f32>,

    /// Viewport height in pixels (defaults to the primary screen)
    #[arg(long, global = true)]
    pub height: Option<f32>,

    /// Delay before the single discovery retry, in milliseconds
    #[arg(long, global = true, default_value_t = timing::DISCOVERY_RETRY_DELAY_MS)]
    pub retry_delay_ms: u64,
}

impl TargetArgs {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Explicit size first, then the primary screen, then 1920x1080.
    pub fn viewport(&self) -> Viewport {
        let (fallback_w, fallback_h) = Viewport::primary_screen()
            .map(|v| (v.width, v.height))
            .unwrap_or(FALLBACK_VIEWPORT);
        Viewport::new(
            self.width.unwrap_or(fallback_w),
            self.height.unwrap_or(fallback_h),
        )
    }
}

/// Which overlay elements start enabled.
#[derive(Args, Debug, Clone, Default)]
pub struct ToggleArgs {
    /// Include teammates
    #[arg(long)]
    pub all_teams: bool,
    #[arg(long)]
    pub no_head: bool,
    #[arg(long)]
    pub no_skeleton: bool,
    #[arg(long)]
    pub no_box: bool,
    #[arg(long)]
    pub no_health_bar: bool,
    #[arg(long)]
    pub no_health_text: bool,
    #[arg(long)]
    pub no_name: bool,
}

impl ToggleArgs {
    pub fn initial_settings(&self, target_fps: u32) -> SettingsSnapshot {
        SettingsSnapshot {
            team_filter: !self.all_teams,
            head_marker: !self.no_head,
            skeleton: !self.no_skeleton,
            bounding_box: !self.no_box,
            health_bar: !self.no_health_bar,
            health_text: !self.no_health_text,
            name: !self.no_name,
            target_fps,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Initial target frame rate
    #[arg(long, default_value_t = timing::DEFAULT_TARGET_FPS)]
    pub fps: u32,

    #[arg(long, default_value_t = timing::MIN_TARGET_FPS)]
    pub min_fps: u32,

    #[arg(long, default_value_t = timing::MAX_TARGET_FPS)]
    pub max_fps: u32,

    /// Do not open the interactive control menu
    #[arg(long)]
    pub no_menu: bool,

    #[command(flatten)]
    pub toggles: ToggleArgs,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            fps: timing::DEFAULT_TARGET_FPS,
            min_fps: timing::MIN_TARGET_FPS,
            max_fps: timing::MAX_TARGET_FPS,
            no_menu: false,
            toggles: ToggleArgs::default(),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Attach and run the paced overlay loop (default)
    Run(RunArgs),
    /// Attach, capture a single cycle and print it as JSON
    Snapshot {
        /// Print the draw commands instead of the entity records
        #[arg(long)]
        draw: bool,

        #[command(flatten)]
        toggles: ToggleArgs,
    },
    /// Show the offset table as it would be loaded
    Offsets,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sightline=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!("Target: {:?}", cli.target);

    match cli.command {
        Some(Command::Run(args)) => commands::run::run(&cli.target, &args),
        Some(Command::Snapshot { draw, toggles }) => {
            commands::snapshot::run(&cli.target, &toggles, draw)
        }
        Some(Command::Offsets) => commands::offsets::run(&cli.target),
        None => commands::run::run(&cli.target, &RunArgs::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["sightline"]).unwrap();
        assert_eq!(cli.target.offsets, PathBuf::from("offsets.json"));
        assert_eq!(cli.target.process, "cs2.exe");
        assert_eq!(cli.target.module, "client.dll");
        assert_eq!(cli.target.retry_delay(), Duration::from_secs(5));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_run_flags() {
        let cli = Cli::try_parse_from([
            "sightline",
            "run",
            "--fps",
            "144",
            "--all-teams",
            "--no-name",
            "--width",
            "2560",
        ])
        .unwrap();

        let Some(Command::Run(args)) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.fps, 144);
        let settings = args.toggles.initial_settings(args.fps);
        assert!(!settings.team_filter);
        assert!(!settings.name);
        assert!(settings.skeleton);
        assert_eq!(settings.target_fps, 144);
        assert_eq!(cli.target.width, Some(2560.0));
    }

    #[test]
    fn test_explicit_viewport_wins() {
        let cli = Cli::try_parse_from(["sightline", "--width", "800", "--height", "600"]).unwrap();
        let viewport = cli.target.viewport();
        assert_eq!(viewport.width, 800.0);
        assert_eq!(viewport.height, 600.0);
    }
}
