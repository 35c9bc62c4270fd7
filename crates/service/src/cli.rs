//! Command line of `handheldd`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use openhandheld_targets::TargetKind;

use crate::config::ServiceConfig;

#[derive(Parser, Debug)]
#[command(name = "handheldd")]
#[command(about = "Handheld companion daemon - maps built-in and external controllers onto a virtual gamepad")]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: the per-user config directory)
    #[arg(short, long, global = true, env = "HANDHELDD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Virtual pad presented to games
    #[arg(long, global = true, value_enum)]
    pub target: Option<TargetArg>,

    /// Tick period in milliseconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..=1000))]
    pub tick_ms: Option<u64>,

    /// Log level when RUST_LOG is unset
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run the daemon until interrupted (default)
    Run,
    /// Load and validate the configuration, then exit
    CheckConfig,
    /// Print the default configuration as JSON
    PrintDefaultConfig,
    /// List HID devices and the adapter that would drive each one
    ListDevices,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetArg {
    #[value(name = "xbox360", alias = "xbox")]
    Xbox360,
    #[value(name = "dualshock4", alias = "ds4")]
    DualShock4,
}

impl From<TargetArg> for TargetKind {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Xbox360 => TargetKind::Xbox360,
            TargetArg::DualShock4 => TargetKind::DualShock4,
        }
    }
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Run)
    }

    /// Apply command-line overrides on top of the loaded file.
    pub fn apply(&self, config: &mut ServiceConfig) {
        if let Some(target) = self.target {
            config.target = target.into();
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if let Some(level) = &self.log_level {
            config.log_level.clone_from(level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn bare_invocation_runs() -> TestResult {
        let cli = Cli::try_parse_from(["handheldd"])?;
        assert_eq!(cli.command(), Command::Run);
        assert!(cli.config.is_none());
        Ok(())
    }

    #[test]
    fn overrides_replace_file_values() -> TestResult {
        let cli = Cli::try_parse_from([
            "handheldd",
            "--target",
            "ds4",
            "--tick-ms",
            "4",
            "--log-level",
            "debug",
            "run",
        ])?;
        let mut config = ServiceConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.target, TargetKind::DualShock4);
        assert_eq!(config.tick_interval_ms, 4);
        assert_eq!(config.log_level, "debug");
        Ok(())
    }

    #[test]
    fn global_flags_follow_subcommand() -> TestResult {
        let cli = Cli::try_parse_from(["handheldd", "check-config", "--config", "/tmp/h.json"])?;
        assert_eq!(cli.command(), Command::CheckConfig);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/h.json")));
        Ok(())
    }

    #[test]
    fn zero_tick_is_rejected() {
        assert!(Cli::try_parse_from(["handheldd", "--tick-ms", "0"]).is_err());
    }

    #[test]
    fn unknown_target_is_rejected() {
        assert!(Cli::try_parse_from(["handheldd", "--target", "gamecube"]).is_err());
    }

    #[test]
    fn every_subcommand_parses() -> TestResult {
        for (name, expected) in [
            ("run", Command::Run),
            ("check-config", Command::CheckConfig),
            ("print-default-config", Command::PrintDefaultConfig),
            ("list-devices", Command::ListDevices),
        ] {
            assert_eq!(Cli::try_parse_from(["handheldd", name])?.command(), expected);
        }
        Ok(())
    }
}
