//! CLI argument definitions for the Charla skill server.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Charla: a Spanish conversational voice skill backed by a chat-completion API.
#[derive(Parser, Debug, Default)]
#[command(name = "charla", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Address to bind the skill server to.
    #[arg(long = "host")]
    pub host: Option<String>,

    /// Skill server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Priority: --config flag > CHARLA_CONFIG env var > ~/.charla/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        pick_config_path(
            self.config.clone(),
            std::env::var("CHARLA_CONFIG").ok(),
            std::env::var("HOME").ok(),
        )
    }

    /// Priority: --port flag > CHARLA_PORT env var > config file value.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        pick_port(self.port, std::env::var("CHARLA_PORT").ok(), config_port)
    }

    pub fn resolve_host(&self, config_host: &str) -> String {
        self.host.clone().unwrap_or_else(|| config_host.to_string())
    }

    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// OPENAI_API_KEY wins over the config file; blank values count as unset.
pub fn resolve_api_key(config_key: Option<String>) -> Option<String> {
    pick_api_key(std::env::var("OPENAI_API_KEY").ok(), config_key)
}

fn pick_config_path(flag: Option<PathBuf>, env: Option<String>, home: Option<String>) -> PathBuf {
    if let Some(p) = flag {
        return p;
    }
    if let Some(p) = env.filter(|p| !p.is_empty()) {
        return PathBuf::from(p);
    }
    match home {
        Some(home) => PathBuf::from(home).join(".charla").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

fn pick_port(flag: Option<u16>, env: Option<String>, config_port: u16) -> u16 {
    if let Some(p) = flag {
        return p;
    }
    if let Some(p) = env.and_then(|v| v.parse::<u16>().ok()) {
        return p;
    }
    config_port
}

fn pick_api_key(env: Option<String>, config_key: Option<String>) -> Option<String> {
    env.filter(|k| !k.trim().is_empty())
        .or_else(|| config_key.filter(|k| !k.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "charla",
            "--config",
            "/etc/charla.toml",
            "--host",
            "0.0.0.0",
            "-p",
            "8080",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/etc/charla.toml")));
        assert_eq!(args.resolve_host("127.0.0.1"), "0.0.0.0");
        assert_eq!(args.port, Some(8080));
        assert_eq!(args.resolve_log_level("info"), "debug");
    }

    #[test]
    fn test_defaults_fall_through_to_config() {
        let args = CliArgs::parse_from(["charla"]);
        assert_eq!(args.resolve_host("127.0.0.1"), "127.0.0.1");
        assert_eq!(args.resolve_log_level("warn"), "warn");
    }

    #[test]
    fn test_config_path_priority() {
        let flag = Some(PathBuf::from("/a.toml"));
        assert_eq!(
            pick_config_path(flag, Some("/b.toml".into()), Some("/home/u".into())),
            PathBuf::from("/a.toml")
        );
        assert_eq!(
            pick_config_path(None, Some("/b.toml".into()), Some("/home/u".into())),
            PathBuf::from("/b.toml")
        );
        assert_eq!(
            pick_config_path(None, None, Some("/home/u".into())),
            PathBuf::from("/home/u/.charla/config.toml")
        );
        assert_eq!(pick_config_path(None, None, None), PathBuf::from("config.toml"));
    }

    #[test]
    fn test_port_priority() {
        assert_eq!(pick_port(Some(1), Some("2".into()), 3), 1);
        assert_eq!(pick_port(None, Some("2".into()), 3), 2);
        assert_eq!(pick_port(None, Some("not-a-port".into()), 3), 3);
        assert_eq!(pick_port(None, None, 3040), 3040);
    }

    #[test]
    fn test_api_key_priority() {
        assert_eq!(
            pick_api_key(Some("sk-env".into()), Some("sk-file".into())),
            Some("sk-env".into())
        );
        assert_eq!(
            pick_api_key(Some("  ".into()), Some("sk-file".into())),
            Some("sk-file".into())
        );
        assert_eq!(pick_api_key(None, Some("".into())), None);
        assert_eq!(pick_api_key(None, None), None);
    }
}
