// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use chequebook_app::validation::{DEFAULT_DATE_FORMAT, DateDisplay};
use chequebook_app::{TabKind, UserId};
use log::LevelFilter;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const CONFIG_PATH_ENV: &str = "CHEQUEBOOK_CONFIG_PATH";
pub const USER_ID_ENV: &str = "CHEQUEBOOK_USER_ID";
const DEFAULT_TIMEOUT: &str = "10s";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Sqlite,
    Rest,
}

impl BackendKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Some(Self::Sqlite),
            "rest" => Some(Self::Rest),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub session: Session,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            backend: Backend::default(),
            session: Session::default(),
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Backend {
    pub kind: Option<String>,
    pub db_path: Option<String>,
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            kind: Some("sqlite".to_owned()),
            db_path: None,
            url: None,
            api_key: None,
            access_token: None,
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Session {
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub date_format: Option<String>,
    pub start_tab: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            date_format: Some(DEFAULT_DATE_FORMAT.to_owned()),
            start_tab: Some("received".to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub path: Option<String>,
    pub level: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            path: None,
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;

        let app_dir = config_root.join(chequebook_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [backend], [session], [ui], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let kind = self.backend.kind.as_deref().unwrap_or("sqlite");
        let Some(kind) = BackendKind::parse(kind) else {
            bail!(
                "backend.kind in {} must be \"sqlite\" or \"rest\", got {:?}",
                path.display(),
                kind
            );
        };

        if let Some(db_path) = &self.backend.db_path {
            chequebook_db::validate_db_path(db_path)?;
        }

        if kind == BackendKind::Rest {
            if is_blank(self.backend.url.as_deref()) {
                bail!(
                    "backend.url in {} is required when backend.kind = \"rest\"",
                    path.display()
                );
            }
            if is_blank(self.backend.api_key.as_deref()) {
                bail!(
                    "backend.api_key in {} is required when backend.kind = \"rest\"",
                    path.display()
                );
            }
        }

        if let Some(timeout) = &self.backend.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "backend.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(pattern) = &self.ui.date_format {
            DateDisplay::parse(pattern)
                .with_context(|| format!("ui.date_format in {}", path.display()))?;
        }

        if let Some(tab) = &self.ui.start_tab
            && TabKind::parse(tab).is_none()
        {
            bail!(
                "ui.start_tab in {} must be \"received\" or \"issued\", got {:?}",
                path.display(),
                tab
            );
        }

        if let Some(level) = &self.log.level
            && LevelFilter::from_str(level).is_err()
        {
            bail!(
                "log.level in {} must be one of off, error, warn, info, debug, trace; got {:?}",
                path.display(),
                level
            );
        }

        Ok(())
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend
            .kind
            .as_deref()
            .and_then(BackendKind::parse)
            .unwrap_or(BackendKind::Sqlite)
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.backend.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => chequebook_db::default_db_path(),
        }
    }

    pub fn rest_url(&self) -> &str {
        self.backend
            .url
            .as_deref()
            .unwrap_or("")
            .trim()
            .trim_end_matches('/')
    }

    pub fn api_key(&self) -> &str {
        self.backend.api_key.as_deref().unwrap_or("")
    }

    pub fn access_token(&self) -> Option<&str> {
        self.backend.access_token.as_deref()
    }

    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(self.backend.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    /// `CHEQUEBOOK_USER_ID` wins over `[session].user_id`.
    pub fn user_id(&self) -> Option<UserId> {
        let from_env = env::var(USER_ID_ENV).ok();
        [from_env.as_deref(), self.session.user_id.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(UserId::new)
    }

    pub fn date_display(&self) -> Result<DateDisplay> {
        DateDisplay::parse(self.ui.date_format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT))
    }

    pub fn start_tab(&self) -> TabKind {
        self.ui
            .start_tab
            .as_deref()
            .and_then(TabKind::parse)
            .unwrap_or(TabKind::Received)
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log
            .path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# chequebook config\n# Place this file at: {}\n\nversion = 1\n\n[backend]\n# \"sqlite\" keeps cheques in a local file; \"rest\" talks to a PostgREST endpoint.\nkind = \"sqlite\"\n# Optional. Default is platform data dir (for example ~/.local/share/chequebook/chequebook.db)\n# db_path = \"/absolute/path/to/chequebook.db\"\n# url = \"https://project.example.co\"\n# api_key = \"public-anon-key\"\n# access_token = \"user-session-jwt\"\ntimeout = \"{}\"\n\n[session]\n# {} overrides this value.\nuser_id = \"local\"\n\n[ui]\ndate_format = \"{}\"\nstart_tab = \"received\"\n\n[log]\n# path = \"/absolute/path/to/chequebook.log\"\nlevel = \"{}\"\n",
            path.display(),
            DEFAULT_TIMEOUT,
            USER_ID_ENV,
            DEFAULT_DATE_FORMAT,
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|value| value.trim().is_empty())
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 10s)")
}
