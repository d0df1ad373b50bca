// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use gestor_app::SectionKind;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT: &str = "5s";
const DEFAULT_RECENT_COTIZACIONES: usize = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub storage: Storage,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api: Api::default(),
            ui: Ui::default(),
            storage: Storage::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub timeout: Option<String>,
    pub tenant: Option<i64>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_API_URL.to_owned()),
            token: None,
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
            tenant: Some(1),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub start_section: Option<String>,
    pub recent_cotizaciones: Option<usize>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            start_section: Some("clientes".to_owned()),
            recent_cotizaciones: Some(DEFAULT_RECENT_COTIZACIONES),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub cache_dir: Option<String>,
    pub cache_ttl_days: Option<i64>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("GESTOR_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set GESTOR_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(gestor_api::files::APP_NAME);
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
                    "config file {} is not versioned. Add `version = 1` and move values under [api], [ui], and [storage]",
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
        if self.version != CONFIG_VERSION {
            bail!(
                "config {} has version {}; expected 1",
                path.display(),
                self.version
            );
        }

        if let Some(base_url) = &self.api.base_url
            && base_url.trim().is_empty()
        {
            bail!("api.base_url in {} must not be empty", path.display());
        }

        if let Some(tenant) = self.api.tenant
            && tenant <= 0
        {
            bail!(
                "api.tenant in {} must be positive, got {}",
                path.display(),
                tenant
            );
        }

        if let Some(timeout) = &self.api.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "api.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(section) = &self.ui.start_section
            && SectionKind::parse(section).is_none()
        {
            bail!(
                "ui.start_section in {} must be one of clientes, proyectos, cotizaciones; got {:?}",
                path.display(),
                section
            );
        }

        if let Some(limit) = self.ui.recent_cotizaciones
            && limit == 0
        {
            bail!(
                "ui.recent_cotizaciones in {} must be positive",
                path.display()
            );
        }

        if let Some(ttl_days) = self.storage.cache_ttl_days
            && ttl_days < 0
        {
            bail!(
                "storage.cache_ttl_days in {} must be non-negative, got {}",
                path.display(),
                ttl_days
            );
        }

        Ok(())
    }

    pub fn api_base_url(&self) -> String {
        if let Some(base_url) = self.api.base_url.as_deref()
            && !base_url.trim().is_empty()
        {
            return base_url.trim_end_matches('/').to_owned();
        }
        if let Ok(base_url) = env::var("GESTOR_API_URL")
            && !base_url.trim().is_empty()
        {
            return base_url.trim_end_matches('/').to_owned();
        }
        DEFAULT_API_URL.to_owned()
    }

    pub fn api_token(&self) -> Option<String> {
        if let Some(token) = self.api.token.as_deref()
            && !token.trim().is_empty()
        {
            return Some(token.trim().to_owned());
        }
        env::var("GESTOR_API_TOKEN")
            .ok()
            .map(|token| token.trim().to_owned())
            .filter(|token| !token.is_empty())
    }

    pub fn api_timeout(&self) -> Result<Duration> {
        parse_duration(self.api.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn api_tenant(&self) -> i64 {
        self.api.tenant.unwrap_or(1)
    }

    pub fn start_section(&self) -> SectionKind {
        self.ui
            .start_section
            .as_deref()
            .and_then(SectionKind::parse)
            .unwrap_or(SectionKind::Clientes)
    }

    pub fn recent_cotizaciones(&self) -> usize {
        self.ui
            .recent_cotizaciones
            .unwrap_or(DEFAULT_RECENT_COTIZACIONES)
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        match &self.storage.cache_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => gestor_api::files::logo_cache_dir(self.api_tenant()),
        }
    }

    pub fn cache_ttl_days(&self) -> i64 {
        self.storage.cache_ttl_days.unwrap_or(30)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# gestor config\n# Place this file at: {}\n\nversion = 1\n\n[api]\nbase_url = \"{}\"\n# token = \"...\"            # or set GESTOR_API_TOKEN\ntimeout = \"{}\"\ntenant = 1\n\n[ui]\nstart_section = \"clientes\"\nrecent_cotizaciones = {}\n\n[storage]\n# cache_dir = \"/absolute/path\"  # default is the platform data dir\ncache_ttl_days = 30\n",
            path.display(),
            DEFAULT_API_URL,
            DEFAULT_TIMEOUT,
            DEFAULT_RECENT_COTIZACIONES,
        )
    }
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

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration};
    use anyhow::Result;
    use gestor_app::SectionKind;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.start_section(), SectionKind::Clientes);
        assert_eq!(config.recent_cotizaciones(), 10);
        assert_eq!(config.api_tenant(), 1);
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[api]\nbase_url=\"http://localhost:8000\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[api], [ui], and [storage]"));
        Ok(())
    }

    #[test]
    fn versioned_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[api]\nbase_url = \"http://api.local:9000/\"\ntimeout = \"2s\"\ntenant = 3\n[ui]\nstart_section = \"cotizaciones\"\nrecent_cotizaciones = 25\n",
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.api_base_url(), "http://api.local:9000");
        assert_eq!(config.api_timeout()?, Duration::from_secs(2));
        assert_eq!(config.api_tenant(), 3);
        assert_eq!(config.start_section(), SectionKind::Cotizaciones);
        assert_eq!(config.recent_cotizaciones(), 25);
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 7\n")?;
        let error = Config::load(&path).expect_err("v7 config should fail");
        assert!(error.to_string().contains("unsupported config version 7"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("GESTOR_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("GESTOR_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn api_url_prefers_config_over_env() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) =
            write_config("version = 1\n[api]\nbase_url = \"http://from-config:8000\"\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("GESTOR_API_URL", "http://from-env:8000");
        }
        let config = Config::load(&path)?;
        let resolved = config.api_base_url();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("GESTOR_API_URL");
        }
        assert_eq!(resolved, "http://from-config:8000");
        Ok(())
    }

    #[test]
    fn api_token_falls_back_to_env() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config("version = 1\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("GESTOR_API_TOKEN", "secreto");
        }
        let config = Config::load(&path)?;
        let token = config.api_token();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("GESTOR_API_TOKEN");
        }
        assert_eq!(token.as_deref(), Some("secreto"));
        Ok(())
    }

    #[test]
    fn invalid_start_section_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nstart_section = \"facturas\"\n")?;
        let error = Config::load(&path).expect_err("unknown section should fail");
        assert!(error.to_string().contains("start_section"));
        Ok(())
    }

    #[test]
    fn non_positive_limits_are_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[api]\ntenant = 0\n")?;
        assert!(Config::load(&path).is_err());

        let (_temp, path) = write_config("version = 1\n[ui]\nrecent_cotizaciones = 0\n")?;
        assert!(Config::load(&path).is_err());

        let (_temp, path) = write_config("version = 1\n[storage]\ncache_ttl_days = -2\n")?;
        assert!(Config::load(&path).is_err());
        Ok(())
    }

    #[test]
    fn timeout_parses_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        assert!(parse_duration("oops").is_err());
        Ok(())
    }

    #[test]
    fn zero_timeout_in_config_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[api]\ntimeout = \"0s\"\n")?;
        let error = Config::load(&path).expect_err("zero timeout should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn example_config_includes_required_sections() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[api]"));
        assert!(example.contains("[ui]"));
        assert!(example.contains("[storage]"));
        Ok(())
    }
}
