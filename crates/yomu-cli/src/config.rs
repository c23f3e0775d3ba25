use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(skip)]
    path: PathBuf,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: yomu_home().join("config.yml"),
            base_url: default_base_url(),
            ws_url: default_ws_url(),
            token: None,
            user_id: None,
            page_size: default_page_size(),
        }
    }
}

fn yomu_home() -> PathBuf {
    match std::env::var("YOMU_HOME") {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".yomu"),
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_ws_url() -> String {
    "ws://localhost:8080/ws".to_string()
}

fn default_page_size() -> i64 {
    20
}

impl Config {
    /// Reads the config at `path` (or `$YOMU_HOME/config.yml`), writing the
    /// defaults there first when it does not exist yet.
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Config> {
        let config_path = match path {
            Some(p) => PathBuf::new().join(p),
            None => yomu_home().join("config.yml"),
        };

        match std::fs::File::open(&config_path) {
            Ok(file) => {
                debug!("open config from {:?}", config_path);
                let mut cfg: Self = serde_yml::from_reader(file)
                    .with_context(|| format!("invalid config at {:?}", config_path))?;
                cfg.path = config_path;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Config {
                    path: config_path,
                    ..Default::default()
                };
                cfg.save()?;
                info!("write default config at {:?}", cfg.path);
                Ok(cfg)
            }
            Err(e) => Err(anyhow!("error opening {:?}: {}", config_path, e)),
        }
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_yml::to_string(&self)?)?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_session(&mut self, token: String, user_id: i64) {
        self.token = Some(token);
        self.user_id = Some(user_id);
    }

    pub fn clear_session(&mut self) {
        self.token = None;
        self.user_id = None;
    }

    /// Fails before any request is made when no one is logged in.
    pub fn require_session(&self) -> Result<()> {
        match self.token.as_deref() {
            Some(token) if !token.is_empty() => Ok(()),
            _ => Err(anyhow!("not logged in, run `yomu login <username>`")),
        }
    }

    pub fn client(&self) -> yomu_api::Client {
        yomu_api::Client::new(&self.base_url).with_token(self.token.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_open_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");

        let cfg = Config::open(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.base_url, default_base_url());
        assert_eq!(cfg.page_size, 20);
        assert_eq!(cfg.token, None);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "base_url: https://yomu.example/api\n").unwrap();

        let cfg = Config::open(Some(&path)).unwrap();
        assert_eq!(cfg.base_url, "https://yomu.example/api");
        assert_eq!(cfg.ws_url, default_ws_url());
        assert_eq!(cfg.page_size, 20);
    }

    #[test]
    fn test_session_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");

        let mut cfg = Config::open(Some(&path)).unwrap();
        cfg.set_session("tok-123".to_string(), 7);
        cfg.save().unwrap();

        let reopened = Config::open(Some(&path)).unwrap();
        assert_eq!(reopened.token.as_deref(), Some("tok-123"));
        assert_eq!(reopened.user_id, Some(7));
        assert_eq!(reopened, cfg);

        let mut cfg = reopened;
        cfg.clear_session();
        cfg.save().unwrap();
        assert_eq!(Config::open(Some(&path)).unwrap().token, None);
    }

    #[test]
    fn test_require_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::open(Some(dir.path().join("config.yml"))).unwrap();

        let err = cfg.require_session().unwrap_err();
        assert!(err.to_string().starts_with("not logged in"));

        cfg.token = Some(String::new());
        assert!(cfg.require_session().is_err());

        cfg.set_session("tok-123".to_string(), 7);
        assert!(cfg.require_session().is_ok());

        cfg.clear_session();
        assert!(cfg.require_session().is_err());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "page_size: [not a number\n").unwrap();

        assert!(Config::open(Some(&path)).is_err());
    }
}
