use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Path of the optional TOML config file, relative to the working directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Env vars with this prefix override file values; `__` separates sections,
/// e.g. `FLEET_BASIC__DATABASE_URL`.
pub const ENV_PREFIX: &str = "FLEET_";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
    /// Master key for the encrypted session cookie. Must be at least 64 bytes.
    pub secret_key: String,
    /// Drop the `Secure` attribute from cookies (plain-HTTP development).
    pub insecure_cookie: bool,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite:taxi.sqlite".to_string(),
            loglevel: "info".to_string(),
            secret_key: String::new(),
            insecure_cookie: false,
        }
    }
}

/// Credentials for the first driver account, created at startup when missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (
            self.bootstrap.admin_username.as_deref(),
            self.bootstrap.admin_password.as_deref(),
        ) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn env_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("FLEET_BASIC__DATABASE_URL", "sqlite::memory:");
            jail.set_env("FLEET_BASIC__INSECURE_COOKIE", "true");
            let cfg = Config::load()?;
            assert_eq!(cfg.basic.database_url, "sqlite::memory:");
            assert!(cfg.basic.insecure_cookie);
            assert_eq!(cfg.basic.listen_addr, "0.0.0.0:8000");
            Ok(())
        });
    }

    #[test]
    fn toml_file_is_merged() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                [basic]
                loglevel = "debug"

                [bootstrap]
                admin_username = "admin"
                admin_password = "s3cret-pass"
                "#,
            )?;
            let cfg = Config::load()?;
            assert_eq!(cfg.basic.loglevel, "debug");
            assert_eq!(cfg.admin_credentials(), Some(("admin", "s3cret-pass")));
            Ok(())
        });
    }

    #[test]
    fn partial_bootstrap_is_ignored() {
        let mut cfg = Config::default();
        cfg.bootstrap.admin_username = Some("admin".to_string());
        assert_eq!(cfg.admin_credentials(), None);
    }
}
