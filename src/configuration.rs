use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(Deserialize, Clone)]
pub struct Configuration {
    pub application: ApplicationConfigs,
    pub database: DatabaseConfigs,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationConfigs {
    pub host: String,
    pub port: u16,
    pub hmac_secret: Secret<String>,
    pub redis_uri: Secret<String>,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseConfigs {
    pub username: String,
    pub password: Secret<String>,
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
}

impl DatabaseConfigs {
    pub fn connect_options(&self) -> PgConnectOptions {
        self.connect_options_without_db().database(&self.database_name)
    }

    pub fn connect_options_without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(ssl_mode)
    }
}

pub fn get_config() -> Result<Configuration, config::ConfigError> {
    let configs = config::Config::builder()
        .add_source(config::File::new("config.yaml", config::FileFormat::Yaml))
        .build()?;

    configs.try_deserialize::<Configuration>()
}
