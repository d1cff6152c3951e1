use crate::error::ConfigError;

/// Shortest accepted HMAC secret, in bytes
pub const MIN_SECRET_LENGTH: usize = 32;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
    pub polka: PolkaSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// `dev` unlocks destructive admin endpoints
    pub platform: String,
}

impl ApplicationSettings {
    pub fn is_dev(&self) -> bool {
        self.platform.eq_ignore_ascii_case("dev")
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }
}

/// Access and refresh token settings
#[derive(serde::Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_expiry: i64,   // seconds, 3600 by default
    pub refresh_token_expiry: i64,  // seconds, 60 days by default
    pub issuer: String,
}

impl JwtSettings {
    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.access_token_expiry)
    }

    pub fn refresh_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.refresh_token_expiry)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::InvalidValue(format!(
                "jwt.secret must be at least {} bytes",
                MIN_SECRET_LENGTH
            )));
        }
        if self.access_token_expiry <= 0 || self.refresh_token_expiry <= 0 {
            return Err(ConfigError::InvalidValue(
                "token expiry values must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Payment provider webhook settings
#[derive(serde::Deserialize, Clone)]
pub struct PolkaSettings {
    pub api_key: String,
}

/// Load settings from `configuration.yaml` and `APP_*` environment variables.
///
/// Nested keys use a double underscore, e.g. `APP_JWT__SECRET`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .set_default("application.host", "127.0.0.1")?
        .set_default("application.port", 8080)?
        .set_default("application.platform", "prod")?
        .set_default("jwt.access_token_expiry", 3600)?
        .set_default("jwt.refresh_token_expiry", 60 * 24 * 60 * 60)?
        .set_default("jwt.issuer", "chirpy")?
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings = settings.try_deserialize::<Settings>()?;
    settings.jwt.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(secret: &str) -> JwtSettings {
        JwtSettings {
            secret: secret.to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 5_184_000,
            issuer: "chirpy".to_string(),
        }
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(jwt("too-short").validate().is_err());
        assert!(jwt(&"s".repeat(MIN_SECRET_LENGTH)).validate().is_ok());
    }

    #[test]
    fn test_non_positive_expiry_rejected() {
        let mut settings = jwt(&"s".repeat(40));
        settings.access_token_expiry = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_ttl_helpers() {
        let settings = jwt(&"s".repeat(40));
        assert_eq!(settings.access_token_ttl(), chrono::Duration::hours(1));
        assert_eq!(settings.refresh_token_ttl(), chrono::Duration::days(60));
    }

    #[test]
    fn test_platform_dev() {
        let app = ApplicationSettings {
            host: "127.0.0.1".into(),
            port: 0,
            platform: "DEV".into(),
        };
        assert!(app.is_dev());
    }
}
