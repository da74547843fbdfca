use super::parsing::{
    env_optional, env_or_default, parse_bool, parse_cors_origins, parse_environment, parse_number,
};
use super::secret::load_or_create_secret_key;
use super::types::{
    AdminSettings, ApiSettings, ConfigError, CorsSettings, DatabaseSettings, RuntimeSettings,
    SecuritySettings, ServerHost, ServerPort, ServerSettings, Settings, TelemetrySettings,
};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = env_or_default("SMARTEDU_HOST", "0.0.0.0");
        let port = env_or_default("SMARTEDU_PORT", "8000");

        let environment =
            parse_environment(env_optional("SMARTEDU_ENV").or_else(|| env_optional("ENVIRONMENT")));
        let strict_config = env_optional("SMARTEDU_STRICT_CONFIG")
            .map(|value| parse_bool(&value))
            .unwrap_or(false)
            || environment.is_production();

        let project_name = env_or_default("PROJECT_NAME", "SmartEdu API");
        let version = env_or_default("VERSION", env!("CARGO_PKG_VERSION"));
        let api_v1_str = env_or_default("API_V1_STR", "/api/v1");

        let secret_key = match env_optional("SECRET_KEY") {
            Some(value) => value,
            None => load_or_create_secret_key(),
        };

        let access_token_expire_minutes = parse_number(
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            env_or_default("ACCESS_TOKEN_EXPIRE_MINUTES", "10080"),
        )?;
        let algorithm = env_or_default("ALGORITHM", "HS256");

        let mut cors_origins = parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"))?;
        // The deployed frontend origin rides along with whatever else is allowed.
        if let Some(client_url) = env_optional("CLIENT_URL") {
            if !cors_origins.contains(&client_url) {
                cors_origins.insert(0, client_url);
            }
        }

        let postgres_server = env_or_default("POSTGRES_SERVER", "localhost");
        let postgres_port =
            parse_number("POSTGRES_PORT", env_or_default("POSTGRES_PORT", "5432"))?;
        let postgres_user = env_or_default("POSTGRES_USER", "smartedu");
        let postgres_password = env_or_default("POSTGRES_PASSWORD", "");
        let postgres_db = env_or_default("POSTGRES_DB", "smartedu_db");
        let database_url = env_optional("DATABASE_URL");

        let first_superuser_email =
            env_or_default("FIRST_SUPERUSER_EMAIL", "admin@smartedu.local").to_lowercase();
        let first_superuser_password = env_or_default("FIRST_SUPERUSER_PASSWORD", "");

        let log_level = env_or_default("SMARTEDU_LOG_LEVEL", "info");
        let json = env_optional("SMARTEDU_LOG_JSON")
            .map(|value| parse_bool(&value))
            .unwrap_or(false);
        let prometheus_enabled = env_optional("PROMETHEUS_ENABLED")
            .map(|value| parse_bool(&value))
            .unwrap_or(false);

        let settings = Self {
            server: ServerSettings {
                host: ServerHost::parse(host)?,
                port: ServerPort::parse(port)?,
            },
            runtime: RuntimeSettings { environment, strict_config },
            api: ApiSettings { project_name, version, api_v1_str },
            security: SecuritySettings { secret_key, access_token_expire_minutes, algorithm },
            cors: CorsSettings { origins: cors_origins },
            database: DatabaseSettings {
                postgres_server,
                postgres_port,
                postgres_user,
                postgres_password,
                postgres_db,
                database_url,
            },
            admin: AdminSettings { first_superuser_email, first_superuser_password },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled },
        };

        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host.0, self.server.port.0)
    }

    pub(crate) fn server_host(&self) -> &str {
        &self.server.host.0
    }

    pub(crate) fn server_port(&self) -> u16 {
        self.server.port.0
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn security(&self) -> &SecuritySettings {
        &self.security
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn admin(&self) -> &AdminSettings {
        &self.admin
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.admin.first_superuser_email.contains('@') {
            return Err(ConfigError::InvalidValue {
                field: "FIRST_SUPERUSER_EMAIL",
                value: self.admin.first_superuser_email.clone(),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if self.database.database_url.is_none() && self.database.postgres_password.is_empty() {
            return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
        }
        if self.admin.first_superuser_password.is_empty() {
            return Err(ConfigError::MissingSecret("FIRST_SUPERUSER_PASSWORD"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::types::DatabaseSettings;

    #[test]
    fn database_url_env_wins_over_parts() {
        let settings = DatabaseSettings {
            postgres_server: "ignored".to_string(),
            postgres_port: 5432,
            postgres_user: "ignored".to_string(),
            postgres_password: "ignored".to_string(),
            postgres_db: "ignored".to_string(),
            database_url: Some("postgresql://u:p@db:5433/custom".to_string()),
        };
        assert_eq!(settings.database_url(), "postgresql://u:p@db:5433/custom");
    }

    #[test]
    fn database_url_built_from_parts() {
        let settings = DatabaseSettings {
            postgres_server: "localhost".to_string(),
            postgres_port: 5432,
            postgres_user: "smartedu".to_string(),
            postgres_password: "pw".to_string(),
            postgres_db: "smartedu_db".to_string(),
            database_url: None,
        };
        assert_eq!(settings.database_url(), "postgresql://smartedu:pw@localhost:5432/smartedu_db");
    }
}
