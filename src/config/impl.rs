use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// `config.toml` 中的示例密钥
const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // 最后加载环境变量覆盖
            .add_source(
                Environment::with_prefix("SCHOOLHUB")
                    .separator("__")
                    .try_parsing(true),
            );

        // 支持从环境变量加载
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("jwt.issuer", std::env::var("JWT_ISSUER").ok())?
            .set_override_option("cache.default_ttl", std::env::var("CACHE_TTL").ok())?;

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;

        // 处理工作线程数
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        app_config.validate().map_err(ConfigError::Message)?;

        Ok(app_config)
    }

    /// 校验配置取值
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt.secret.trim().is_empty() {
            return Err("jwt.secret must not be empty".to_string());
        }
        if self.is_production() && self.jwt.secret == DEFAULT_JWT_SECRET {
            return Err("jwt.secret must be changed in production".to_string());
        }
        if self.database.pool_size == 0 {
            return Err("database.pool_size must be at least 1".to_string());
        }
        if self.server.max_workers == 0 {
            return Err("server.max_workers must be at least 1".to_string());
        }
        Ok(())
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 是否允许任意来源的跨域请求
    pub fn cors_allows_any_origin(&self) -> bool {
        self.cors.allowed_origins.is_empty()
            || self.cors.allowed_origins.iter().any(|o| o == "*")
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取 Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::structs::*;

    fn sample_config() -> AppConfig {
        AppConfig {
            app: AppSettings {
                system_name: "SchoolHub".to_string(),
                environment: "development".to_string(),
                log_level: "info".to_string(),
                seed_permissions: true,
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                unix_socket_path: String::new(),
                workers: 2,
                max_workers: 8,
                timeouts: TimeoutConfig {
                    client_request: 5000,
                    client_disconnect: 1000,
                    keep_alive: 30,
                },
                limits: LimitConfig {
                    max_payload_size: 1024,
                },
            },
            jwt: JwtConfig {
                secret: DEFAULT_JWT_SECRET.to_string(),
                access_token_expiry: 60,
                issuer: None,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                pool_size: 1,
                timeout: 5,
            },
            cache: CacheConfig {
                default_ttl: 60,
                memory: MemoryConfig { max_capacity: 100 },
            },
            cors: CorsConfig {
                allowed_origins: vec!["*".to_string()],
                allowed_methods: vec![],
                allowed_headers: vec![],
                max_age: 3600,
            },
        }
    }

    #[test]
    fn test_validate_secret() {
        let mut config = sample_config();
        assert!(config.validate().is_ok());

        config.app.environment = "production".to_string();
        assert!(config.validate().is_err());

        config.jwt.secret = "a-real-secret".to_string();
        assert!(config.validate().is_ok());

        config.jwt.secret = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_pool_size() {
        let mut config = sample_config();
        config.database.pool_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cors_any_origin() {
        let mut config = sample_config();
        assert!(config.cors_allows_any_origin());
        config.cors.allowed_origins = vec!["https://colegio.edu.pe".to_string()];
        assert!(!config.cors_allows_any_origin());
        config.cors.allowed_origins.clear();
        assert!(config.cors_allows_any_origin());
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(sample_config().server_bind_address(), "127.0.0.1:8080");
    }
}
