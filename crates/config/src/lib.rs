//! 统一配置中心
//!
//! 提供应用的全局配置管理，包括：
//! - 服务监听地址
//! - 中继传输限制

use serde::{Deserialize, Serialize};
use std::env;

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务配置
    pub server: ServerConfig,
    /// 中继配置
    pub relay: RelayConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 中继配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// 单个 WebSocket 消息的最大字节数（含 base64 编码后的媒体数据）
    pub max_frame_bytes: usize,
}

impl AppConfig {
    /// 从环境变量加载配置，所有键都有开发环境默认值
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3000),
            },
            relay: RelayConfig {
                max_frame_bytes: env::var("RELAY_MAX_FRAME_BYTES")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(8 * 1024 * 1024),
            },
        }
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.is_empty() {
            return Err(ConfigError::InvalidServerConfig(
                "server host cannot be empty".to_string(),
            ));
        }

        if self.relay.max_frame_bytes == 0 {
            return Err(ConfigError::InvalidRelayConfig(
                "max frame bytes must be greater than 0".to_string(),
            ));
        }

        // 64MB 是传输层能合理缓冲的上限
        if self.relay.max_frame_bytes > 64 * 1024 * 1024 {
            return Err(ConfigError::InvalidRelayConfig(
                "max frame bytes must not exceed 64MB".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server configuration: {0}")]
    InvalidServerConfig(String),
    #[error("Invalid relay configuration: {0}")]
    InvalidRelayConfig(String),
    #[error("Environment variable error: {0}")]
    EnvVarError(#[from] std::env::VarError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_are_valid() {
        let config = AppConfig::from_env();
        assert!(!config.server.host.is_empty());
        assert!(config.server.port > 0);
        assert!(config.relay.max_frame_bytes > 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_rejects_bad_values() {
        let mut config = AppConfig::from_env();

        config.server.host = String::new();
        assert!(config.validate().is_err());
        config.server.host = "0.0.0.0".to_string();
        assert!(config.validate().is_ok());

        config.relay.max_frame_bytes = 0;
        assert!(config.validate().is_err());

        config.relay.max_frame_bytes = 65 * 1024 * 1024;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("64MB"));
    }

    #[test]
    fn test_config_reads_env_overrides() {
        env::set_var("RELAY_MAX_FRAME_BYTES", "1048576");
        let config = AppConfig::from_env();
        assert_eq!(config.relay.max_frame_bytes, 1_048_576);
        env::remove_var("RELAY_MAX_FRAME_BYTES");
    }
}
