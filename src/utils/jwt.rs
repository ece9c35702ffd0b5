//! JWT 校验
//!
//! 令牌由外部身份服务使用共享的 `jwt.secret` 以 HS256 签发，本服务只负责校验。
//! 签发函数保留用于测试和运维脚本生成临时令牌。

use crate::config::{AppConfig, JwtConfig};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // Subject (user ID)
    pub role: String, // 用户角色
    pub exp: usize,   // Expiration time (时间戳)
    pub iat: usize,   // Issued at (签发时间)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse::<i64>().ok()
    }
}

pub struct JwtUtils;

impl JwtUtils {
    // 生成 Access Token
    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = &AppConfig::get().jwt;
        Self::generate_with_config(
            config,
            user_id,
            role,
            chrono::Duration::minutes(config.access_token_expiry),
        )
    }

    // 按给定配置签发令牌
    pub fn generate_with_config(
        config: &JwtConfig,
        user_id: i64,
        role: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
            iss: config.issuer.clone(),
        };

        let encoding_key = EncodingKey::from_secret(config.secret.as_ref());
        encode(&Header::default(), &claims, &encoding_key)
    }

    // 验证 JWT token
    pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_with_config(&AppConfig::get().jwt, token)
    }

    // 按给定配置校验签名、过期时间以及签发方（如已配置）
    pub fn verify_with_config(
        config: &JwtConfig,
        token: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(config.secret.as_ref());
        let mut validation = Validation::default();
        if let Some(ref issuer) = config.issuer {
            validation.set_issuer(&[issuer]);
        }

        let claims = decode::<Claims>(token, &decoding_key, &validation)?.claims;
        if claims.user_id().is_none() {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidSubject.into());
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(issuer: Option<&str>) -> JwtConfig {
        JwtConfig {
            secret: "test-secret-with-enough-length".to_string(),
            access_token_expiry: 60,
            issuer: issuer.map(str::to_string),
        }
    }

    #[test]
    fn test_round_trip() {
        let cfg = config(None);
        let token =
            JwtUtils::generate_with_config(&cfg, 7, "teacher", chrono::Duration::minutes(5))
                .unwrap();
        let claims = JwtUtils::verify_with_config(&cfg, &token).unwrap();
        assert_eq!(claims.user_id(), Some(7));
        assert_eq!(claims.role, "teacher");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtUtils::generate_with_config(
            &config(None),
            7,
            "teacher",
            chrono::Duration::minutes(5),
        )
        .unwrap();
        let mut other = config(None);
        other.secret = "another-secret-value".to_string();
        assert!(JwtUtils::verify_with_config(&other, &token).is_err());
    }

    #[test]
    fn test_expired_rejected() {
        let cfg = config(None);
        let token =
            JwtUtils::generate_with_config(&cfg, 7, "student", chrono::Duration::minutes(-10))
                .unwrap();
        assert!(JwtUtils::verify_with_config(&cfg, &token).is_err());
    }

    #[test]
    fn test_issuer_checked_when_configured() {
        let signed = config(Some("idp.colegio"));
        let token =
            JwtUtils::generate_with_config(&signed, 1, "admin", chrono::Duration::minutes(5))
                .unwrap();
        assert!(JwtUtils::verify_with_config(&signed, &token).is_ok());

        let expected = config(Some("otro-idp"));
        assert!(JwtUtils::verify_with_config(&expected, &token).is_err());
    }
}
