//! 用户认证服务
//!
//! 基于键值存储的注册/登录，登录成功签发 HS256 令牌。
//!
//! ## 存储格式
//! - 键：`user:<username>`
//! - 值：`User` 的 JSON，包含加盐密码摘要

use anyhow::anyhow;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64_URL, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;
use thiserror::Error;

use crate::config::AuthConfig;
use crate::models::{
    get_beijing_time, LoginRequest, LoginResponse, RegisterRequest, User, UserInfo, UserProfile,
};
use crate::services::kv_store::KvStore;

type HmacSha256 = Hmac<Sha256>;

/// 令牌头部，固定为 HS256
const TOKEN_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// 认证错误
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("用户名已存在")]
    DuplicateUser,
    #[error("用户名或密码错误")]
    InvalidCredentials,
    #[error("无效的令牌")]
    InvalidToken,
    #[error("令牌已过期")]
    TokenExpired,
    #[error("内部错误: {0}")]
    Internal(#[from] anyhow::Error),
}

/// 令牌载荷
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// 用户名
    pub sub: String,
    /// 过期时间（Unix 秒）
    pub exp: i64,
}

/// 令牌签发与校验
pub struct TokenIssuer {
    secret: String,
    ttl_secs: i64,
}

impl TokenIssuer {
    pub fn new(secret: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
        }
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| AuthError::Internal(anyhow!("HMAC 初始化失败: {}", e)))
    }

    /// 签发令牌，过期时间为当前时间 + ttl
    pub fn issue(&self, username: &str) -> Result<String, AuthError> {
        self.issue_at(username, Utc::now().timestamp())
    }

    pub fn issue_at(&self, username: &str, now: i64) -> Result<String, AuthError> {
        let claims = Claims {
            sub: username.to_string(),
            exp: now.saturating_add(self.ttl_secs),
        };
        let payload = serde_json::to_vec(&claims).map_err(anyhow::Error::from)?;

        let signing_input = format!(
            "{}.{}",
            BASE64_URL.encode(TOKEN_HEADER),
            BASE64_URL.encode(payload)
        );

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = BASE64_URL.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", signing_input, signature))
    }

    /// 校验签名和过期时间，返回载荷
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let (signing_input, signature) = token.rsplit_once('.').ok_or(AuthError::InvalidToken)?;
        let (_, payload) = signing_input.split_once('.').ok_or(AuthError::InvalidToken)?;

        let signature = BASE64_URL
            .decode(signature)
            .map_err(|_| AuthError::InvalidToken)?;
        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let payload = BASE64_URL
            .decode(payload)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::InvalidToken)?;

        if claims.exp <= now {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }
}

/// 生成加盐密码摘要 `<salt>$<hex(hmac_sha256(salt, password))>`
fn hash_password(password: &str) -> Result<String, AuthError> {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt = hex::encode(salt);
    let mac = password_mac(&salt, password)?;
    Ok(format!("{}${}", salt, hex::encode(mac.finalize().into_bytes())))
}

fn password_mac(salt: &str, password: &str) -> Result<HmacSha256, AuthError> {
    let mut mac = HmacSha256::new_from_slice(salt.as_bytes())
        .map_err(|e| AuthError::Internal(anyhow!("HMAC 初始化失败: {}", e)))?;
    mac.update(password.as_bytes());
    Ok(mac)
}

/// 校验密码，摘要比较为常量时间
fn verify_password(stored: &str, password: &str) -> bool {
    let Some((salt, digest)) = stored.split_once('$') else {
        return false;
    };
    let Ok(expected) = hex::decode(digest) else {
        return false;
    };
    password_mac(salt, password)
        .map(|mac| mac.verify_slice(&expected).is_ok())
        .unwrap_or(false)
}

fn user_key(username: &str) -> String {
    format!("user:{}", username)
}

/// 认证服务
pub struct AuthService {
    store: Arc<dyn KvStore>,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(store: Arc<dyn KvStore>, config: &AuthConfig) -> Self {
        Self {
            store,
            tokens: TokenIssuer::new(config.jwt_secret.clone(), config.token_ttl_secs),
        }
    }

    /// 注册新用户，用户名已存在时返回 `DuplicateUser`，不会覆盖原记录
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), AuthError> {
        let user = User {
            username: request.username.clone(),
            email: request.email.clone(),
            full_name: request.full_name.clone(),
            created_at: get_beijing_time(),
            password_hash: hash_password(&request.password)?,
        };
        let value = serde_json::to_string(&user).map_err(anyhow::Error::from)?;

        if !self.store.put_if_absent(&user_key(&user.username), value).await? {
            log::info!("注册失败，用户名已存在: {}", user.username);
            return Err(AuthError::DuplicateUser);
        }

        log::info!("用户注册成功: {}", user.username);
        Ok(())
    }

    /// 登录并签发令牌
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AuthError> {
        let user = self
            .find_user(&request.username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&user.password_hash, &request.password) {
            log::info!("登录失败，密码错误: {}", user.username);
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.tokens.issue(&user.username)?;
        log::info!("用户登录成功: {}", user.username);

        Ok(LoginResponse {
            access_token,
            token_type: "bearer".to_string(),
            user: UserInfo::from(&user),
        })
    }

    /// 校验令牌，返回用户名
    pub fn authenticate(&self, token: &str) -> Result<String, AuthError> {
        self.tokens.verify(token).map(|claims| claims.sub)
    }

    /// 获取用户资料
    pub async fn profile(&self, username: &str) -> Result<UserProfile, AuthError> {
        self.find_user(username)
            .await?
            .map(UserProfile::from)
            .ok_or(AuthError::InvalidCredentials)
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, AuthError> {
        match self.store.get(&user_key(username)).await? {
            Some(raw) => {
                let user: User = serde_json::from_str(&raw).map_err(anyhow::Error::from)?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::kv_store::MemoryStore;

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryStore::new()), &AuthConfig::default())
    }

    fn register_request(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: password.to_string(),
            full_name: "张三".to_string(),
        }
    }

    fn login_request(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let auth = service();
        auth.register(&register_request("zhangsan", "secret")).await.unwrap();

        let resp = auth.login(&login_request("zhangsan", "secret")).await.unwrap();
        assert_eq!(resp.token_type, "bearer");
        assert_eq!(resp.user.username, "zhangsan");
        assert_eq!(resp.user.email, "zhangsan@example.com");
        assert_eq!(resp.user.full_name, "张三");
        assert_eq!(auth.authenticate(&resp.access_token).unwrap(), "zhangsan");
    }

    #[tokio::test]
    async fn test_duplicate_register_keeps_first_user() {
        let auth = service();
        auth.register(&register_request("lisi", "pw1")).await.unwrap();
        let first = auth.profile("lisi").await.unwrap();

        let err = auth.register(&register_request("lisi", "pw2")).await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUser));

        let after = auth.profile("lisi").await.unwrap();
        assert_eq!(after.created_at, first.created_at);
        // 原密码仍然有效
        assert!(auth.login(&login_request("lisi", "pw1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let err = service().login(&login_request("ghost", "x")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let auth = service();
        auth.register(&register_request("wangwu", "right")).await.unwrap();

        let err = auth.login(&login_request("wangwu", "wrong")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_stored_record_has_no_plain_password() {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthService::new(store.clone(), &AuthConfig::default());
        auth.register(&register_request("zhaoliu", "plain-text-pw")).await.unwrap();

        let raw = store.get("user:zhaoliu").await.unwrap().unwrap();
        assert!(!raw.contains("plain-text-pw"));
        assert!(raw.contains("password_hash"));
    }

    #[test]
    fn test_token_round_trip() {
        let issuer = TokenIssuer::new("secret", 3600);
        let token = issuer.issue_at("alice", 1_000).unwrap();

        assert_eq!(token.split('.').count(), 3);
        let claims = issuer.verify_at(&token, 1_500).unwrap();
        assert_eq!(claims, Claims { sub: "alice".to_string(), exp: 4_600 });
    }

    #[test]
    fn test_token_expired() {
        let issuer = TokenIssuer::new("secret", 3600);
        let token = issuer.issue_at("alice", 1_000).unwrap();

        assert!(matches!(issuer.verify_at(&token, 4_600), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_token_wrong_secret() {
        let token = TokenIssuer::new("secret-a", 3600).issue_at("alice", 1_000).unwrap();
        let result = TokenIssuer::new("secret-b", 3600).verify_at(&token, 1_500);

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_token_tampered_payload() {
        let issuer = TokenIssuer::new("secret", 3600);
        let token = issuer.issue_at("alice", 1_000).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_payload = BASE64_URL.encode(r#"{"sub":"admin","exp":4600}"#);
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert!(matches!(issuer.verify_at(&forged, 1_500), Err(AuthError::InvalidToken)));
        assert!(matches!(issuer.verify_at("not-a-token", 1_500), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_password_hash_salted() {
        let a = hash_password("pw").unwrap();
        let b = hash_password("pw").unwrap();

        assert_ne!(a, b);
        assert!(verify_password(&a, "pw"));
        assert!(verify_password(&b, "pw"));
        assert!(!verify_password(&a, "other"));
        assert!(!verify_password("", "pw"));
    }

    #[test]
    fn test_verify_password_rejects_malformed_digest() {
        let stored = hash_password("pw").unwrap();
        let (salt, digest) = stored.split_once('$').unwrap();

        assert!(!verify_password(&format!("{}$zz", salt), "pw"));
        assert!(!verify_password(&format!("{}${}", salt, &digest[..10]), "pw"));
        assert!(verify_password(&format!("{}${}", salt, digest.to_uppercase()), "pw"));
    }

    #[test]
    fn test_token_huge_ttl_saturates() {
        let issuer = TokenIssuer::new("secret", i64::MAX);
        let token = issuer.issue_at("alice", 1_000).unwrap();

        let claims = issuer.verify_at(&token, 1_500).unwrap();
        assert_eq!(claims.exp, i64::MAX);
    }
}
