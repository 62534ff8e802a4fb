//! 用户数据模型

use serde::{Deserialize, Serialize};

/// KV 中保存的用户记录
///
/// 以 `user:<username>` 为键，注册后不再修改
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub created_at: String,
    /// 加盐 HMAC-SHA256 摘要，格式 `<salt>$<hex>`
    #[serde(default)]
    pub password_hash: String,
}

/// 对外暴露的用户信息（不含密码摘要）
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserInfo {
    pub username: String,
    pub email: String,
    pub full_name: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
        }
    }
}

/// 用户资料
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub created_at: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            created_at: user.created_at,
        }
    }
}

/// 注册请求
#[derive(Debug, Deserialize, Default)]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub password: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub full_name: String,
}

/// 登录请求
#[derive(Debug, Deserialize, Default)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub password: String,
}

/// 登录成功响应
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserInfo,
}
