//! Caller identity as asserted by the fronting auth gateway
//!
//! Sessions are issued and verified upstream; requests reach this service
//! with `x-user-id` and, for administrators, `x-user-role: admin`.

use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};

use crate::{error::AppError, models::UserId};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const ADMIN_ROLE: &str = "admin";

/// An authenticated end user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: UserId,
}

/// An authenticated administrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminUser {
    pub user_id: UserId,
}

fn user_id_from(headers: &HeaderMap) -> Result<UserId, AppError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| AppError::Unauthorized("missing user identity".to_string()))?;

    raw.to_str()
        .ok()
        .and_then(|s| s.trim().parse::<UserId>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::Unauthorized("invalid user identity".to_string()))
}

fn is_admin(headers: &HeaderMap) -> bool {
    headers
        .get(USER_ROLE_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|role| role.trim().eq_ignore_ascii_case(ADMIN_ROLE))
        .unwrap_or(false)
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = user_id_from(&parts.headers)?;
        Ok(Self { user_id })
    }
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = user_id_from(&parts.headers)?;
        if !is_admin(&parts.headers) {
            tracing::warn!(user_id, "Non-admin caller rejected from admin route");
            return Err(AppError::Forbidden("admin role required".to_string()));
        }
        Ok(Self { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(*v));
        }
        map
    }

    #[test]
    fn test_user_id_parsing() {
        assert_eq!(user_id_from(&headers(&[(USER_ID_HEADER, "42")])).unwrap(), 42);
        assert_eq!(user_id_from(&headers(&[(USER_ID_HEADER, " 7 ")])).unwrap(), 7);
        assert!(user_id_from(&headers(&[])).is_err());
        assert!(user_id_from(&headers(&[(USER_ID_HEADER, "abc")])).is_err());
        assert!(user_id_from(&headers(&[(USER_ID_HEADER, "0")])).is_err());
    }

    #[test]
    fn test_admin_role_detection() {
        assert!(is_admin(&headers(&[(USER_ROLE_HEADER, "admin")])));
        assert!(is_admin(&headers(&[(USER_ROLE_HEADER, "Admin")])));
        assert!(!is_admin(&headers(&[(USER_ROLE_HEADER, "user")])));
        assert!(!is_admin(&headers(&[])));
    }
}
