//! 角色模型
//!
//! 封闭的角色集合，角色检查一律默认拒绝。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 系统角色
///
/// 只有两种角色：顾客和管理员。令牌中以逗号分隔的 `roles` claim 携带。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "CUSTOMER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "CUSTOMER" => Ok(Role::Customer),
            "ADMIN" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// 未知角色名称
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!("CUSTOMER".parse::<Role>().unwrap(), Role::Customer);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::Admin.as_str(), "ADMIN");
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("SUPERUSER".parse::<Role>().is_err());
        assert!("customer".parse::<Role>().is_err());
    }
}
