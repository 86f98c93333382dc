use super::identity_type;

/// 用户：以登录名作为自然键
#[identity_type]
pub struct User {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl User {
    pub fn login_name(&self) -> &str {
        &self.key
    }
}
