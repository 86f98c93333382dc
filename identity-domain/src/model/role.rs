use super::identity_type;

/// 角色：名称即自然键
#[identity_type]
pub struct Role {
    pub description: Option<String>,
}

impl Role {
    pub fn name(&self) -> &str {
        &self.key
    }
}
