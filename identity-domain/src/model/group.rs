use super::identity_type;

/// 组：以组路径作为自然键，可挂在父组之下
#[identity_type]
pub struct Group {
    pub name: String,
    pub parent_key: Option<String>,
}

impl Group {
    /// 以名称创建顶层组，路径形如 `/name`
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut group = <Self as super::IdentityType>::new(format!("/{name}"));
        group.name = name;
        group
    }

    /// 在父组下创建子组，路径为 `父路径/name`
    pub fn child_of(parent: &Group, name: impl Into<String>) -> Self {
        let name = name.into();
        let mut group = <Self as super::IdentityType>::new(format!("{}/{name}", parent.key));
        group.name = name;
        group.parent_key = Some(parent.key.clone());
        group
    }

    pub fn path(&self) -> &str {
        &self.key
    }
}
