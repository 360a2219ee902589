//! Sidebar menu tree

/// A menu node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub path: String,
    pub name: String,
    pub title: String,
    pub icon: Option<String>,
    /// Roles allowed to see the item; empty means everyone
    pub roles: Vec<String>,
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    pub fn new(path: &str, name: &str, title: &str) -> Self {
        Self {
            path: path.to_string(),
            name: name.to_string(),
            title: title.to_string(),
            icon: None,
            roles: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn roles(mut self, roles: &[&str]) -> Self {
        self.roles = roles.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn children(mut self, children: Vec<MenuItem>) -> Self {
        self.children = children;
        self
    }

    fn allows(&self, roles: &[String]) -> bool {
        self.roles.is_empty() || self.roles.iter().any(|r| roles.contains(r))
    }
}

/// The settings group with its four management pages
pub fn default_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::new("/settings", "Settings", "System settings")
            .icon("Settings")
            .roles(&["admin", "op"])
            .children(vec![
                MenuItem::new("/role", "Role", "Roles")
                    .icon("UserSwitch")
                    .roles(&["admin", "op"]),
                MenuItem::new("/permission", "Permission", "Permissions")
                    .icon("Lock")
                    .roles(&["admin", "op"]),
                MenuItem::new("/rule", "Rule", "Permission rules")
                    .icon("Key")
                    .roles(&["admin"]),
                MenuItem::new("/accounts", "User", "Accounts")
                    .icon("User")
                    .roles(&["admin", "op", "viewer"]),
            ]),
    ]
}

/// Items visible to a user holding `roles`
///
/// A group whose children are all hidden is hidden too.
pub fn visible_for(items: &[MenuItem], roles: &[String]) -> Vec<MenuItem> {
    items
        .iter()
        .filter(|item| item.allows(roles))
        .filter_map(|item| {
            if item.children.is_empty() {
                return Some(item.clone());
            }
            let children = visible_for(&item.children, roles);
            (!children.is_empty()).then(|| MenuItem {
                children,
                ..item.clone()
            })
        })
        .collect()
}
