//! Route records and the flattened route table

/// Page layout a route renders in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Sidebar + header shell
    Main,
    /// Bare layout for the login screen
    Auth,
}

/// Route metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub title: String,
    pub requires_auth: bool,
    pub public: bool,
    pub icon: Option<String>,
    /// Roles allowed to see the route in menus
    pub roles: Vec<String>,
    pub keep_alive: bool,
    pub hidden: bool,
    pub layout: Option<Layout>,
}

impl RouteMeta {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn requires_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn keep_alive(mut self) -> Self {
        self.keep_alive = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }
}

/// A route declaration; child paths without a leading `/` are relative
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    pub path: String,
    pub name: Option<String>,
    /// Screen rendered for this route
    pub view: Option<String>,
    pub meta: RouteMeta,
    pub children: Vec<RouteRecord>,
}

impl RouteRecord {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            view: None,
            meta: RouteMeta::default(),
            children: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    pub fn meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn children(mut self, children: Vec<RouteRecord>) -> Self {
        self.children = children;
        self
    }
}

/// A route with its absolute path and effective metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub path: String,
    pub name: Option<String>,
    pub view: Option<String>,
    /// Leaf metadata; `requires_auth` is set if any ancestor requires it
    pub meta: RouteMeta,
}

/// Flattened, ordered route table
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    records: Vec<RouteRecord>,
    resolved: Vec<ResolvedRoute>,
}

impl RouteTable {
    pub fn new(records: Vec<RouteRecord>) -> Self {
        let mut resolved = Vec::new();
        for record in &records {
            flatten(record, "", false, &mut resolved);
        }
        Self { records, resolved }
    }

    pub fn records(&self) -> &[RouteRecord] {
        &self.records
    }

    /// Every reachable route, children before their parent
    pub fn routes(&self) -> &[ResolvedRoute] {
        &self.resolved
    }

    /// First route whose absolute path equals `path` (query and trailing
    /// slash ignored)
    pub fn resolve(&self, path: &str) -> Option<&ResolvedRoute> {
        let wanted = normalize(path);
        self.resolved.iter().find(|r| r.path == wanted)
    }

    pub fn by_name(&self, name: &str) -> Option<&ResolvedRoute> {
        self.resolved.iter().find(|r| r.name.as_deref() == Some(name))
    }
}

/// Strips query/fragment and trailing slash; the root stays `/`
pub fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn join(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        normalize(child)
    } else {
        normalize(&format!("{}/{}", parent.trim_end_matches('/'), child))
    }
}

fn flatten(record: &RouteRecord, parent: &str, parent_auth: bool, out: &mut Vec<ResolvedRoute>) {
    let path = join(parent, &record.path);
    let requires_auth = parent_auth || record.meta.requires_auth;

    for child in &record.children {
        flatten(child, &path, requires_auth, out);
    }

    let mut meta = record.meta.clone();
    meta.requires_auth = requires_auth;
    out.push(ResolvedRoute {
        path,
        name: record.name.clone(),
        view: record.view.clone(),
        meta,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("/accounts/"), "/accounts");
        assert_eq!(normalize("/login?redirect=/rule"), "/login");
        assert_eq!(normalize("role"), "/role");
    }

    #[test]
    fn test_relative_child_joins_parent() {
        let table = RouteTable::new(vec![
            RouteRecord::new("/").children(vec![RouteRecord::new("role").name("RoleList")]),
        ]);
        assert_eq!(table.by_name("RoleList").unwrap().path, "/role");
    }

    #[test]
    fn test_child_wins_over_parent_on_same_path() {
        let table = RouteTable::new(vec![
            RouteRecord::new("/")
                .view("layouts/MainLayout")
                .children(vec![RouteRecord::new("").name("Home").view("views/Home")]),
        ]);
        assert_eq!(table.resolve("/").unwrap().name.as_deref(), Some("Home"));
    }

    #[test]
    fn test_requires_auth_inherited() {
        let table = RouteTable::new(vec![
            RouteRecord::new("/admin")
                .meta(RouteMeta::new("Admin").requires_auth())
                .children(vec![RouteRecord::new("audit").name("Audit")]),
        ]);
        assert!(table.by_name("Audit").unwrap().meta.requires_auth);
    }
}
