//! Route modules
//!
//! One function per business module; [`default_routes`] merges them under
//! the main layout. Add a module by writing its function and listing it
//! there.

use super::route::{Layout, RouteMeta, RouteRecord, RouteTable};

/// Public pages outside the main layout
pub fn base_routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord::new("/login")
            .name("Login")
            .view("views/AppLogin")
            .meta(RouteMeta::new("Login").public().layout(Layout::Auth)),
    ]
}

pub fn home_routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord::new("")
            .name("Home")
            .view("views/AppHome")
            .meta(
                RouteMeta::new("Home")
                    .requires_auth()
                    .icon("Menu")
                    .layout(Layout::Main),
            ),
    ]
}

pub fn account_routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord::new("/accounts")
            .name("Account")
            .view("views/account/AccountList")
            .meta(
                RouteMeta::new("Accounts")
                    .requires_auth()
                    .icon("user")
                    .keep_alive(),
            ),
    ]
}

pub fn role_routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord::new("role")
            .name("RoleList")
            .view("views/role/RoleList")
            .meta(RouteMeta::new("Roles").requires_auth().icon("UserCog")),
    ]
}

pub fn permission_routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord::new("/permission")
            .name("Permission")
            .view("views/permission/PermissionList")
            .meta(
                RouteMeta::new("Permissions")
                    .requires_auth()
                    .roles(["admin", "op"]),
            ),
    ]
}

pub fn rule_routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord::new("/rule")
            .name("RuleList")
            .view("views/rule/RuleList")
            .meta(
                RouteMeta::new("Permission rules")
                    .requires_auth()
                    .icon("icon-rules")
                    .keep_alive(),
            ),
    ]
}

pub fn other_routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord::new("/about")
            .name("About")
            .view("views/AppAbout")
            .meta(RouteMeta::new("About").layout(Layout::Main)),
    ]
}

/// Settings group; pages are added as children
pub fn system_routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord::new("/system")
            .name("System")
            .view("layouts/MainLayout")
            .meta(RouteMeta::new("System settings").icon("Setting")),
    ]
}

/// All modules: public routes, then everything else under the main layout
pub fn default_routes() -> Vec<RouteRecord> {
    let children = [
        home_routes(),
        account_routes(),
        role_routes(),
        permission_routes(),
        rule_routes(),
        other_routes(),
        system_routes(),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut routes = base_routes();
    routes.push(
        RouteRecord::new("/")
            .view("layouts/MainLayout")
            .meta(RouteMeta::new("").layout(Layout::Main))
            .children(children),
    );
    routes
}

pub fn default_table() -> RouteTable {
    RouteTable::new(default_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_paths() {
        let table = default_table();
        for path in ["/login", "/", "/accounts", "/role", "/permission", "/rule", "/about", "/system"] {
            assert!(table.resolve(path).is_some(), "missing {path}");
        }
    }

    #[test]
    fn test_protected_and_public_routes() {
        let table = default_table();
        assert!(!table.resolve("/login").unwrap().meta.requires_auth);
        assert!(!table.resolve("/about").unwrap().meta.requires_auth);
        for path in ["/", "/accounts", "/role", "/permission", "/rule"] {
            assert!(table.resolve(path).unwrap().meta.requires_auth, "{path}");
        }
    }
}
