//! Admin REST surface
//!
//! Accounts update over `POST /api/accounts/{id}` and delete over
//! `POST /api/accounts/{id}/delete`; the other collections use PUT/DELETE.
//! Every route except login requires a bearer token.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRequestParts, Path, Query, Request, State},
    http::{StatusCode, header, request::Parts},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::{
    Account, AccountCreate, AccountStatus, AccountUpdate, AssignPermissions, AssignRoles,
    Permission, PermissionCreate, PermissionUpdate, Role, RoleCreate, RoleOption, RoleUpdate,
    Rule, RuleCreate, RuleUpdate,
};
use shared::{ListResponse, LoginRequest};

use crate::error::{ApiError, ApiResult};
use crate::state::{AccountRecord, MockState};

type AppState = Arc<MockState>;

/// Signed-in caller, resolved from the bearer token
pub struct AuthUser {
    pub account: Account,
    pub token: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized)?;

        let account = state.account_for_token(token).ok_or_else(|| {
            tracing::debug!(uri = %parts.uri, "Rejected unknown token");
            ApiError::Unauthorized
        })?;

        Ok(AuthUser {
            account,
            token: token.to_string(),
        })
    }
}

/// Pagination/search/filter query of every list route
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    page: Option<u32>,
    page_size: Option<u32>,
    #[serde(default)]
    search: String,
    role_id: Option<String>,
}

impl ListParams {
    fn paging(&self) -> ApiResult<(u32, u32)> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(shared::DEFAULT_PAGE_SIZE);
        if page == 0 || page_size == 0 {
            return Err(ApiError::BadRequest(
                "page and pageSize must be at least 1".into(),
            ));
        }
        Ok((page, page_size))
    }

    fn matches(&self, fields: &[&str]) -> bool {
        let needle = self.search.trim().to_lowercase();
        needle.is_empty() || fields.iter().any(|f| f.to_lowercase().contains(&needle))
    }
}

fn paginate<T>(items: Vec<T>, page: u32, page_size: u32) -> ListResponse<T> {
    let total = items.len() as u64;
    let offset = (page as usize - 1) * page_size as usize;
    let list = items
        .into_iter()
        .skip(offset)
        .take(page_size as usize)
        .collect();
    ListResponse { list, total }
}

/// Serializes `value`, wrapped in `{code, message, data}` when the envelope is on
fn reply<T: Serialize>(state: &MockState, value: T) -> ApiResult<Json<Value>> {
    let data = serde_json::to_value(value).map_err(|e| ApiError::Internal(e.to_string()))?;
    if state.envelope() {
        Ok(Json(serde_json::json!({ "code": 0, "message": "ok", "data": data })))
    } else {
        Ok(Json(data))
    }
}

async fn delay_for(state: &MockState, search: &str) {
    if let Some(delay) = state.search_delay(search) {
        tokio::time::sleep(delay).await;
    }
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}

fn require(value: &str, field: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{} is required", field)));
    }
    Ok(())
}

async fn record_request(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.record(request.method(), request.uri());
    next.run(request).await
}

// ========== Session ==========

async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> ApiResult<Json<Value>> {
    let account = {
        let data = state.data.lock();
        data.accounts
            .iter()
            .find(|r| r.account.username == req.username && r.password == req.password)
            .map(|r| r.account.clone())
    };
    let Some(account) = account else {
        tracing::info!(username = %req.username, "Login rejected");
        return Err(ApiError::BadRequest("invalid username or password".into()));
    };
    if account.status == Some(AccountStatus::Inactive) {
        return Err(ApiError::BadRequest("account is disabled".into()));
    }

    let token = state.issue_token(&account.id);
    let info = state.data.lock().user_info(&account, Some(token));
    tracing::info!(user_id = %account.id, "Login");
    reply(&state, info)
}

async fn current_user(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<Value>> {
    let info = state.data.lock().user_info(&user.account, None);
    reply(&state, info)
}

async fn logout(State(state): State<AppState>, user: AuthUser) -> StatusCode {
    state.revoke_token(&user.token);
    tracing::info!(user_id = %user.account.id, "Logout");
    StatusCode::NO_CONTENT
}

// ========== Accounts ==========

async fn list_accounts(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Value>> {
    let (page, page_size) = params.paging()?;
    delay_for(&state, &params.search).await;
    let items: Vec<Account> = state
        .data
        .lock()
        .accounts
        .iter()
        .map(|r| r.account.clone())
        .filter(|a| params.matches(&[a.username.as_str(), a.email.as_str()]))
        .collect();
    reply(&state, paginate(items, page, page_size))
}

async fn create_account(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<AccountCreate>,
) -> ApiResult<Json<Value>> {
    require(&req.username, "username")?;
    require(&req.password, "password")?;
    let account = {
        let mut data = state.data.lock();
        if data.accounts.iter().any(|r| r.account.username == req.username) {
            return Err(ApiError::Conflict(format!(
                "username {} already exists",
                req.username
            )));
        }
        let account = Account {
            id: new_id("u"),
            username: req.username,
            email: req.email,
            phone: req.phone,
            status: Some(AccountStatus::Active),
            roles: req.roles,
        };
        data.accounts.push(AccountRecord {
            account: account.clone(),
            password: req.password,
        });
        account
    };
    reply(&state, account)
}

async fn update_account(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<AccountUpdate>,
) -> ApiResult<Json<Value>> {
    let account = {
        let mut data = state.data.lock();
        let record = data
            .accounts
            .iter_mut()
            .find(|r| r.account.id == id)
            .ok_or_else(|| ApiError::not_found("account", &id))?;
        let account = &mut record.account;
        if let Some(username) = req.username {
            account.username = username;
        }
        if let Some(email) = req.email {
            account.email = email;
        }
        if req.phone.is_some() {
            account.phone = req.phone;
        }
        if req.status.is_some() {
            account.status = req.status;
        }
        if req.roles.is_some() {
            account.roles = req.roles;
        }
        account.clone()
    };
    reply(&state, account)
}

async fn delete_account(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let mut data = state.data.lock();
    let before = data.accounts.len();
    data.accounts.retain(|r| r.account.id != id);
    if data.accounts.len() == before {
        return Err(ApiError::not_found("account", &id));
    }
    data.tokens.retain(|_, account_id| *account_id != id);
    Ok(StatusCode::NO_CONTENT)
}

async fn account_roles(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let roles = state
        .data
        .lock()
        .accounts
        .iter()
        .find(|r| r.account.id == id)
        .map(|r| r.account.roles.clone().unwrap_or_default())
        .ok_or_else(|| ApiError::not_found("account", &id))?;
    reply(&state, roles)
}

async fn assign_account_roles(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<AssignRoles>,
) -> ApiResult<StatusCode> {
    let mut data = state.data.lock();
    if let Some(unknown) = req
        .role_ids
        .iter()
        .find(|rid| !data.roles.iter().any(|r| &r.id == *rid))
    {
        return Err(ApiError::BadRequest(format!("unknown role {}", unknown)));
    }
    let record = data
        .accounts
        .iter_mut()
        .find(|r| r.account.id == id)
        .ok_or_else(|| ApiError::not_found("account", &id))?;
    record.account.roles = Some(req.role_ids);
    Ok(StatusCode::NO_CONTENT)
}

// ========== Roles ==========

async fn list_roles(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Value>> {
    let (page, page_size) = params.paging()?;
    delay_for(&state, &params.search).await;
    let items: Vec<Role> = state
        .data
        .lock()
        .roles
        .iter()
        .filter(|r| params.matches(&[r.name.as_str(), r.desc.as_deref().unwrap_or_default()]))
        .cloned()
        .collect();
    reply(&state, paginate(items, page, page_size))
}

async fn all_roles(State(state): State<AppState>, _user: AuthUser) -> ApiResult<Json<Value>> {
    let options: Vec<RoleOption> = state
        .data
        .lock()
        .roles
        .iter()
        .map(|r| RoleOption {
            id: r.id.clone(),
            name: r.name.clone(),
        })
        .collect();
    reply(&state, options)
}

async fn create_role(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<RoleCreate>,
) -> ApiResult<Json<Value>> {
    require(&req.name, "name")?;
    let role = Role {
        id: new_id("r"),
        name: req.name,
        desc: req.desc,
        permission_ids: req.permission_ids,
    };
    state.data.lock().roles.push(role.clone());
    reply(&state, role)
}

async fn update_role(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<RoleUpdate>,
) -> ApiResult<Json<Value>> {
    require(&req.fields.name, "name")?;
    let role = {
        let mut data = state.data.lock();
        let role = data
            .roles
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ApiError::not_found("role", &id))?;
        role.name = req.fields.name;
        role.desc = req.fields.desc;
        if req.fields.permission_ids.is_some() {
            role.permission_ids = req.fields.permission_ids;
        }
        role.clone()
    };
    reply(&state, role)
}

async fn delete_role(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let mut data = state.data.lock();
    let before = data.roles.len();
    data.roles.retain(|r| r.id != id);
    if data.roles.len() == before {
        return Err(ApiError::not_found("role", &id));
    }
    for record in &mut data.accounts {
        if let Some(roles) = &mut record.account.roles {
            roles.retain(|rid| *rid != id);
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn role_permissions(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let ids = state
        .data
        .lock()
        .roles
        .iter()
        .find(|r| r.id == id)
        .map(|r| r.permission_ids.clone().unwrap_or_default())
        .ok_or_else(|| ApiError::not_found("role", &id))?;
    reply(&state, ids)
}

async fn assign_role_permissions(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<AssignPermissions>,
) -> ApiResult<StatusCode> {
    let mut data = state.data.lock();
    if let Some(unknown) = req
        .permission_ids
        .iter()
        .find(|pid| !data.permissions.iter().any(|p| &p.id == *pid))
    {
        return Err(ApiError::BadRequest(format!("unknown permission {}", unknown)));
    }
    let role = data
        .roles
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| ApiError::not_found("role", &id))?;
    role.permission_ids = Some(req.permission_ids);
    Ok(StatusCode::NO_CONTENT)
}

// ========== Permissions ==========

async fn list_permissions(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Value>> {
    let (page, page_size) = params.paging()?;
    delay_for(&state, &params.search).await;
    let items: Vec<Permission> = state
        .data
        .lock()
        .permissions
        .iter()
        .filter(|p| params.matches(&[p.name.as_str(), p.code.as_str()]))
        .cloned()
        .collect();
    reply(&state, paginate(items, page, page_size))
}

async fn create_permission(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<PermissionCreate>,
) -> ApiResult<Json<Value>> {
    require(&req.name, "name")?;
    require(&req.code, "code")?;
    let permission = {
        let mut data = state.data.lock();
        if data.permissions.iter().any(|p| p.code == req.code) {
            return Err(ApiError::Conflict(format!("code {} already exists", req.code)));
        }
        let stamp = now();
        let permission = Permission {
            id: new_id("p"),
            name: req.name,
            code: req.code,
            description: req.description,
            created_at: stamp.clone(),
            updated_at: stamp,
        };
        data.permissions.push(permission.clone());
        permission
    };
    reply(&state, permission)
}

async fn update_permission(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<PermissionUpdate>,
) -> ApiResult<Json<Value>> {
    require(&req.fields.name, "name")?;
    require(&req.fields.code, "code")?;
    let permission = {
        let mut data = state.data.lock();
        let permission = data
            .permissions
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::not_found("permission", &id))?;
        permission.name = req.fields.name;
        permission.code = req.fields.code;
        permission.description = req.fields.description;
        permission.updated_at = now();
        permission.clone()
    };
    reply(&state, permission)
}

async fn delete_permission(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let mut data = state.data.lock();
    let before = data.permissions.len();
    data.permissions.retain(|p| p.id != id);
    if data.permissions.len() == before {
        return Err(ApiError::not_found("permission", &id));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ========== Rules ==========

async fn list_rules(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Value>> {
    let (page, page_size) = params.paging()?;
    delay_for(&state, &params.search).await;
    let items: Vec<Rule> = state
        .data
        .lock()
        .rules
        .iter()
        .filter(|r| params.role_id.as_ref().is_none_or(|role_id| &r.role_id == role_id))
        .filter(|r| params.matches(&[r.resource.as_str(), r.action.as_str()]))
        .cloned()
        .collect();
    reply(&state, paginate(items, page, page_size))
}

async fn create_rule(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<RuleCreate>,
) -> ApiResult<Json<Value>> {
    require(&req.role_id, "roleId")?;
    require(&req.resource, "resource")?;
    require(&req.action, "action")?;
    let stamp = now();
    let rule = Rule {
        id: new_id("rule"),
        role_id: req.role_id,
        resource: req.resource,
        action: req.action,
        effect: req.effect,
        description: req.description,
        created_at: stamp.clone(),
        updated_at: stamp,
    };
    state.data.lock().rules.push(rule.clone());
    reply(&state, rule)
}

async fn update_rule(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<RuleUpdate>,
) -> ApiResult<Json<Value>> {
    let rule = {
        let mut data = state.data.lock();
        let rule = data
            .rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ApiError::not_found("rule", &id))?;
        rule.role_id = req.fields.role_id;
        rule.resource = req.fields.resource;
        rule.action = req.fields.action;
        rule.effect = req.fields.effect;
        rule.description = req.fields.description;
        rule.updated_at = now();
        rule.clone()
    };
    reply(&state, rule)
}

async fn delete_rule(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let mut data = state.data.lock();
    let before = data.rules.len();
    data.rules.retain(|r| r.id != id);
    if data.rules.len() == before {
        return Err(ApiError::not_found("rule", &id));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub fn router(state: AppState) -> Router {
    use tower::limit::ConcurrencyLimitLayer;

    // 并发限制：最多 100 个并发请求
    let concurrency_limit = ConcurrencyLimitLayer::new(100);

    Router::new()
        .route("/api/login", post(login))
        .route("/api/user", get(current_user))
        .route("/api/logout", post(logout))
        // 账号: update/delete 走 POST
        .route("/api/accounts", get(list_accounts).post(create_account))
        .route("/api/accounts/{id}", post(update_account))
        .route("/api/accounts/{id}/delete", post(delete_account))
        .route(
            "/api/accounts/{id}/roles",
            get(account_roles).post(assign_account_roles),
        )
        .route("/api/roles", get(list_roles).post(create_role))
        .route("/api/roles/all", get(all_roles))
        .route("/api/roles/{id}", put(update_role).delete(delete_role))
        .route(
            "/api/roles/{id}/permissions",
            get(role_permissions).post(assign_role_permissions),
        )
        .route("/api/permissions", get(list_permissions).post(create_permission))
        .route(
            "/api/permissions/{id}",
            put(update_permission).delete(delete_permission),
        )
        .route("/api/rules", get(list_rules).post(create_rule))
        .route("/api/rules/{id}", put(update_rule).delete(delete_rule))
        // 请求记录 (测试用)
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .layer(concurrency_limit)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use tower::ServiceExt;

    use crate::state::{SEED_PASSWORD, SEED_USERNAME};

    async fn call(app: &Router, request: axum::http::Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn login_token(app: &Router) -> String {
        let (status, body) = call(
            app,
            json_request(
                "POST",
                "/api/login",
                None,
                serde_json::json!({ "username": SEED_USERNAME, "password": SEED_PASSWORD }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_list_requires_token() {
        let app = router(Arc::new(MockState::new()));
        let (status, body) = call(&app, json_request("GET", "/api/roles", None, Value::Null)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], 401);
    }

    #[tokio::test]
    async fn test_list_paginates_and_searches() {
        let state = Arc::new(MockState::new().with_envelope(false));
        let app = router(state.clone());
        let token = login_token_bare(&app).await;

        let (status, body) = call(
            &app,
            json_request("GET", "/api/permissions?page=2&pageSize=3", Some(&token), Value::Null),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 4);
        assert_eq!(body["list"].as_array().unwrap().len(), 1);

        let (_, body) = call(
            &app,
            json_request("GET", "/api/permissions?search=ROLE", Some(&token), Value::Null),
        )
        .await;
        assert_eq!(body["total"], 2);

        assert_eq!(state.count_requests("GET", "/api/permissions"), 2);
    }

    async fn login_token_bare(app: &Router) -> String {
        let (_, body) = call(
            app,
            json_request(
                "POST",
                "/api/login",
                None,
                serde_json::json!({ "username": SEED_USERNAME, "password": SEED_PASSWORD }),
            ),
        )
        .await;
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_zero_page_size_rejected() {
        let app = router(Arc::new(MockState::new()));
        let token = login_token(&app).await;
        let (status, _) = call(
            &app,
            json_request("GET", "/api/accounts?page=1&pageSize=0", Some(&token), Value::Null),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_account_delete_over_post() {
        let app = router(Arc::new(MockState::new()));
        let token = login_token(&app).await;

        let (status, _) = call(
            &app,
            json_request("POST", "/api/accounts/u-operator/delete", Some(&token), Value::Null),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = call(
            &app,
            json_request("POST", "/api/accounts/u-operator/delete", Some(&token), Value::Null),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "account u-operator not found");
    }

    #[tokio::test]
    async fn test_wrong_password_is_bad_request() {
        let app = router(Arc::new(MockState::new()));
        let (status, _) = call(
            &app,
            json_request(
                "POST",
                "/api/login",
                None,
                serde_json::json!({ "username": SEED_USERNAME, "password": "nope" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
