use axum::{
    Json, Router,
    body::Bytes,
    extract::{Extension, Form, Path},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;

use userauth_auth::{AuthError, AuthService, NewUser, ResourceGateway, TokenCodec, UserPatch};
use userauth_core::{LoginId, Role, UserId};
use userauth_picmodel::{CelebrityClassifier, StubCelebDetector};
use userauth_store::{InMemoryLoginStore, InMemoryUserStore, UserChanges, UserStore};

use crate::config::ServerConfig;
use crate::dto::{LoginForm, LoginRecordDto, RegisterRequest, TokenPackage, UserDto};
use crate::middleware::{AuthState, CurrentUser, auth_middleware};

pub type AppUserStore = Arc<InMemoryUserStore>;
pub type AppLoginStore = Arc<InMemoryLoginStore>;
pub type AppClassifier = Arc<dyn CelebrityClassifier>;
pub type AppAuthService = AuthService<AppUserStore, AppLoginStore>;
pub type AppGateway = ResourceGateway<AppUserStore, AppLoginStore, AppClassifier>;

#[derive(Clone)]
struct AppServices {
    auth: AppAuthService,
    gateway: AppGateway,
}

/// Everything `build_app` needs, decoupled from the process environment so
/// tests can wire their own secret, ttl and classifier.
pub struct AppOptions {
    pub auth_secret: String,
    pub token_ttl: chrono::Duration,
    pub classifier: AppClassifier,
    pub admin_bootstrap: Option<(String, String)>,
}

impl AppOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        let classifier: AppClassifier = match &config.stub_prediction {
            Some((name, confidence)) => {
                Arc::new(StubCelebDetector::recognizing(name.clone(), *confidence))
            }
            None => Arc::new(StubCelebDetector::rejecting()),
        };

        Self {
            auth_secret: config.auth_secret.clone(),
            token_ttl: config.token_ttl,
            classifier,
            admin_bootstrap: config.admin_bootstrap.clone(),
        }
    }
}

pub fn build_app(options: AppOptions) -> Router {
    let users: AppUserStore = Arc::new(InMemoryUserStore::new());
    let logins: AppLoginStore = Arc::new(InMemoryLoginStore::new());

    let tokens = TokenCodec::new(options.auth_secret.as_bytes());
    let auth = AuthService::new(users.clone(), logins.clone(), tokens, options.token_ttl);
    let gateway = ResourceGateway::new(users.clone(), logins, options.classifier);

    if let Some((username, password)) = options.admin_bootstrap {
        seed_admin(&auth, &users, username, password);
    }

    let auth_state = AuthState { auth: auth.clone() };
    let services = Arc::new(AppServices { auth, gateway });

    // Everything below requires a valid bearer token.
    let protected = Router::new()
        .route("/users", get(list_users))
        .route("/users/me", get(get_me))
        .route("/users/me/logins", get(list_my_logins))
        .route("/users/me/logins/:login_id", get(get_my_login))
        .route(
            "/users/:user_id",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/users/:user_id/logins", get(list_user_logins))
        .route("/users/:user_id/logins/:login_id", get(get_user_login))
        .route("/users/:user_id/validate_photo", post(validate_photo))
        .route("/logins", get(list_logins))
        .route("/logins/:login_id", get(get_login))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/token", post(login))
        .route("/users", post(register))
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}

/// Seed the admin account on boot. The store starts empty every run, so a
/// conflict here means the operator configured two bootstraps with the same
/// name; warn and keep serving.
fn seed_admin(auth: &AppAuthService, users: &AppUserStore, username: String, password: String) {
    let email = format!("{username}@admin.local");
    let new_user = NewUser {
        username,
        password,
        email,
        name: "Admin".to_string(),
        surname: "Admin".to_string(),
    };

    let seeded = auth
        .register(new_user)
        .and_then(|user| Ok(users.update(user.id, UserChanges::role(Role::Admin))?));

    match seeded {
        Ok(admin) => tracing::info!(user_id = %admin.id, "admin account seeded"),
        Err(e) => tracing::warn!("admin bootstrap failed: {e}"),
    }
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<RegisterRequest>,
) -> Response {
    match services.auth.register(body.into()) {
        Ok(user) => (StatusCode::CREATED, Json(UserDto::from(user))).into_response(),
        Err(e) => auth_error_response(e),
    }
}

async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Form(body): Form<LoginForm>,
) -> Response {
    match services.auth.login(&body.username, &body.password) {
        Ok((token, _)) => Json(TokenPackage::bearer(token)).into_response(),
        Err(e) => auth_error_response(e),
    }
}

async fn get_me(Extension(CurrentUser(actor)): Extension<CurrentUser>) -> Response {
    Json(UserDto::from(actor)).into_response()
}

async fn list_my_logins(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
) -> Response {
    match services.gateway.list_user_logins(&actor, actor.id) {
        Ok(records) => login_list_response(records),
        Err(e) => auth_error_response(e),
    }
}

async fn get_my_login(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(login_id): Path<String>,
) -> Response {
    let login_id: LoginId = match login_id.parse() {
        Ok(v) => v,
        Err(_) => return json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid login id"),
    };

    match services.gateway.get_login(&actor, login_id) {
        Ok(record) => Json(LoginRecordDto::from(record)).into_response(),
        Err(e) => auth_error_response(e),
    }
}

async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
) -> Response {
    match services.gateway.list_users(&actor) {
        Ok(users) => {
            let users: Vec<UserDto> = users.into_iter().map(UserDto::from).collect();
            Json(users).into_response()
        }
        Err(e) => auth_error_response(e),
    }
}

async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(user_id): Path<String>,
) -> Response {
    let user_id: UserId = match user_id.parse() {
        Ok(v) => v,
        Err(_) => return json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id"),
    };

    match services.gateway.get_user(&actor, user_id) {
        Ok(user) => Json(UserDto::from(user)).into_response(),
        Err(e) => auth_error_response(e),
    }
}

async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(user_id): Path<String>,
    Json(body): Json<UserDto>,
) -> Response {
    let user_id: UserId = match user_id.parse() {
        Ok(v) => v,
        Err(_) => return json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id"),
    };

    let patch = UserPatch::from(body);
    match services.gateway.update_user(&actor, user_id, &patch) {
        Ok(user) => Json(UserDto::from(user)).into_response(),
        Err(e) => auth_error_response(e),
    }
}

async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(user_id): Path<String>,
) -> Response {
    let user_id: UserId = match user_id.parse() {
        Ok(v) => v,
        Err(_) => return json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id"),
    };

    match services.gateway.delete_user(&actor, user_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => auth_error_response(e),
    }
}

async fn list_user_logins(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(user_id): Path<String>,
) -> Response {
    let user_id: UserId = match user_id.parse() {
        Ok(v) => v,
        Err(_) => return json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id"),
    };

    match services.gateway.list_user_logins(&actor, user_id) {
        Ok(records) => login_list_response(records),
        Err(e) => auth_error_response(e),
    }
}

async fn get_user_login(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path((user_id, login_id)): Path<(String, String)>,
) -> Response {
    let user_id: UserId = match user_id.parse() {
        Ok(v) => v,
        Err(_) => return json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id"),
    };
    let login_id: LoginId = match login_id.parse() {
        Ok(v) => v,
        Err(_) => return json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid login id"),
    };

    match services.gateway.get_user_login(&actor, user_id, login_id) {
        Ok(record) => Json(LoginRecordDto::from(record)).into_response(),
        Err(e) => auth_error_response(e),
    }
}

/// The claim always applies to the authenticated actor; the path id only has
/// to be well formed.
async fn validate_photo(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(user_id): Path<String>,
    body: Bytes,
) -> Response {
    if user_id.parse::<UserId>().is_err() {
        return json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id");
    }

    match services.gateway.claim_celebrity(&actor, &body) {
        Ok(user) => Json(UserDto::from(user)).into_response(),
        Err(e) => auth_error_response(e),
    }
}

async fn list_logins(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
) -> Response {
    match services.gateway.list_logins(&actor) {
        Ok(records) => login_list_response(records),
        Err(e) => auth_error_response(e),
    }
}

async fn get_login(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(login_id): Path<String>,
) -> Response {
    let login_id: LoginId = match login_id.parse() {
        Ok(v) => v,
        Err(_) => return json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid login id"),
    };

    match services.gateway.get_login(&actor, login_id) {
        Ok(record) => Json(LoginRecordDto::from(record)).into_response(),
        Err(e) => auth_error_response(e),
    }
}

fn login_list_response(records: Vec<userauth_core::LoginRecord>) -> Response {
    let records: Vec<LoginRecordDto> = records.into_iter().map(LoginRecordDto::from).collect();
    Json(records).into_response()
}

fn auth_error_response(err: AuthError) -> Response {
    match err {
        AuthError::InvalidCredentials => bearer_challenge(
            json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", err.to_string()),
        ),
        AuthError::InvalidToken => bearer_challenge(
            json_error(StatusCode::UNAUTHORIZED, "invalid_token", err.to_string()),
        ),
        AuthError::UsernameTaken => {
            json_error(StatusCode::CONFLICT, "username_taken", err.to_string())
        }
        AuthError::EmailTaken => json_error(StatusCode::CONFLICT, "email_taken", err.to_string()),
        AuthError::NotVisible => {
            json_error(StatusCode::NOT_FOUND, "not_found", "resource not found")
        }
        AuthError::NotPermitted => {
            json_error(StatusCode::METHOD_NOT_ALLOWED, "not_permitted", err.to_string())
        }
        AuthError::ImmutableFieldChanged => json_error(
            StatusCode::METHOD_NOT_ALLOWED,
            "immutable_field",
            err.to_string(),
        ),
        AuthError::UnrecognizedCelebrity => json_error(
            StatusCode::FORBIDDEN,
            "unrecognized_celebrity",
            err.to_string(),
        ),
        AuthError::Store(_) | AuthError::Classifier(_) | AuthError::Internal(_) => {
            tracing::error!("request failed: {err}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                "internal server error",
            )
        }
    }
}

fn bearer_challenge(mut response: Response) -> Response {
    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        axum::http::HeaderValue::from_static("Bearer"),
    );
    response
}

fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
