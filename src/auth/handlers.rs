use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, GuestResponse, JwtKeys, LoginRequest, MeResponse, PublicUser,
            RefreshRequest, RegisterRequest, UpdateAccountRequest,
        },
        repo::User,
        services::{hash_password, is_valid_email, verify_password, AuthUser},
    },
    identity::Identity,
    profile::{repo as profile_repo, sync},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/guest", post(guest))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me).put(update_me))
}

/// Move a guest session's scratch state under the logged-in identity and
/// persist any profile the guest had already filled in, then reconcile the
/// session profile with storage (once per login).
async fn adopt_guest_session(state: &AppState, user_id: i64, guest_token: Option<String>) {
    let identity = Identity::Registered(user_id);
    let key = identity.session_key();

    if let Some(token) = guest_token {
        if let Some(guest) = state.sessions.remove(&token) {
            if let Some(profile) = &guest.profile {
                let worth_saving = !profile.name.is_empty()
                    || profile.nutrition.map_or(false, |n| n.calories > 0);
                if worth_saving {
                    if let Err(e) = profile_repo::save_profile(&state.db, user_id, profile).await {
                        warn!(error = %e, user_id, "could not persist guest profile");
                    }
                }
            }
            state.sessions.update(&key, |s| {
                *s = guest.clone();
                s.synced = false;
            });
        }
    }

    let session = state.sessions.get(&key);
    if !session.synced {
        match sync::reconcile(&state.db, user_id, session.profile.as_ref()).await {
            Ok(merged) => {
                state.sessions.update(&key, |s| {
                    s.profile = Some(merged);
                    s.synced = true;
                });
            }
            Err(e) => {
                // Degraded session-only mode; the next profile read retries.
                warn!(error = %e, user_id, "profile sync failed on login");
            }
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    payload.username = payload.username.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    if payload.username.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "All fields are required".into()));
    }

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((StatusCode::BAD_REQUEST, "Invalid email format".into()));
    }

    if payload.password.len() < 8 {
        warn!("password too short");
        return Err((
            StatusCode::BAD_REQUEST,
            "Password must be at least 8 characters long".into(),
        ));
    }

    match User::name_or_email_taken(&state.db, &payload.username, &payload.email, None).await {
        Ok(true) => {
            warn!(username = %payload.username, "username or email already registered");
            return Err((
                StatusCode::CONFLICT,
                "Username or email already exists".into(),
            ));
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "uniqueness check failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    }

    let hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "hash_password failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let user = match User::create(&state.db, &payload.username, &payload.email, &hash).await {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    adopt_guest_session(&state, user.id, payload.guest_token).await;

    let identity = Identity::Registered(user.id);
    let keys = JwtKeys::from_ref(&state);
    let access_token = keys
        .sign_access(&identity)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let refresh_token = keys
        .sign_refresh(&identity)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            id: user.id,
            username: user.username,
            email: user.email,
        },
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Please enter both username and password".into(),
        ));
    }

    let user = match User::find_by_username(&state.db, &payload.username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(username = %payload.username, "login unknown username");
            return Err((
                StatusCode::UNAUTHORIZED,
                "Invalid username or password".into(),
            ));
        }
        Err(e) => {
            error!(error = %e, "find_by_username failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let ok = match verify_password(&payload.password, &user.password_hash) {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "verify_password failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    if !ok {
        warn!(username = %payload.username, user_id = %user.id, "login invalid password");
        return Err((
            StatusCode::UNAUTHORIZED,
            "Invalid username or password".into(),
        ));
    }

    adopt_guest_session(&state, user.id, payload.guest_token).await;

    let identity = Identity::Registered(user.id);
    let keys = JwtKeys::from_ref(&state);
    let access_token = keys
        .sign_access(&identity)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let refresh_token = keys
        .sign_refresh(&identity)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            id: user.id,
            username: user.username,
            email: user.email,
        },
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| (StatusCode::UNAUTHORIZED, format!("{}", e)))?;

    let identity = Identity::from_subject(&claims.sub);
    let user_id = match &identity {
        Identity::Registered(id) => *id,
        Identity::Anonymous(_) => {
            return Err((
                StatusCode::UNAUTHORIZED,
                "Guest sessions cannot be refreshed".into(),
            ))
        }
    };

    let access_token = keys
        .sign_access(&identity)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let refresh_token = keys
        .sign_refresh(&identity)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let user = User::find_by_id(&state.db, user_id)
        .await
        .ok()
        .flatten()
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            id: user.id,
            username: user.username,
            email: user.email,
        },
    }))
}

/// Mint an anonymous demo session: a token the client can use immediately,
/// with all persistence quietly disabled downstream.
#[instrument(skip(state))]
pub async fn guest(
    State(state): State<AppState>,
) -> Result<Json<GuestResponse>, (StatusCode, String)> {
    let identity = Identity::guest();
    let keys = JwtKeys::from_ref(&state);
    let access_token = keys
        .sign_access(&identity)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let guest_token = identity.session_key();
    state.sessions.update(&guest_token, |_| {});
    info!(%guest_token, "guest session started");
    Ok(Json(GuestResponse {
        access_token,
        guest_token,
    }))
}

/// Persist the session profile, then discard the session.
#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Json<serde_json::Value> {
    let key = identity.session_key();
    if let Identity::Registered(user_id) = &identity {
        let session = state.sessions.get(&key);
        if let Some(profile) = &session.profile {
            if let Err(e) = profile_repo::save_profile(&state.db, *user_id, profile).await {
                warn!(error = %e, user_id, "could not persist profile at logout");
            }
        }
    }
    state.sessions.remove(&key);
    info!(session = %key, "session discarded");
    Json(serde_json::json!({ "message": "Logged out" }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<MeResponse>, (StatusCode, String)> {
    let user_id = identity
        .registered("view account information")
        .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;

    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    Ok(Json(MeResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        created_at: user.created_at,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(mut payload): Json<UpdateAccountRequest>,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let user_id = identity
        .registered("update account information")
        .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;

    payload.username = payload.username.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    if payload.username.is_empty() || payload.email.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Username and email are required".into(),
        ));
    }
    if !is_valid_email(&payload.email) {
        return Err((StatusCode::BAD_REQUEST, "Invalid email format".into()));
    }

    let new_hash = match &payload.password {
        Some(p) if p.len() < 8 => {
            return Err((
                StatusCode::BAD_REQUEST,
                "Password must be at least 8 characters long".into(),
            ))
        }
        Some(p) => Some(
            hash_password(p).map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?,
        ),
        None => None,
    };

    match User::name_or_email_taken(&state.db, &payload.username, &payload.email, Some(user_id))
        .await
    {
        Ok(true) => {
            return Err((
                StatusCode::CONFLICT,
                "Username or email already exists".into(),
            ))
        }
        Ok(false) => {}
        Err(e) => return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }

    User::update_account(
        &state.db,
        user_id,
        &payload.username,
        &payload.email,
        new_hash.as_deref(),
    )
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    info!(user_id, "account updated");
    Ok(Json(PublicUser {
        id: user_id,
        username: payload.username,
        email: payload.email,
    }))
}
