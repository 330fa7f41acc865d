//! Middleware de autenticación JWT
//!
//! Un único middleware parametrizado por rol en lugar de una copia por
//! rol: `authorize` valida el token, comprueba el usuario contra la
//! base de datos y verifica el rol requerido. Los wrappers por rol
//! existen solo porque `from_fn_with_state` necesita un fn concreto.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{
    models::user::{User, UserRole, UserStatus},
    state::AppState,
    utils::errors::AppError,
    utils::jwt::{extract_token_from_header, verify_token, JwtConfig},
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: uuid::Uuid,
    pub role: UserRole,
}

async fn authorize(
    required_role: UserRole,
    state: AppState,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))?;

    let token = extract_token_from_header(auth_header)?;

    let jwt_config = JwtConfig::from(&state.config);
    let claims = verify_token(token, &jwt_config)?;

    let user_id = uuid::Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user id in token".to_string()))?;

    // Verificar que el usuario existe y sigue activo
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    if user.status != UserStatus::Active {
        return Err(AppError::Unauthorized(
            "Account is suspended".to_string(),
        ));
    }

    if user.role != required_role {
        return Err(AppError::Forbidden(format!(
            "This endpoint requires the '{}' role",
            required_role.as_str()
        )));
    }

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        role: user.role,
    });

    Ok(next.run(request).await)
}

pub async fn customer_only(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(UserRole::Customer, state, request, next).await
}

pub async fn owner_only(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(UserRole::Owner, state, request, next).await
}

pub async fn admin_only(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(UserRole::Admin, state, request, next).await
}
