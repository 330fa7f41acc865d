use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::dto::common::ApiResponse;
use crate::models::user::{UserRole, UserStatus};
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};
use sqlx::PgPool;
use validator::Validate;

pub struct AuthController {
    repository: UserRepository,
    jwt_config: JwtConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, jwt_config: JwtConfig) -> Self {
        Self {
            repository: UserRepository::new(pool),
            jwt_config,
        }
    }

    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        request.validate()?;

        // Solo customer y owner se registran por la API
        let role = match UserRole::parse(&request.role) {
            Some(UserRole::Customer) => UserRole::Customer,
            Some(UserRole::Owner) => UserRole::Owner,
            _ => {
                return Err(AppError::BadRequest(format!(
                    "Invalid role '{}': expected 'customer' or 'owner'",
                    request.role
                )))
            }
        };

        if self.repository.email_exists(&request.email).await? {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))?;

        let user = self
            .repository
            .create(request.full_name, request.email, password_hash, role)
            .await?;

        Ok(ApiResponse::success_with_message(
            user.into(),
            "Account created successfully".to_string(),
        ))
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        request.validate()?;

        let user = self
            .repository
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        let valid = bcrypt::verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verifying password: {}", e)))?;

        if !valid {
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        if user.status != UserStatus::Active {
            return Err(AppError::Unauthorized("Account is suspended".to_string()));
        }

        let token = generate_token(user.id, user.role.as_str(), &self.jwt_config)?;

        Ok(LoginResponse {
            success: true,
            token,
            user: user.into(),
        })
    }
}
