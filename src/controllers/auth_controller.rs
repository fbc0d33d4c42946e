use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::auth_dto::{
    CreateUserRequest, CrmRootResponse, LoginRequest, LoginResponse, UserResponse,
};
use crate::dto::common::ApiResponse;
use crate::models::user::UserRole;
use crate::repositories::user_repository::UserRepository;
use crate::state::AppState;
use crate::utils::{errors::AppError, jwt};

pub struct AuthController {
    state: AppState,
}

impl AuthController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Login del CRM. Los fallos cuentan contra la clave usuario:ip; al
    /// superar el umbral la clave queda bloqueada hasta que expire el
    /// cooloff. Un login exitoso limpia la cuenta.
    pub async fn login(&self, request: LoginRequest, ip: &str) -> Result<LoginResponse, AppError> {
        request.validate()?;

        self.state.login_guard.check(&request.username, ip).await?;

        let repository = UserRepository::new(self.state.pool.clone());
        let user = repository.find_by_username(&request.username).await?;

        // Misma respuesta para usuario inexistente y password incorrecto
        let invalid = || AppError::Unauthorized("Credenciales inválidas".to_string());

        let user = match user {
            Some(user) if user.is_active => user,
            _ => {
                self.state
                    .login_guard
                    .record_failure(&request.username, ip)
                    .await;
                warn!(username = %request.username, "Login fallido");
                return Err(invalid());
            }
        };

        let password_ok = bcrypt::verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        if !password_ok {
            self.state
                .login_guard
                .record_failure(&request.username, ip)
                .await;
            warn!(username = %request.username, "Login fallido");
            return Err(invalid());
        }

        self.state.login_guard.reset(&request.username, ip).await;

        let token = jwt::generate_token(user.id, &user.username, user.role, &self.state.config)?;

        info!(username = %user.username, role = ?user.role, "Login exitoso");

        Ok(LoginResponse {
            token,
            user: user.into(),
        })
    }

    pub async fn me(&self, user_id: Uuid) -> Result<UserResponse, AppError> {
        let user = UserRepository::new(self.state.pool.clone())
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        Ok(user.into())
    }

    /// Alta de usuarios del CRM, solo admin.
    pub async fn create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        request.validate()?;

        let repository = UserRepository::new(self.state.pool.clone());

        if repository.username_exists(&request.username).await? {
            return Err(AppError::Conflict(
                "El nombre de usuario ya existe".to_string(),
            ));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        let user = repository
            .create(
                request.username,
                password_hash,
                request.full_name,
                request.role,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            user.into(),
            "Usuario creado correctamente.".to_string(),
        ))
    }

    /// Landing del CRM según el rol del usuario autenticado.
    pub fn crm_root(role: UserRole) -> CrmRootResponse {
        let landing = match role {
            UserRole::Admin => "dashboard",
            UserRole::Staff | UserRole::Viewer => "reservations",
        };
        CrmRootResponse { role, landing }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_lands_on_the_dashboard() {
        assert_eq!(AuthController::crm_root(UserRole::Admin).landing, "dashboard");
        assert_eq!(AuthController::crm_root(UserRole::Staff).landing, "reservations");
        assert_eq!(AuthController::crm_root(UserRole::Viewer).landing, "reservations");
    }
}
