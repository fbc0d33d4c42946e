//! Middleware de autenticación JWT
//!
//! Extrae y valida el token Bearer, carga el usuario y lo inyecta en la
//! request. Los roles se verifican en cada operación del CRM con los
//! helpers de `AuthenticatedUser`.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    models::user::UserRole,
    repositories::user_repository::UserRepository,
    state::AppState,
    utils::{errors::AppError, jwt},
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// Crear/editar flota, clientes y reservas: admin o staff.
    pub fn require_staff(&self) -> Result<(), AppError> {
        match self.role {
            UserRole::Admin | UserRole::Staff => Ok(()),
            UserRole::Viewer => Err(AppError::Forbidden(
                "Se requieren permisos de staff".to_string(),
            )),
        }
    }

    /// Dashboard, borrado y gestión de usuarios: solo admin.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role != UserRole::Admin {
            return Err(AppError::Forbidden(
                "Se requieren permisos de administrador".to_string(),
            ));
        }
        Ok(())
    }
}

/// Middleware de autenticación JWT para las rutas del CRM
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let token = jwt::extract_token_from_header(auth_header)?;
    let claims = jwt::verify_token(token, &state.config)?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("ID de usuario inválido".to_string()))?;

    // Verificar que el usuario existe y sigue activo
    let user = UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    if !user.is_active {
        return Err(AppError::Unauthorized(
            "Usuario inactivo o suspendido".to_string(),
        ));
    }

    let authenticated_user = AuthenticatedUser {
        user_id: user.id,
        username: user.username,
        role: user.role,
    };

    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            username: "test".to_string(),
            role,
        }
    }

    #[test]
    fn admin_passes_every_gate() {
        let admin = user(UserRole::Admin);
        assert!(admin.require_staff().is_ok());
        assert!(admin.require_admin().is_ok());
    }

    #[test]
    fn staff_cannot_use_admin_operations() {
        let staff = user(UserRole::Staff);
        assert!(staff.require_staff().is_ok());
        assert!(matches!(staff.require_admin(), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn viewer_is_read_only() {
        let viewer = user(UserRole::Viewer);
        assert!(matches!(viewer.require_staff(), Err(AppError::Forbidden(_))));
        assert!(matches!(viewer.require_admin(), Err(AppError::Forbidden(_))));
    }
}
