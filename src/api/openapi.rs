//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, sweet_handler};
use crate::domain::{AccountResponse, Role, Sweet};
use crate::types::{LoginResponse, MessageResponse, RegisteredResponse};

/// OpenAPI documentation for the CraveCraft API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CraveCraft Sweet Shop API",
        version = "0.1.0",
        description = "Sweet shop inventory with JWT authentication and role-based access",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        sweet_handler::create_sweet,
        sweet_handler::list_sweets,
        sweet_handler::search_sweets,
        sweet_handler::get_sweet,
        sweet_handler::update_sweet,
        sweet_handler::delete_sweet,
        sweet_handler::purchase_sweet,
        sweet_handler::restock_sweet,
    ),
    components(
        schemas(
            Role,
            AccountResponse,
            Sweet,
            RegisteredResponse,
            LoginResponse,
            MessageResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            sweet_handler::CreateSweetRequest,
            sweet_handler::UpdateSweetRequest,
            sweet_handler::RestockRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Account registration and login"),
        (name = "Sweets", description = "Catalog, purchase and restock")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_catalog_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();

        assert!(paths.contains(&"/api/auth/register".to_string()));
        assert!(paths.contains(&"/api/sweets/{id}/purchase".to_string()));
        assert!(paths.contains(&"/api/sweets/search".to_string()));
    }
}
