use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use registrar_models::{
    CreateStudentDto, ErrorResponse, HealthResponse, Student, TokenResponse, UpdateStudentDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::health::controller::health,
        crate::modules::health::controller::ready,
    ),
    components(
        schemas(
            Student,
            CreateStudentDto,
            UpdateStudentDto,
            TokenResponse,
            ErrorResponse,
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Self-registration"),
        (name = "Students", description = "Student records"),
        (name = "Health", description = "Liveness and readiness checks")
    ),
    info(
        title = "Registrar API",
        version = "0.1.0",
        description = "Student records behind a token-authenticated, ownership-checked REST API.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            // `Authorization: Token <credential>`, scheme word optional
            components.add_security_scheme(
                "token_auth",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "Authorization",
                    "Signed token or admin token, optionally prefixed with `Token `",
                ))),
            )
        }
    }
}
