use super::handlers::{health, login};
use crate::auth::{LoginRequest, LoginResponse};
use utoipa::{
    openapi::{Contact, License},
    OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(health::health, login::login),
    components(schemas(LoginRequest, LoginResponse, health::Health)),
    tags(
        (name = "auth", description = "Login and bootstrap provisioning"),
        (name = "health", description = "Service health")
    )
)]
struct ApiDoc;

/// `OpenAPI` document with Cargo metadata filled in.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();

    doc.info.title = env!("CARGO_PKG_NAME").to_string();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();
    doc.info.description = optional_str(env!("CARGO_PKG_DESCRIPTION"));
    doc.info.contact = cargo_contact();
    doc.info.license = optional_str(env!("CARGO_PKG_LICENSE")).map(License::new);

    doc
}

fn cargo_contact() -> Option<Contact> {
    // Cargo authors are `;` separated and may include "Name <email>".
    let primary = env!("CARGO_PKG_AUTHORS").split(';').next().map(str::trim)?;
    if primary.is_empty() {
        return None;
    }

    let mut contact = Contact::new();
    match primary.split_once('<') {
        Some((name, email)) => {
            contact.name = optional_str(name.trim());
            contact.email = optional_str(email.trim_end_matches('>').trim());
        }
        None => contact.name = Some(primary.to_string()),
    }
    Some(contact)
}

fn optional_str(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_documents_login_and_health() {
        let doc = openapi();
        assert_eq!(doc.info.title, env!("CARGO_PKG_NAME"));
        assert!(doc.paths.paths.contains_key("/login"));
        assert!(doc.paths.paths.contains_key("/health"));
    }

    #[test]
    fn contact_parses_name_and_email() {
        let contact = cargo_contact();
        assert_eq!(
            contact.as_ref().and_then(|c| c.email.clone()),
            Some("team@tollgate.dev".to_string())
        );
        assert_eq!(
            contact.and_then(|c| c.name),
            Some("Team Tollgate".to_string())
        );
    }
}
