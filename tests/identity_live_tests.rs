//! Round trip against a real hosted identity provider.
//!
//! Needs `STUDIODESK_IDENTITY_URL` and `STUDIODESK_SERVICE_ROLE_KEY`:
//!
//! ```sh
//! cargo test --features identity-integration --test identity_live_tests
//! ```

#![cfg(feature = "identity-integration")]

use studiodesk::adapter::outbound::identity::HostedIdentity;
use studiodesk::domain::{BusinessId, Role};
use studiodesk::error::IdentityError;
use studiodesk::port::{IdentityMetadata, IdentityProvider, NewIdentity};

fn provider() -> HostedIdentity {
    let url = std::env::var("STUDIODESK_IDENTITY_URL").expect("STUDIODESK_IDENTITY_URL");
    HostedIdentity::from_env(&url).expect("hosted identity client")
}

fn request(email: &str) -> NewIdentity {
    NewIdentity {
        email: email.to_string(),
        password: "integration-pass-1".into(),
        metadata: IdentityMetadata {
            first_name: "Live".into(),
            last_name: "Test".into(),
            phone: None,
            role: Role::Student,
            business_id: BusinessId::new(),
        },
    }
}

#[tokio::test]
async fn create_then_delete_identity() {
    let hosted = provider();
    let email = format!("studiodesk-{}@example.com", uuid::Uuid::new_v4());

    let identity = hosted.create_identity(&request(&email)).await.expect("create");
    assert_eq!(identity.email, email);

    let duplicate = hosted.create_identity(&request(&email)).await;
    assert!(matches!(duplicate, Err(IdentityError::Rejected(_))));

    hosted.delete_identity(&identity.id).await.expect("delete");
    let again = hosted.delete_identity(&identity.id).await;
    assert!(matches!(again, Err(IdentityError::NotFound(_))));
}
