mod common;

use axum::http::StatusCode;
use common::{INITIAL_ROLE, auth, test_app};
use marketplace_directory::{
    clients::ProfileImage,
    dto::users::RegisterUserRequest,
    error::AppError,
    models::User,
    services::{profile_image_service, timezone_service, user_service},
};
use uuid::Uuid;

fn registration(email: &str, password: &str) -> RegisterUserRequest {
    RegisterUserRequest {
        email: email.into(),
        password: password.into(),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        phone: None,
    }
}

#[tokio::test]
async fn registration_creates_user_with_initial_role_and_sends_welcome() -> anyhow::Result<()> {
    let app = test_app();

    let user = user_service::register_user(&app.state, registration(" Ada@Example.com ", "s3cretpass"))
        .await?
        .data
        .unwrap();
    assert_eq!(user.email, "ada@example.com");
    assert!(
        app.identity
            .assigned_roles()
            .contains(&(user.id, INITIAL_ROLE.to_string()))
    );

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ada@example.com");
    assert_eq!(sent[0].template, "welcome");

    let fetched = user_service::get_user(&app.state, user.id).await?.data.unwrap();
    assert_eq!(fetched, user);
    Ok(())
}

#[tokio::test]
async fn registration_validates_before_calling_identity() {
    let app = test_app();

    for payload in [
        registration("not-an-email", "s3cretpass"),
        registration("ada@example.com", "short"),
        RegisterUserRequest {
            first_name: " ".into(),
            ..registration("ada@example.com", "s3cretpass")
        },
    ] {
        let result = user_service::register_user(&app.state, payload).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
    assert!(app.identity.assigned_roles().is_empty());
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn downstream_errors_keep_status_and_message() -> anyhow::Result<()> {
    let app = test_app();
    user_service::register_user(&app.state, registration("ada@example.com", "s3cretpass")).await?;

    let result =
        user_service::register_user(&app.state, registration("ada@example.com", "s3cretpass"))
            .await;
    match result {
        Err(AppError::Upstream { status, message }) => {
            assert_eq!(status, StatusCode::CONFLICT);
            assert_eq!(message, "email already registered");
        }
        other => panic!("expected upstream conflict, got {other:?}"),
    }

    let result = user_service::get_user(&app.state, Uuid::new_v4()).await;
    assert!(matches!(
        result,
        Err(AppError::Upstream { status: StatusCode::NOT_FOUND, .. })
    ));

    app.identity.fail_with(422, "unprocessable");
    let result = user_service::get_user(&app.state, Uuid::new_v4()).await;
    assert!(matches!(
        result,
        Err(AppError::Upstream { status: StatusCode::BAD_REQUEST, .. })
    ));

    app.identity.fail_with(502, "bad gateway");
    let result = user_service::get_user(&app.state, Uuid::new_v4()).await;
    assert!(matches!(
        result,
        Err(AppError::Upstream { status: StatusCode::INTERNAL_SERVER_ERROR, .. })
    ));
    Ok(())
}

#[tokio::test]
async fn profile_image_is_forwarded_and_url_returned() -> anyhow::Result<()> {
    let app = test_app();
    let user = auth(Uuid::new_v4());
    app.identity.insert_user(User {
        id: user.user_id,
        email: "grace@example.com".into(),
        first_name: "Grace".into(),
        last_name: "Hopper".into(),
        phone: None,
        profile_image_url: None,
        created_at: None,
    });

    let image = ProfileImage {
        file_name: "me.png".into(),
        content_type: "image/png".into(),
        bytes: vec![1, 2, 3],
    };
    let resp = profile_image_service::upload_profile_image(&app.state, &user, image.clone())
        .await?
        .data
        .unwrap();
    assert_eq!(resp.url, format!("https://images.test/{}/me.png", user.user_id));
    assert_eq!(app.identity.uploads(), vec![(user.user_id, image)]);

    let fetched = user_service::get_user(&app.state, user.user_id).await?.data.unwrap();
    assert_eq!(fetched.profile_image_url, Some(resp.url));
    Ok(())
}

#[tokio::test]
async fn oversized_or_unsupported_images_never_reach_identity() {
    let app = test_app();
    let user = auth(Uuid::new_v4());
    let limit = app.state.config.profile_image_max_bytes;

    for (content_type, len) in [("image/png", limit + 1), ("image/gif", 10), ("image/webp", 0)] {
        let image = ProfileImage {
            file_name: "me".into(),
            content_type: content_type.into(),
            bytes: vec![0; len],
        };
        let result = profile_image_service::upload_profile_image(&app.state, &user, image).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
    assert!(app.identity.uploads().is_empty());
}

#[tokio::test]
async fn timezones_list_active_or_all_by_name() -> anyhow::Result<()> {
    let app = test_app();
    app.timezone("Europe/Berlin", true).await;
    app.timezone("Asia/Jakarta", true).await;
    app.timezone("Pacific/Retired", false).await;

    let active = timezone_service::list_timezones(&app.state, true)
        .await?
        .data
        .unwrap();
    let names: Vec<_> = active.iter().map(|tz| tz.name.as_str()).collect();
    assert_eq!(names, vec!["Asia/Jakarta", "Europe/Berlin"]);

    let all = timezone_service::list_timezones(&app.state, false)
        .await?
        .data
        .unwrap();
    assert_eq!(all.len(), 3);
    Ok(())
}
