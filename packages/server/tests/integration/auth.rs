use serde_json::json;

use crate::common::{TestApp, routes, test_config, token_from_link};

fn alice() -> serde_json::Value {
    json!({
        "username": "alice",
        "email": "Alice@Example.com",
        "full_name": "Alice Wonder",
        "password": "securepass",
    })
}

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_user_can_register_with_valid_details() {
        let app = TestApp::spawn().await;

        let res = app.post_without_token(routes::REGISTER, &alice()).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["email"], "alice@example.com");
        assert_eq!(res.body["is_verified"], false);
        assert!(res.body.get("password").is_none());
    }

    #[tokio::test]
    async fn registration_sends_a_verification_email() {
        let app = TestApp::spawn().await;

        app.post_without_token(routes::REGISTER, &alice()).await;

        let emails = app.emails_to("alice@example.com");
        assert_eq!(emails.len(), 1);
        assert!(emails[0].body.contains("http://blogcollab.test/verify-email/"));
    }

    #[tokio::test]
    async fn cannot_register_with_an_already_taken_username() {
        let app = TestApp::spawn().await;
        app.post_without_token(routes::REGISTER, &alice()).await;

        let mut body = alice();
        body["email"] = json!("other@example.com");
        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "USERNAME_TAKEN");
    }

    #[tokio::test]
    async fn cannot_register_with_an_already_registered_email() {
        let app = TestApp::spawn().await;
        app.post_without_token(routes::REGISTER, &alice()).await;

        let mut body = alice();
        body["username"] = json!("alice2");
        body["email"] = json!("ALICE@example.com");
        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "EMAIL_TAKEN");
    }

    #[tokio::test]
    async fn cannot_register_with_a_password_that_is_too_short() {
        let app = TestApp::spawn().await;
        let mut body = alice();
        body["password"] = json!("short");

        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::REGISTER, &json!({"username": "alice"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn registered_user_can_log_in_with_any_email_case() {
        let app = TestApp::spawn().await;
        app.post_without_token(routes::REGISTER, &alice()).await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "ALICE@example.COM", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(res.body["user"]["username"], "alice");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;
        app.post_without_token(routes::REGISTER, &alice()).await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "alice@example.com", "password": "wrongpass"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_email_is_rejected_the_same_way() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "ghost@example.com", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unverified_user_cannot_log_in_until_verified() {
        let app = TestApp::spawn_with(test_config(true)).await;
        app.post_without_token(routes::REGISTER, &alice()).await;
        let creds = json!({"email": "alice@example.com", "password": "securepass"});

        let res = app.post_without_token(routes::LOGIN, &creds).await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "EMAIL_NOT_VERIFIED");

        let token = token_from_link(&app.emails_to("alice@example.com")[0]);
        let res = app.get_without_token(&routes::verify_email(&token)).await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app.post_without_token(routes::LOGIN, &creds).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["user"]["is_verified"], true);
    }

    #[tokio::test]
    async fn verification_token_works_once() {
        let app = TestApp::spawn().await;
        app.post_without_token(routes::REGISTER, &alice()).await;
        let token = token_from_link(&app.emails_to("alice@example.com")[0]);

        let first = app.get_without_token(&routes::verify_email(&token)).await;
        assert_eq!(first.status, 200);
        let second = app.get_without_token(&routes::verify_email(&token)).await;
        assert_eq!(second.status, 400);
        assert_eq!(second.body["code"], "VALIDATION_ERROR");
    }
}

mod me {
    use super::*;

    #[tokio::test]
    async fn returns_the_current_user() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;

        let res = app.get_with_token(routes::ME, &alice.token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], alice.id);
        assert_eq!(res.body["full_name"], "alice Example");
    }

    #[tokio::test]
    async fn requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn rejects_a_garbage_token() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not-a-jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}

mod password_reset {
    use super::*;

    #[tokio::test]
    async fn forgot_password_does_not_reveal_unknown_emails() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::FORGOT_PASSWORD,
                &json!({"email": "ghost@example.com"}),
            )
            .await;

        assert_eq!(res.status, 200);
        assert!(app.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn reset_token_changes_the_password_once() {
        let app = TestApp::spawn().await;
        app.create_user("alice").await;

        let res = app
            .post_without_token(
                routes::FORGOT_PASSWORD,
                &json!({"email": "alice@example.com"}),
            )
            .await;
        assert_eq!(res.status, 200);
        let emails = app.emails_to("alice@example.com");
        let token = token_from_link(emails.last().unwrap());

        let reset = json!({"token": token, "password": "brandnewpass"});
        let res = app.post_without_token(routes::RESET_PASSWORD, &reset).await;
        assert_eq!(res.status, 200, "{}", res.text);

        app.login("alice@example.com", "brandnewpass").await;
        let old = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "alice@example.com", "password": "securepass"}),
            )
            .await;
        assert_eq!(old.status, 401);

        let again = app.post_without_token(routes::RESET_PASSWORD, &reset).await;
        assert_eq!(again.status, 400);
    }
}
