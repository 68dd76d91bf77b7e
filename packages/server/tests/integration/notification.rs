use serde_json::json;

use crate::common::{TestApp, routes};

mod delivery {
    use super::*;

    #[tokio::test]
    async fn proposal_notifies_owner_and_decision_notifies_proposer() {
        let app = TestApp::spawn().await;
        let owner = app.create_user("owner").await;
        let editor = app.create_user("editor").await;
        let blog_id = app.create_published_blog(&owner.token).await;

        let proposal_id = app.propose(blog_id, &editor.token).await;

        let inbox = app.get_with_token(routes::NOTIFICATIONS, &owner.token).await;
        let items = inbox.body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["type"], "edit_proposed");
        assert_eq!(items[0]["related_id"], proposal_id);
        assert_eq!(items[0]["is_read"], false);

        app.put_with_token(
            &routes::suggestion(proposal_id),
            &json!({"status": "accepted"}),
            &owner.token,
        )
        .await;

        let inbox = app.get_with_token(routes::NOTIFICATIONS, &editor.token).await;
        let items = inbox.body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["type"], "edit_accepted");
        assert_eq!(items[0]["related_id"], blog_id);

        // Deciding does not add anything to the owner's inbox.
        let owner_inbox = app.get_with_token(routes::NOTIFICATIONS, &owner.token).await;
        assert_eq!(owner_inbox.body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejection_notification_has_its_own_type() {
        let app = TestApp::spawn().await;
        let owner = app.create_user("owner").await;
        let editor = app.create_user("editor").await;
        let blog_id = app.create_published_blog(&owner.token).await;
        let proposal_id = app.propose(blog_id, &editor.token).await;

        app.put_with_token(
            &routes::suggestion(proposal_id),
            &json!({"status": "rejected"}),
            &owner.token,
        )
        .await;

        let inbox = app.get_with_token(routes::NOTIFICATIONS, &editor.token).await;
        assert_eq!(inbox.body[0]["type"], "edit_rejected");
    }
}

mod read_state {
    use super::*;

    #[tokio::test]
    async fn mark_read_is_idempotent_and_updates_the_count() {
        let app = TestApp::spawn().await;
        let owner = app.create_user("owner").await;
        let editor = app.create_user("editor").await;
        let blog_id = app.create_published_blog(&owner.token).await;
        app.propose(blog_id, &editor.token).await;
        app.propose(blog_id, &editor.token).await;

        let count = app.get_with_token(routes::NOTIFICATION_COUNT, &owner.token).await;
        assert_eq!(count.body["count"], 2);

        let inbox = app.get_with_token(routes::NOTIFICATIONS, &owner.token).await;
        let id = inbox.body[0]["id"].as_i64().unwrap() as i32;
        for _ in 0..2 {
            let res = app
                .post_with_token(&routes::notification_read(id), &json!({}), &owner.token)
                .await;
            assert_eq!(res.status, 200, "{}", res.text);
            assert_eq!(res.body["is_read"], true);
        }

        let count = app.get_with_token(routes::NOTIFICATION_COUNT, &owner.token).await;
        assert_eq!(count.body["count"], 1);

        let res = app
            .post_with_token(routes::NOTIFICATIONS_READ_ALL, &json!({}), &owner.token)
            .await;
        assert_eq!(res.body["updated"], 1);
        let count = app.get_with_token(routes::NOTIFICATION_COUNT, &owner.token).await;
        assert_eq!(count.body["count"], 0);
    }

    #[tokio::test]
    async fn cannot_mark_someone_elses_notification() {
        let app = TestApp::spawn().await;
        let owner = app.create_user("owner").await;
        let editor = app.create_user("editor").await;
        let blog_id = app.create_published_blog(&owner.token).await;
        app.propose(blog_id, &editor.token).await;
        let inbox = app.get_with_token(routes::NOTIFICATIONS, &owner.token).await;
        let id = inbox.body[0]["id"].as_i64().unwrap() as i32;

        let res = app
            .post_with_token(&routes::notification_read(id), &json!({}), &editor.token)
            .await;

        assert_eq!(res.status, 404);
        let count = app.get_with_token(routes::NOTIFICATION_COUNT, &owner.token).await;
        assert_eq!(count.body["count"], 1);
    }

    #[tokio::test]
    async fn notifications_require_authentication() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::NOTIFICATIONS).await;

        assert_eq!(res.status, 401);
    }
}
