use serde_json::json;

use crate::common::{TestApp, TestUser, routes};

struct Scenario {
    app: TestApp,
    owner: TestUser,
    editor: TestUser,
    blog_id: i32,
}

/// Owner has published blog {title: "A", content: "x"}; editor is another user.
async fn scenario() -> Scenario {
    let app = TestApp::spawn().await;
    let owner = app.create_user("owner").await;
    let editor = app.create_user("editor").await;
    let blog_id = app.create_published_blog(&owner.token).await;
    Scenario {
        app,
        owner,
        editor,
        blog_id,
    }
}

mod propose {
    use super::*;

    #[tokio::test]
    async fn creates_pending_suggestion_without_touching_the_blog() {
        let s = scenario().await;

        let res = s
            .app
            .post_with_token(
                routes::SUGGESTIONS,
                &json!({"blog_id": s.blog_id, "title": "B", "content": "y"}),
                &s.editor.token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["status"], "pending");
        assert_eq!(res.body["original_title"], "A");
        assert_eq!(res.body["suggested_title"], "B");
        assert_eq!(res.body["proposer_id"], s.editor.id);
        assert!(res.body["decided_at"].is_null());

        let blog = s.app.get_without_token(&routes::blog(s.blog_id)).await;
        assert_eq!(blog.body["title"], "A");
        assert_eq!(blog.body["content"], "x");
    }

    #[tokio::test]
    async fn owner_cannot_suggest_on_own_blog() {
        let s = scenario().await;

        let res = s
            .app
            .post_with_token(
                routes::SUGGESTIONS,
                &json!({"blog_id": s.blog_id, "title": "B", "content": "y"}),
                &s.owner.token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "INVALID_OPERATION");
    }

    #[tokio::test]
    async fn empty_content_is_rejected() {
        let s = scenario().await;

        let res = s
            .app
            .post_with_token(
                routes::SUGGESTIONS,
                &json!({"blog_id": s.blog_id, "title": "B", "content": ""}),
                &s.editor.token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_blog_is_not_found() {
        let s = scenario().await;

        let res = s
            .app
            .post_with_token(
                routes::SUGGESTIONS,
                &json!({"blog_id": 999, "title": "B", "content": "y"}),
                &s.editor.token,
            )
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn owner_is_emailed() {
        let s = scenario().await;

        s.app.propose(s.blog_id, &s.editor.token).await;

        let emails = s.app.emails_to("owner@example.com");
        let last = emails.last().unwrap();
        assert!(last.subject.contains("\"A\""));
        assert!(last.body.contains("editor Example"));
    }
}

mod decide {
    use super::*;

    #[tokio::test]
    async fn accept_merges_the_suggestion_into_the_blog() {
        let s = scenario().await;
        let id = s.app.propose(s.blog_id, &s.editor.token).await;

        let res = s
            .app
            .put_with_token(
                &routes::suggestion(id),
                &json!({"status": "accepted", "comment": "Nice"}),
                &s.owner.token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], "accepted");
        assert_eq!(res.body["review_comment"], "Nice");
        assert!(res.body["decided_at"].is_string());

        let blog = s.app.get_without_token(&routes::blog(s.blog_id)).await;
        assert_eq!(blog.body["title"], "B");
        assert_eq!(blog.body["content"], "y");
    }

    #[tokio::test]
    async fn reject_leaves_the_blog_unchanged() {
        let s = scenario().await;
        let id = s.app.propose(s.blog_id, &s.editor.token).await;

        let res = s
            .app
            .put_with_token(
                &routes::suggestion(id),
                &json!({"status": "rejected"}),
                &s.owner.token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], "rejected");

        let blog = s.app.get_without_token(&routes::blog(s.blog_id)).await;
        assert_eq!(blog.body["title"], "A");
        assert_eq!(blog.body["content"], "x");
    }

    #[tokio::test]
    async fn a_decided_suggestion_cannot_be_decided_again() {
        let s = scenario().await;
        let id = s.app.propose(s.blog_id, &s.editor.token).await;
        s.app
            .put_with_token(
                &routes::suggestion(id),
                &json!({"status": "rejected"}),
                &s.owner.token,
            )
            .await;

        let res = s
            .app
            .put_with_token(
                &routes::suggestion(id),
                &json!({"status": "accepted"}),
                &s.owner.token,
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
        let blog = s.app.get_without_token(&routes::blog(s.blog_id)).await;
        assert_eq!(blog.body["title"], "A");
    }

    #[tokio::test]
    async fn only_the_blog_author_can_decide() {
        let s = scenario().await;
        let id = s.app.propose(s.blog_id, &s.editor.token).await;

        let res = s
            .app
            .put_with_token(
                &routes::suggestion(id),
                &json!({"status": "accepted"}),
                &s.editor.token,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn unknown_decision_is_a_validation_error() {
        let s = scenario().await;
        let id = s.app.propose(s.blog_id, &s.editor.token).await;

        let res = s
            .app
            .put_with_token(
                &routes::suggestion(id),
                &json!({"status": "pending"}),
                &s.owner.token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn missing_suggestion_is_not_found() {
        let s = scenario().await;

        let res = s
            .app
            .put_with_token(
                &routes::suggestion(999),
                &json!({"status": "accepted"}),
                &s.owner.token,
            )
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn simultaneous_accept_and_reject_have_one_winner() {
        let s = scenario().await;
        let id = s.app.propose(s.blog_id, &s.editor.token).await;
        let path = routes::suggestion(id);

        let accepted_body = json!({"status": "accepted"});
        let rejected_body = json!({"status": "rejected"});
        let (accept, reject) = tokio::join!(
            s.app.put_with_token(&path, &accepted_body, &s.owner.token),
            s.app.put_with_token(&path, &rejected_body, &s.owner.token),
        );

        let mut statuses = [accept.status, reject.status];
        statuses.sort();
        assert_eq!(statuses, [200, 409]);

        let blog = s.app.get_without_token(&routes::blog(s.blog_id)).await;
        let expected_title = if accept.status == 200 { "B" } else { "A" };
        assert_eq!(blog.body["title"], expected_title);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn pending_edits_show_blog_title_and_proposer_name() {
        let s = scenario().await;
        let first = s.app.propose(s.blog_id, &s.editor.token).await;
        let second = s.app.propose(s.blog_id, &s.editor.token).await;
        s.app
            .put_with_token(
                &routes::suggestion(first),
                &json!({"status": "rejected"}),
                &s.owner.token,
            )
            .await;

        let res = s.app.get_with_token(routes::PENDING_EDITS, &s.owner.token).await;

        assert_eq!(res.status, 200);
        let items = res.body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["proposal"]["id"], second);
        assert_eq!(items[0]["blog_title"], "A");
        assert_eq!(items[0]["proposer_name"], "editor Example");

        let editor_view = s
            .app
            .get_with_token(routes::PENDING_EDITS, &s.editor.token)
            .await;
        assert_eq!(editor_view.body.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn history_and_my_suggestions_are_newest_first() {
        let s = scenario().await;
        let first = s.app.propose(s.blog_id, &s.editor.token).await;
        let second = s.app.propose(s.blog_id, &s.editor.token).await;

        let history = s
            .app
            .get_with_token(&routes::blog_suggestions(s.blog_id), &s.owner.token)
            .await;
        assert_eq!(history.status, 200);
        let ids: Vec<_> = history
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_i64().unwrap() as i32)
            .collect();
        assert_eq!(ids, [second, first]);

        let mine = s
            .app
            .get_with_token(routes::MY_SUGGESTIONS, &s.editor.token)
            .await;
        assert_eq!(mine.body.as_array().unwrap().len(), 2);

        let denied = s
            .app
            .get_with_token(&routes::blog_suggestions(s.blog_id), &s.editor.token)
            .await;
        assert_eq!(denied.status, 403);
    }

    #[tokio::test]
    async fn strangers_cannot_read_a_suggestion() {
        let s = scenario().await;
        let stranger = s.app.create_user("stranger").await;
        let id = s.app.propose(s.blog_id, &s.editor.token).await;

        let res = s.app.get_with_token(&routes::suggestion(id), &stranger.token).await;
        assert_eq!(res.status, 404);

        let res = s.app.get_with_token(&routes::suggestion(id), &s.owner.token).await;
        assert_eq!(res.status, 200);
    }
}
