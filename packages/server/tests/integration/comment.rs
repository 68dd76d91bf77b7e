use serde_json::json;

use crate::common::{TestApp, routes};

mod create {
    use super::*;

    #[tokio::test]
    async fn readers_can_comment_on_published_blogs() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let bob = app.create_user("bob").await;
        let blog_id = app.create_published_blog(&alice.token).await;

        let res = app
            .post_with_token(
                routes::COMMENTS,
                &json!({"blog_id": blog_id, "content": "Great read"}),
                &bob.token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["author_id"], bob.id);

        let list = app.get_without_token(&routes::comments_for(blog_id)).await;
        assert_eq!(list.status, 200);
        assert_eq!(list.body[0]["content"], "Great read");

        let one = app.get_without_token(&routes::comment(res.id())).await;
        assert_eq!(one.status, 200);
    }

    #[tokio::test]
    async fn commenting_on_a_draft_is_denied() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let blog_id = app.create_blog(&alice.token, "draft").await;

        let res = app
            .post_with_token(
                routes::COMMENTS,
                &json!({"blog_id": blog_id, "content": "early bird"}),
                &alice.token,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn anonymous_cannot_comment() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let blog_id = app.create_published_blog(&alice.token).await;

        let res = app
            .post_without_token(routes::COMMENTS, &json!({"blog_id": blog_id, "content": "hi"}))
            .await;

        assert_eq!(res.status, 401);
    }
}

mod moderate {
    use super::*;

    #[tokio::test]
    async fn only_comment_author_or_blog_author_may_edit_or_delete() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let bob = app.create_user("bob").await;
        let carol = app.create_user("carol").await;
        let blog_id = app.create_published_blog(&alice.token).await;
        let comment_id = app
            .post_with_token(
                routes::COMMENTS,
                &json!({"blog_id": blog_id, "content": "first"}),
                &bob.token,
            )
            .await
            .id();

        let res = app
            .put_with_token(
                &routes::comment(comment_id),
                &json!({"content": "hijack"}),
                &carol.token,
            )
            .await;
        assert_eq!(res.status, 403);

        let res = app
            .put_with_token(
                &routes::comment(comment_id),
                &json!({"content": "edited"}),
                &bob.token,
            )
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["content"], "edited");

        let res = app
            .delete_with_token(&routes::comment(comment_id), &carol.token)
            .await;
        assert_eq!(res.status, 403);

        let res = app
            .delete_with_token(&routes::comment(comment_id), &alice.token)
            .await;
        assert_eq!(res.status, 204);
        assert_eq!(
            app.get_without_token(&routes::comment(comment_id)).await.status,
            404
        );
    }
}
