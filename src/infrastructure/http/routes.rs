//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                      GET   健康检查
//! - /api/poll/list                 GET   投票列表（?active_only=true 仅启用的）
//! - /api/poll/get                  POST  投票详情
//! - /api/poll/results              POST  投票结果
//! - /api/vote/cast                 POST  投票
//! - /api/vote/status               POST  查询是否已投票
//! - /api/comment/list              POST  评论列表
//! - /api/comment/post              POST  发表评论
//! - /api/comment/react             POST  点赞 / 点踩
//! - /api/admin/poll/create         POST  创建投票
//! - /api/admin/poll/update         POST  修改投票
//! - /api/admin/poll/set_active     POST  启用 / 停用
//! - /api/admin/poll/add_option     POST  追加选项
//! - /api/admin/poll/delete         POST  删除投票
//! - /api/admin/poll/recount        POST  重新计票
//! - /api/admin/comment/delete      POST  删除评论

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::middleware::require_admin;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes(state))
}

/// API 路由
fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/poll", poll_routes())
        .nest("/vote", vote_routes())
        .nest("/comment", comment_routes())
        .nest("/admin", admin_routes(state))
}

/// Poll 路由
fn poll_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/list", get(handlers::list_polls))
        .route("/get", post(handlers::get_poll))
        .route("/results", post(handlers::get_results))
}

/// Vote 路由
fn vote_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cast", post(handlers::cast_vote))
        .route("/status", post(handlers::vote_status))
}

/// Comment 路由
fn comment_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/list", post(handlers::list_comments))
        .route("/post", post(handlers::post_comment))
        .route("/react", post(handlers::react))
}

/// Admin 路由（需要 Bearer 令牌）
fn admin_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/poll/create", post(handlers::create_poll))
        .route("/poll/update", post(handlers::update_poll))
        .route("/poll/set_active", post(handlers::set_active))
        .route("/poll/add_option", post(handlers::add_option))
        .route("/poll/delete", post(handlers::delete_poll))
        .route("/poll/recount", post(handlers::recount))
        .route("/comment/delete", post(handlers::delete_comment))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use crate::domain::ballot::DedupPolicy;
    use crate::infrastructure::http::state::AccessSettings;
    use crate::infrastructure::persistence::sqlite::{
        memory_pool, SqliteCommentRepository, SqlitePollRepository, SqliteVoteRepository,
    };

    const TOKEN: &str = "test-admin-token";

    async fn app(access: AccessSettings) -> Router {
        let pool = memory_pool().await;
        let state = Arc::new(AppState::new(
            Arc::new(SqlitePollRepository::new(pool.clone())),
            Arc::new(SqliteVoteRepository::new(pool.clone())),
            Arc::new(SqliteCommentRepository::new(pool)),
            access,
        ));
        create_routes(state.clone()).with_state(state)
    }

    fn admin_access() -> AccessSettings {
        AccessSettings {
            admin_token: Some(TOKEN.to_string()),
            ..Default::default()
        }
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn admin_post(uri: &str, body: Value) -> Request<Body> {
        let mut request = post(uri, body);
        request.headers_mut().insert(
            "authorization",
            format!("Bearer {}", TOKEN).parse().unwrap(),
        );
        request
    }

    async fn create_poll(app: &Router) -> Value {
        let (status, body) = call(
            app,
            admin_post(
                "/api/admin/poll/create",
                json!({
                    "title": "班长选举",
                    "kind": "election",
                    "options": [
                        {"label": "张三", "description": "三年班委"},
                        {"label": "李四", "image_url": "https://example.com/li.png"},
                    ]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["data"].clone()
    }

    #[tokio::test]
    async fn test_ping() {
        let app = app(AccessSettings::default()).await;
        let request = Request::builder()
            .uri("/api/ping")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn test_vote_flow() {
        let app = app(admin_access()).await;
        let poll = create_poll(&app).await;
        let poll_id = poll["id"].as_str().unwrap().to_string();
        let option_id = poll["options"][1]["id"].as_str().unwrap().to_string();
        assert_eq!(poll["kind"], "election");
        assert_eq!(poll["phase"], "open");

        let (status, body) = call(
            &app,
            post(
                "/api/vote/cast",
                json!({"poll_id": poll_id, "option_id": option_id, "fingerprint": "browser-fp-0001"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["data"]["results"]["total_votes"], 1);
        assert_eq!(body["data"]["results"]["leaders"][0], option_id.as_str());

        // 同一指纹 + 同一地址再次投票
        let (status, body) = call(
            &app,
            post(
                "/api/vote/cast",
                json!({"poll_id": poll_id, "option_id": option_id, "fingerprint": "browser-fp-0001"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["errno"], 409);

        let (_, body) = call(
            &app,
            post(
                "/api/vote/status",
                json!({"poll_id": poll_id, "fingerprint": "browser-fp-0001"}),
            ),
        )
        .await;
        assert_eq!(body["data"]["has_voted"], true);
        assert_eq!(body["data"]["option_id"], option_id.as_str());

        let (_, body) = call(&app, post("/api/poll/results", json!({"id": poll_id}))).await;
        assert_eq!(body["data"]["results"][1]["votes"], 1);
        assert_eq!(body["data"]["results"][1]["percentage"], 100.0);
        assert_eq!(body["data"]["results"][0]["percentage"], 0.0);
    }

    #[tokio::test]
    async fn test_inactive_poll_rejects_votes() {
        let app = app(admin_access()).await;
        let poll = create_poll(&app).await;
        let poll_id = poll["id"].as_str().unwrap();

        let (status, body) = call(
            &app,
            admin_post(
                "/api/admin/poll/set_active",
                json!({"id": poll_id, "active": false}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["phase"], "inactive");

        let (status, _) = call(
            &app,
            post(
                "/api/vote/cast",
                json!({
                    "poll_id": poll_id,
                    "option_id": poll["options"][0]["id"],
                    "fingerprint": "browser-fp-0001"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let request = Request::builder()
            .uri("/api/poll/list?active_only=true")
            .body(Body::empty())
            .unwrap();
        let (_, body) = call(&app, request).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_proxy_headers_with_or_policy() {
        let app = app(AccessSettings {
            dedup_policy: DedupPolicy::FingerprintOrIp,
            admin_token: Some(TOKEN.to_string()),
            trust_proxy_headers: true,
        })
        .await;
        let poll = create_poll(&app).await;

        let vote = |fingerprint: &str, ip: &str| {
            let mut request = post(
                "/api/vote/cast",
                json!({
                    "poll_id": poll["id"],
                    "option_id": poll["options"][0]["id"],
                    "fingerprint": fingerprint
                }),
            );
            request
                .headers_mut()
                .insert("x-forwarded-for", ip.parse().unwrap());
            request
        };

        let (status, _) = call(&app, vote("browser-fp-0001", "203.0.113.1")).await;
        assert_eq!(status, StatusCode::OK);

        // 换指纹但地址相同
        let (status, _) = call(&app, vote("browser-fp-0002", "203.0.113.1")).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = call(&app, vote("browser-fp-0003", "203.0.113.2")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_comment_flow() {
        let app = app(admin_access()).await;
        let poll = create_poll(&app).await;

        let (status, body) = call(
            &app,
            post(
                "/api/comment/post",
                json!({
                    "poll_id": poll["id"],
                    "content": "支持李四",
                    "components": {"userAgent": "test", "screen": "1920x1080"}
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["data"]["author"], "Anonymous");
        assert!(body["data"].get("fingerprint").is_none());
        let comment_id = body["data"]["id"].clone();

        let react = json!({
            "comment_id": comment_id,
            "reaction": "like",
            "fingerprint": "browser-fp-0009"
        });
        let (_, body) = call(&app, post("/api/comment/react", react.clone())).await;
        assert_eq!(body["data"]["likes"], 1);
        let (status, _) = call(&app, post("/api/comment/react", react)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = call(
            &app,
            admin_post("/api/admin/comment/delete", json!({"id": comment_id})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = call(
            &app,
            post("/api/comment/list", json!({"poll_id": poll["id"]})),
        )
        .await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_admin_routes_require_token() {
        let app = app(admin_access()).await;
        let (status, body) = call(
            &app,
            post(
                "/api/admin/poll/create",
                json!({"title": "x", "options": []}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["errno"], 401);

        let disabled = self::app(AccessSettings::default()).await;
        let (status, _) = call(
            &disabled,
            admin_post("/api/admin/poll/delete", json!({"id": uuid::Uuid::new_v4()})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_poll_is_not_found() {
        let app = app(admin_access()).await;
        let (status, body) = call(
            &app,
            post("/api/poll/get", json!({"id": uuid::Uuid::new_v4()})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errno"], 404);
    }

    #[tokio::test]
    async fn test_malformed_body_uses_envelope() {
        let app = app(AccessSettings::default()).await;
        let (status, body) = call(
            &app,
            post(
                "/api/vote/cast",
                json!({
                    "poll_id": "not-a-uuid",
                    "option_id": uuid::Uuid::new_v4(),
                    "fingerprint": "fingerprint-a",
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errno"], 400);
        assert!(body["data"].is_null());

        let (status, body) = call(&app, post("/api/comment/post", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errno"], 400);

        let request = Request::builder()
            .uri("/api/poll/list?active_only=maybe")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errno"], 400);
    }
}
