//! Post handlers - listing, single view, create, edit, delete.

use actix_web::{HttpResponse, web};

use blog_core::domain::{Post, PostColumn, PostId};
use blog_shared::dto::{
    PageQuery, PostLinks, PostListResponse, PostRequest, PostResponse, PostView,
};

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::session::{LoggedIn, RequestSession};
use crate::state::AppState;

fn post_response(post: Post) -> AppResult<PostResponse> {
    let id = post
        .id
        .ok_or_else(|| AppError::Internal("stored post without id".to_string()))?;

    Ok(PostResponse {
        id,
        title: post.title,
        content: post.content,
        published_at: post.published_at,
    })
}

async fn find_post(state: &AppState, id: PostId, columns: &[PostColumn]) -> AppResult<Post> {
    state
        .posts
        .get_post_by_id(id, columns)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post with id {} not found", id)))
}

/// GET /api/posts?page=N
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = query.page.unwrap_or(1);
    let listing = state.posts.list(page, state.posts_per_page).await?;

    let posts = listing
        .posts
        .into_iter()
        .map(post_response)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        posts,
        page: listing.paginator.page,
        total: listing.total,
        total_pages: listing.paginator.total_pages,
        previous: listing.paginator.previous,
        next: listing.paginator.next,
    }))
}

/// GET /api/posts/{id} - edit/delete links only for logged-in sessions.
pub async fn show(
    state: web::Data<AppState>,
    session: RequestSession,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = find_post(&state, id, PostColumn::ALL).await?;

    let links = session.is_logged_in().then(|| PostLinks::for_post(id));

    Ok(HttpResponse::Ok().json(PostView {
        post: post_response(post)?,
        links,
    }))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    _session: LoggedIn,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let mut post = Post::new(req.title, req.content, req.published_at.unwrap_or_default());

    state.posts.create(&mut post).await?;

    Ok(HttpResponse::Created().json(post_response(post)?))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    _session: LoggedIn,
    path: web::Path<PostId>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let mut post = find_post(&state, path.into_inner(), PostColumn::ALL).await?;

    post.title = req.title;
    post.content = req.content;
    post.published_at = req.published_at.filter(|s| !s.is_empty());

    state.posts.update(&mut post).await?;

    Ok(HttpResponse::Ok().json(post_response(post)?))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    _session: LoggedIn,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner(), &[PostColumn::Id]).await?;

    state.posts.delete(&post).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    use blog_core::domain::Session;
    use blog_core::ports::SessionTokenService;
    use blog_infra::{InMemoryPostRepository, JwtConfig, JwtSessionTokenService};

    use super::*;
    use crate::handlers::configure_routes;

    fn tokens() -> Arc<JwtSessionTokenService> {
        Arc::new(JwtSessionTokenService::new(JwtConfig {
            secret: "handler-test-secret".to_string(),
            ..JwtConfig::default()
        }))
    }

    fn state(tokens: Arc<JwtSessionTokenService>) -> AppState {
        AppState::from_parts(Arc::new(InMemoryPostRepository::new()), tokens, 2)
    }

    fn bearer(tokens: &JwtSessionTokenService, session: &Session) -> (&'static str, String) {
        let token = tokens.issue("editor", session).unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    #[actix_web::test]
    async fn test_create_requires_logged_in_session() {
        let tokens = tokens();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(tokens.clone())))
                .configure(configure_routes),
        )
        .await;

        let anonymous = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({"title": "A", "content": "B"}))
            .to_request();
        let resp = test::call_service(&app, anonymous).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let logged_out = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&tokens, &Session::new()))
            .set_json(json!({"title": "A", "content": "B"}))
            .to_request();
        let resp = test::call_service(&app, logged_out).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_create_reports_validation_errors() {
        let tokens = tokens();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(tokens.clone())))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&tokens, &Session::logged_in()))
            .set_json(json!({"title": "", "content": "", "published_at": "2024-13-40 99:99:99"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["errors"],
            json!([
                "Title is required",
                "Content is required",
                "Invalid date and time"
            ])
        );
    }

    #[actix_web::test]
    async fn test_show_offers_links_only_when_logged_in() {
        let tokens = tokens();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(tokens.clone())))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&tokens, &Session::logged_in()))
            .set_json(json!({"title": "Hello", "content": "World", "published_at": ""}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: PostResponse = test::read_body_json(resp).await;
        assert_eq!(created.published_at, None);

        let uri = format!("/api/posts/{}", created.id);

        let req = test::TestRequest::get().uri(&uri).to_request();
        let view: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(view["post"]["title"], "Hello");
        assert!(view.get("links").is_none());

        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(&tokens, &Session::logged_in()))
            .to_request();
        let view: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(view["links"]["edit"], uri.as_str());
        assert_eq!(view["links"]["delete"], uri.as_str());
    }

    #[actix_web::test]
    async fn test_missing_post_is_404() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(tokens())))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/posts/41").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_list_with_out_of_range_page_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(tokens())))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts?page={}", i64::MAX))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_list_update_and_delete() {
        let tokens = tokens();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(tokens.clone())))
                .configure(configure_routes),
        )
        .await;

        for (title, date) in [
            ("First", "2024-01-01 10:00:00"),
            ("Second", "2024-02-01 10:00:00"),
            ("Third", "2024-03-01 10:00:00"),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/posts")
                .insert_header(bearer(&tokens, &Session::logged_in()))
                .set_json(json!({"title": title, "content": "Body", "published_at": date}))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get().uri("/api/posts?page=1").to_request();
        let listing: PostListResponse = test::call_and_read_body_json(&app, req).await;
        let titles: Vec<&str> = listing.posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Third", "Second"]);
        assert_eq!(listing.total, 3);
        assert_eq!(listing.next, Some(2));
        assert_eq!(listing.previous, None);

        let oldest = listing.total_pages;
        let req = test::TestRequest::get()
            .uri(&format!("/api/posts?page={oldest}"))
            .to_request();
        let listing: PostListResponse = test::call_and_read_body_json(&app, req).await;
        let first_id = listing.posts[0].id;
        assert_eq!(listing.posts[0].title, "First");

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{first_id}"))
            .insert_header(bearer(&tokens, &Session::logged_in()))
            .set_json(json!({"title": "First (edited)", "content": "Body"}))
            .to_request();
        let updated: PostResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.title, "First (edited)");
        assert_eq!(updated.published_at, None);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{first_id}"))
            .insert_header(bearer(&tokens, &Session::logged_in()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{first_id}"))
            .insert_header(bearer(&tokens, &Session::logged_in()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let listing: PostListResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listing.total, 2);
    }
}
