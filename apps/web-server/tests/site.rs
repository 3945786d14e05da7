//! End-to-end tests of the site against an in-memory SQLite database.

use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};

use quill_core::domain::{PostDraft, Registration, User};
use quill_shared::dto::{CommentForm, LoginForm, PostForm, SignupForm};
use web_server::config::AppConfig;
use web_server::handlers::configure_routes;
use web_server::middleware::error_pages::error_handlers;
use web_server::state::AppState;

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(error_handlers())
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

async fn test_state(config: AppConfig) -> AppState {
    AppState::new(&config)
        .await
        .expect("failed to build test state")
}

async fn create_user(state: &AppState, username: &str) -> User {
    let registration =
        Registration::new(username, "", "", "", "long-enough-pw", "long-enough-pw").unwrap();
    let hash = state.passwords.hash(&registration.password).unwrap();
    state
        .users
        .create(User::new(registration, hash))
        .await
        .unwrap()
}

fn session_for(state: &AppState, user: &User) -> Cookie<'static> {
    let token = state.tokens.generate_token(user.id, &user.username).unwrap();
    Cookie::new("session", token)
}

async fn publish(state: &AppState, author: &User, text: &str) -> i32 {
    state
        .posts
        .create(author.id, PostDraft::new(text, None, None).unwrap())
        .await
        .unwrap()
        .id
}

fn location<B>(resp: &actix_web::dev::ServiceResponse<B>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn count_cards(body: &str) -> usize {
    body.matches("<article class=\"post\">").count()
}

#[actix_web::test]
async fn test_health_reports_database() {
    let state = test_state(AppConfig::for_testing()).await;
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/health/").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[actix_web::test]
async fn test_anonymous_new_post_redirects_to_login() {
    let state = test_state(AppConfig::for_testing()).await;
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/new/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=/new/");
}

#[actix_web::test]
async fn test_login_redirect_keeps_query_string() {
    let state = test_state(AppConfig::for_testing()).await;
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/follow/?page=2").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=/follow/%3Fpage%3D2");
}

#[actix_web::test]
async fn test_create_post_redirects_home() {
    let state = test_state(AppConfig::for_testing()).await;
    let leo = create_user(&state, "leo").await;
    let app = test_app!(state);

    let form = PostForm {
        text: "Happy families are all alike".to_string(),
        ..PostForm::default()
    };
    let req = test::TestRequest::post()
        .uri("/new/")
        .cookie(session_for(&state, &leo))
        .set_form(&form)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert_eq!(state.posts.count_by_author(leo.id).await.unwrap(), 1);
}

#[actix_web::test]
async fn test_blank_post_is_not_saved() {
    let state = test_state(AppConfig::for_testing()).await;
    let leo = create_user(&state, "leo").await;
    let app = test_app!(state);

    let form = PostForm {
        text: "   ".to_string(),
        ..PostForm::default()
    };
    let req = test::TestRequest::post()
        .uri("/new/")
        .cookie(session_for(&state, &leo))
        .set_form(&form)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(state.posts.count_by_author(leo.id).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_unknown_group_is_rejected() {
    let state = test_state(AppConfig::for_testing()).await;
    let leo = create_user(&state, "leo").await;
    let app = test_app!(state);

    let form = PostForm {
        text: "Into a group that does not exist".to_string(),
        group: Some("999".to_string()),
        image: None,
    };
    let req = test::TestRequest::post()
        .uri("/new/")
        .cookie(session_for(&state, &leo))
        .set_form(&form)
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let body = String::from_utf8_lossy(&body);

    assert!(body.contains("Select a valid choice."));
    assert_eq!(state.posts.count_by_author(leo.id).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_anonymous_comment_is_not_saved() {
    let state = test_state(AppConfig::for_testing()).await;
    let leo = create_user(&state, "leo").await;
    let post_id = publish(&state, &leo, "Comment on me").await;
    let app = test_app!(state);

    let form = CommentForm {
        text: "drive-by".to_string(),
    };
    let req = test::TestRequest::post()
        .uri(&format!("/leo/{post_id}/comment/"))
        .set_form(&form)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(location(&resp).starts_with("/auth/login/?next="));
    assert!(state.comments.list_for_post(post_id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_comment_appears_on_post_page() {
    let state = test_state(AppConfig::for_testing()).await;
    let leo = create_user(&state, "leo").await;
    let anna = create_user(&state, "anna").await;
    let post_id = publish(&state, &leo, "Comment on me").await;
    let app = test_app!(state);

    let form = CommentForm {
        text: "All happy families".to_string(),
    };
    let req = test::TestRequest::post()
        .uri(&format!("/leo/{post_id}/comment/"))
        .cookie(session_for(&state, &anna))
        .set_form(&form)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/leo/{post_id}/"));

    let req = test::TestRequest::get()
        .uri(&format!("/leo/{post_id}/"))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let body = String::from_utf8_lossy(&body);

    assert!(body.contains("All happy families"));
    assert!(body.contains("anna"));
}

#[actix_web::test]
async fn test_non_author_cannot_edit() {
    let state = test_state(AppConfig::for_testing()).await;
    let leo = create_user(&state, "leo").await;
    let anna = create_user(&state, "anna").await;
    let post_id = publish(&state, &leo, "Original text").await;
    let app = test_app!(state);

    let form = PostForm {
        text: "Vandalised".to_string(),
        ..PostForm::default()
    };
    let req = test::TestRequest::post()
        .uri(&format!("/leo/{post_id}/edit/"))
        .cookie(session_for(&state, &anna))
        .set_form(&form)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/leo/{post_id}/"));

    let entry = state.posts.find_entry(post_id, "leo").await.unwrap().unwrap();
    assert_eq!(entry.post.text, "Original text");
}

#[actix_web::test]
async fn test_author_edits_post() {
    let state = test_state(AppConfig::for_testing()).await;
    let leo = create_user(&state, "leo").await;
    let post_id = publish(&state, &leo, "First draft").await;
    let app = test_app!(state);

    let form = PostForm {
        text: "Second draft".to_string(),
        ..PostForm::default()
    };
    let req = test::TestRequest::post()
        .uri(&format!("/leo/{post_id}/edit/"))
        .cookie(session_for(&state, &leo))
        .set_form(&form)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    let entry = state.posts.find_entry(post_id, "leo").await.unwrap().unwrap();
    assert_eq!(entry.post.text, "Second draft");
}

#[actix_web::test]
async fn test_post_under_wrong_author_is_not_found() {
    let state = test_state(AppConfig::for_testing()).await;
    let leo = create_user(&state, "leo").await;
    create_user(&state, "anna").await;
    let post_id = publish(&state, &leo, "Mine").await;
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/anna/{post_id}/"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_index_is_cached_until_cleared() {
    let state = test_state(AppConfig::for_testing()).await;
    let leo = create_user(&state, "leo").await;
    publish(&state, &leo, "Before the cache").await;
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/").to_request();
    let first = test::call_and_read_body(&app, req).await;

    publish(&state, &leo, "After the cache").await;

    let req = test::TestRequest::get().uri("/").to_request();
    let second = test::call_and_read_body(&app, req).await;
    assert_eq!(first, second);
    assert!(!String::from_utf8_lossy(&second).contains("After the cache"));

    state.cache.clear().await.unwrap();

    let req = test::TestRequest::get().uri("/").to_request();
    let third = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&third).contains("After the cache"));
}

#[actix_web::test]
async fn test_index_paginates_by_ten() {
    let state = test_state(AppConfig::for_testing()).await;
    let leo = create_user(&state, "leo").await;
    for i in 0..13 {
        publish(&state, &leo, &format!("Post number {i}")).await;
    }
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(count_cards(&String::from_utf8_lossy(&body)), 10);

    let req = test::TestRequest::get().uri("/?page=2").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(count_cards(&String::from_utf8_lossy(&body)), 3);

    let req = test::TestRequest::get().uri("/leo/?page=abc").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(count_cards(&String::from_utf8_lossy(&body)), 10);
}

#[actix_web::test]
async fn test_unknown_path_renders_not_found_page() {
    let state = test_state(AppConfig::for_testing()).await;
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/missing/page/here/")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body = test::read_body(resp).await;
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("Page not found"));
    assert!(body.contains("missing"));
}

#[actix_web::test]
async fn test_follow_and_unfollow() {
    let state = test_state(AppConfig::for_testing()).await;
    let leo = create_user(&state, "leo").await;
    let anna = create_user(&state, "anna").await;
    publish(&state, &leo, "For my followers").await;
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/leo/follow/")
        .cookie(session_for(&state, &anna))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/leo/");
    assert!(state.follows.is_following(anna.id, leo.id).await.unwrap());

    let req = test::TestRequest::get()
        .uri("/follow/")
        .cookie(session_for(&state, &anna))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains("For my followers"));

    let req = test::TestRequest::get()
        .uri("/leo/unfollow/")
        .cookie(session_for(&state, &anna))
        .to_request();
    test::call_service(&app, req).await;
    assert!(!state.follows.is_following(anna.id, leo.id).await.unwrap());
}

#[actix_web::test]
async fn test_self_follow_is_ignored() {
    let state = test_state(AppConfig::for_testing()).await;
    let leo = create_user(&state, "leo").await;
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/leo/follow/")
        .cookie(session_for(&state, &leo))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(state.follows.stats(leo.id).await.unwrap().following, 0);
}

#[actix_web::test]
async fn test_signup_then_login_sets_session() {
    let state = test_state(AppConfig::for_testing()).await;
    let app = test_app!(state);

    let signup = SignupForm {
        first_name: "Anna".to_string(),
        last_name: "Karenina".to_string(),
        username: "anna".to_string(),
        email: "anna@example.com".to_string(),
        password1: "vronsky-1877".to_string(),
        password2: "vronsky-1877".to_string(),
    };
    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form(&signup)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(resp.response().cookies().any(|c| c.name() == "session"));

    let login = LoginForm {
        username: "anna".to_string(),
        password: "vronsky-1877".to_string(),
        next: Some("/follow/".to_string()),
    };
    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form(&login)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/follow/");
    assert!(resp.response().cookies().any(|c| c.name() == "session"));
}

#[actix_web::test]
async fn test_signup_rejects_non_ascii_username() {
    let state = test_state(AppConfig::for_testing()).await;
    let app = test_app!(state);

    let signup = SignupForm {
        username: "лев".to_string(),
        password1: "war-and-peace".to_string(),
        password2: "war-and-peace".to_string(),
        ..SignupForm::default()
    };
    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form(&signup)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!resp.response().cookies().any(|c| c.name() == "session"));
    assert!(state.users.find_by_username("лев").await.unwrap().is_none());
}

#[actix_web::test]
async fn test_login_with_wrong_password_is_rejected() {
    let state = test_state(AppConfig::for_testing()).await;
    create_user(&state, "leo").await;
    let app = test_app!(state);

    let login = LoginForm {
        username: "leo".to_string(),
        password: "wrong-password".to_string(),
        next: None,
    };
    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form(&login)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!resp.response().cookies().any(|c| c.name() == "session"));
}

#[actix_web::test]
async fn test_duplicate_signup_is_rejected() {
    let state = test_state(AppConfig::for_testing()).await;
    create_user(&state, "leo").await;
    let app = test_app!(state);

    let signup = SignupForm {
        username: "leo".to_string(),
        password1: "another-password".to_string(),
        password2: "another-password".to_string(),
        ..SignupForm::default()
    };
    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form(&signup)
        .to_request();
    let body = test::call_and_read_body(&app, req).await;

    assert!(String::from_utf8_lossy(&body).contains("A user with that username already exists."));
}

#[cfg(feature = "rate-limit")]
#[actix_web::test]
async fn test_auth_forms_are_rate_limited() {
    let mut config = AppConfig::for_testing();
    config.auth_rate_limit.max_requests = 2;
    let state = test_state(config).await;
    let app = test_app!(state);

    let login = LoginForm {
        username: "nobody".to_string(),
        password: "nothing".to_string(),
        next: None,
    };
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/auth/login/")
            .set_form(&login)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form(&login)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key(header::RETRY_AFTER));

    // Page views are never limited.
    let req = test::TestRequest::get().uri("/auth/login/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
