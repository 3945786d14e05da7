//! Sign-up, login and logout.

use actix_web::{HttpResponse, web};
use tera::Context;

use quill_core::RepoError;
use quill_core::ValidationErrors;
use quill_core::domain::{Registration, User};
use quill_shared::dto::{LoginForm, NextQuery, SignupForm};

use super::posts::html;
use crate::middleware::auth::{Identity, OptionalIdentity, removal_cookie, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::urls;
use crate::views::{base_context, insert_errors};

const SIGNUP_FIELDS: &[&str] = &["username", "email", "password", "password_confirm"];
const USERNAME_TAKEN: &str = "A user with that username already exists.";
const INVALID_LOGIN: &str = "Please enter a correct username and password.";

/// Issue a session for `user` and send the browser to `location`.
fn start_session(state: &AppState, user: &User, location: &str) -> AppResult<HttpResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Found()
        .cookie(session_cookie(token, state.tokens.expiration_seconds()))
        .insert_header((actix_web::http::header::LOCATION, location))
        .finish())
}

fn render_signup(
    state: &AppState,
    viewer: Option<&Identity>,
    form: &SignupForm,
    errors: &ValidationErrors,
) -> AppResult<HttpResponse> {
    let echo = SignupForm {
        password1: String::new(),
        password2: String::new(),
        ..form.clone()
    };

    let mut ctx = base_context(viewer);
    ctx.insert("form", &echo);
    insert_errors(&mut ctx, errors, SIGNUP_FIELDS);

    Ok(html(state.templates.render("auth/signup.html", &ctx)?))
}

/// GET /auth/signup/
pub async fn signup_form(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    render_signup(
        &state,
        viewer.viewer(),
        &SignupForm::default(),
        &ValidationErrors::new(),
    )
}

/// POST /auth/signup/ - create the account and sign it in.
pub async fn signup(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    form: web::Form<SignupForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let registration = match Registration::new(
        &form.username,
        &form.email,
        &form.first_name,
        &form.last_name,
        &form.password1,
        &form.password2,
    ) {
        Ok(registration) => registration,
        Err(errors) => return render_signup(&state, viewer.viewer(), &form, &errors),
    };

    if state
        .users
        .find_by_username(&registration.username)
        .await?
        .is_some()
    {
        let errors = ValidationErrors::single("username", USERNAME_TAKEN);
        return render_signup(&state, viewer.viewer(), &form, &errors);
    }

    let password_hash = state
        .passwords
        .hash(&registration.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = match state.users.create(User::new(registration, password_hash)).await {
        Ok(user) => user,
        // Lost a race against a concurrent sign-up with the same name.
        Err(RepoError::Constraint(_)) => {
            let errors = ValidationErrors::single("username", USERNAME_TAKEN);
            return render_signup(&state, viewer.viewer(), &form, &errors);
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = %user.id, username = %user.username, "User signed up");
    start_session(&state, &user, urls::INDEX)
}

fn render_login(
    state: &AppState,
    viewer: Option<&Identity>,
    username: &str,
    next: &str,
    errors: &ValidationErrors,
) -> AppResult<HttpResponse> {
    let mut ctx: Context = base_context(viewer);
    ctx.insert("username", username);
    ctx.insert("next", next);
    insert_errors(&mut ctx, errors, &["form"]);

    Ok(html(state.templates.render("auth/login.html", &ctx)?))
}

/// GET /auth/login/
pub async fn login_form(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    query: web::Query<NextQuery>,
) -> AppResult<HttpResponse> {
    let next = urls::safe_next(query.next.as_deref()).unwrap_or("");
    render_login(&state, viewer.viewer(), "", next, &ValidationErrors::new())
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let next = urls::safe_next(form.next.as_deref());

    let user = state.users.find_by_username(form.username.trim()).await?;
    let verified = match &user {
        Some(user) => state
            .passwords
            .verify(&form.password, &user.password_hash)
            .map_err(|e| AppError::Internal(e.to_string()))?,
        None => false,
    };

    match user {
        Some(user) if verified => {
            tracing::info!(user_id = %user.id, "User logged in");
            start_session(&state, &user, next.unwrap_or(urls::INDEX))
        }
        _ => {
            tracing::debug!(username = %form.username, "Rejected login");
            let errors = ValidationErrors::single("form", INVALID_LOGIN);
            render_login(
                &state,
                viewer.viewer(),
                &form.username,
                next.unwrap_or(""),
                &errors,
            )
        }
    }
}

/// GET /auth/logout/ - drop the session cookie.
pub async fn logout(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let ctx = base_context(None);
    let body = state.templates.render("auth/logged_out.html", &ctx)?;

    Ok(HttpResponse::Ok()
        .content_type(actix_web::http::header::ContentType::html())
        .cookie(removal_cookie())
        .body(body))
}
