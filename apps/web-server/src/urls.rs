//! Reverse routing: paths for the site's named pages.

pub const INDEX: &str = "/";
pub const LOGIN: &str = "/auth/login/";

pub fn profile(username: &str) -> String {
    format!("/{username}/")
}

pub fn post(username: &str, post_id: i32) -> String {
    format!("/{username}/{post_id}/")
}

pub fn post_edit(username: &str, post_id: i32) -> String {
    format!("/{username}/{post_id}/edit/")
}

pub fn add_comment(username: &str, post_id: i32) -> String {
    format!("/{username}/{post_id}/comment/")
}

pub fn profile_follow(username: &str) -> String {
    format!("/{username}/follow/")
}

pub fn profile_unfollow(username: &str) -> String {
    format!("/{username}/unfollow/")
}

pub fn group(slug: &str) -> String {
    format!("/group/{slug}/")
}

/// Login page that returns to `next` afterwards. Slashes stay readable; a
/// query string in `next` is escaped so it survives the round trip.
pub fn login_redirect(next: &str) -> String {
    let encoded: Vec<String> = next
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("{LOGIN}?next={}", encoded.join("/"))
}

/// Accept only same-site absolute paths as a post-login destination.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}
