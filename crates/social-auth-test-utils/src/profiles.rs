// Profile fixtures in each provider's userinfo wire shape.

use serde_json::{json, Value};

/// Google OpenID Connect userinfo (`sub` is the account id).
pub fn google(sub: &str, email: &str) -> Value {
    json!({
        "sub": sub,
        "email": email,
        "email_verified": true,
        "name": "Google User",
        "picture": format!("https://lh3.googleusercontent.com/a/{sub}"),
    })
}

/// GitHub `/user` response. The id is numeric and `email` may be null.
pub fn github(id: u64, email: &str) -> Value {
    let email = if email.is_empty() {
        Value::Null
    } else {
        Value::String(email.to_string())
    };
    json!({
        "id": id,
        "login": format!("user{id}"),
        "name": "GitHub User",
        "email": email,
        "avatar_url": format!("https://avatars.githubusercontent.com/u/{id}"),
    })
}

/// Facebook Graph `/me` response with the picture edge expanded.
pub fn facebook(id: &str, email: &str) -> Value {
    json!({
        "id": id,
        "name": "Facebook User",
        "email": email,
        "picture": {
            "data": {
                "url": format!("https://graph.facebook.com/{id}/picture"),
                "is_silhouette": false,
            }
        },
    })
}
