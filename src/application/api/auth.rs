//! `/Auth` endpoints

use serde::de::IgnoredAny;
use serde_json::Value;

use crate::application::cache::{Mutation, Tag, TagKind};
use crate::domain::{LoginRequest, RegisterRequest};
use crate::infrastructure::RequestSpec;
use crate::shared::ApiResult;

pub fn login(request: &LoginRequest) -> ApiResult<Mutation<Value>> {
    Ok(Mutation::new(
        RequestSpec::post("/Auth/login").json(request)?,
        [Tag::whole(TagKind::User)],
    ))
}

pub fn register(request: &RegisterRequest) -> ApiResult<Mutation<IgnoredAny>> {
    Ok(Mutation::new(
        RequestSpec::post("/Auth/register").json(request)?,
        [Tag::whole(TagKind::User)],
    ))
}

pub fn logout() -> RequestSpec {
    RequestSpec::post("/Auth/logout")
}

/// Token carried by a login response: `{"token": ".."}` or a bare string
pub fn token_from_response(body: &Value) -> Option<String> {
    let token = match body {
        Value::String(token) => token.as_str(),
        Value::Object(map) => map.get("token")?.as_str()?,
        _ => return None,
    };
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_is_read_from_object_or_string() {
        assert_eq!(token_from_response(&json!({"token": "abc"})), Some("abc".into()));
        assert_eq!(token_from_response(&json!("abc\n")), Some("abc".into()));
        assert_eq!(token_from_response(&json!({"token": ""})), None);
        assert_eq!(token_from_response(&json!({"jwt": "abc"})), None);
        assert_eq!(token_from_response(&Value::Null), None);
    }
}
