use crate::{features::users::User, routes::Navigation};
use serde_json::{Map, Value, json};

/// User as shown to the operator: every stored field except the password.
pub(super) fn user_summary(user: &User) -> Value {
    let mut summary = Map::new();
    if let Some(id) = &user.id {
        summary.insert("id".to_string(), Value::String(id.clone()));
    }
    summary.insert("username".to_string(), Value::String(user.username.clone()));
    for (key, value) in &user.extra {
        summary.insert(key.clone(), value.clone());
    }
    Value::Object(summary)
}

pub(super) fn navigation(nav: &Navigation, data: Value) -> Value {
    json!({
        "requested": nav.requested,
        "route": nav.route.path,
        "name": nav.route.name,
        "redirected": nav.redirected,
        "data": data,
    })
}
