use crate::types::{ParamMap, ParamValue};

/// Key under which the unflattened environment mapping is kept.
pub const ENV_KEY: &str = "env";

/// Flatten nested mappings into dot-joined keys (`{api: {url: x}}` -> `api.url`).
///
/// Sequences and scalars are leaves; empty mappings produce no keys.
pub fn flatten_env(env: &ParamMap) -> ParamMap {
    let mut out = ParamMap::new();
    for (k, v) in env {
        flatten_into(&mut out, k.clone(), v);
    }
    out
}

fn flatten_into(out: &mut ParamMap, prefix: String, value: &ParamValue) {
    match value {
        ParamValue::Object(map) => {
            for (k, v) in map {
                flatten_into(out, format!("{prefix}.{k}"), v);
            }
        }
        other => {
            out.insert(prefix, other.clone());
        }
    }
}
