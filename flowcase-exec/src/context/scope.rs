use std::collections::HashSet;

use flowcase_core::expressions::{flatten_env, parse_template, VariableResolver, ENV_KEY};
use flowcase_core::types::{ParamMap, ParamValue};

/// Parameter mapping shared by every context kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamScope {
    params: ParamMap,
}

impl ParamScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from environment configuration: flattened dot-joined keys plus
    /// the nested mapping under `env`.
    pub fn from_env(env: Option<&ParamMap>) -> Self {
        let mut params = ParamMap::new();
        if let Some(env) = env.filter(|e| !e.is_empty()) {
            params = flatten_env(env);
            params.insert(
                ENV_KEY.to_string(),
                ParamValue::Object(env.clone().into_iter().collect()),
            );
        }
        Self { params }
    }

    pub fn params(&self) -> &ParamMap {
        &self.params
    }

    pub fn snapshot(&self) -> ParamMap {
        self.params.clone()
    }

    pub fn get_param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    pub fn set_param(&mut self, name: impl Into<String>, value: ParamValue) {
        self.params.insert(name.into(), value);
    }

    /// Merge `values` in as-is; colliding keys are overwritten.
    pub fn update_params(&mut self, values: ParamMap) {
        self.params.extend(values);
    }

    /// Resolve `overrides` against the current mapping, then merge them in.
    pub fn apply_overrides(&mut self, overrides: &ParamMap) {
        let resolved = self.resolve_params(overrides);
        self.update_params(resolved);
    }

    pub fn resolver(&self) -> VariableResolver<'_> {
        VariableResolver::new(&self.params)
    }

    pub fn resolve_value(&self, value: &ParamValue) -> ParamValue {
        self.resolver().resolve(value)
    }

    pub fn resolve_params(&self, values: &ParamMap) -> ParamMap {
        self.resolver().resolve_map(values)
    }

    /// The whole mapping resolved against itself.
    ///
    /// Each key is rendered exactly once, after the keys it references, so a
    /// builtin such as `${uuid}` yields one value that every `${name}`
    /// reference to its defining key shares. Keys on a reference cycle keep
    /// the placeholders that close the cycle.
    pub fn resolved(&self) -> ParamMap {
        let mut pass = SelfResolution {
            current: self.params.clone(),
            done: HashSet::new(),
            visiting: HashSet::new(),
        };
        let keys: Vec<String> = self.params.keys().cloned().collect();
        for key in &keys {
            pass.resolve_key(key);
        }
        pass.current
    }

    /// Replace the mapping with its resolved form.
    pub fn resolve_in_place(&mut self) {
        self.params = self.resolved();
    }
}

struct SelfResolution {
    current: ParamMap,
    done: HashSet<String>,
    visiting: HashSet<String>,
}

impl SelfResolution {
    fn resolve_key(&mut self, key: &str) {
        if self.done.contains(key) || !self.visiting.insert(key.to_string()) {
            return;
        }
        let Some(value) = self.current.get(key).cloned() else {
            self.visiting.remove(key);
            return;
        };

        let mut deps = Vec::new();
        collect_refs(&value, &mut deps);
        for name in deps {
            for dep in self.defining_keys(&name) {
                self.resolve_key(&dep);
            }
        }

        let rendered = VariableResolver::new(&self.current).resolve(&value);
        self.current.insert(key.to_string(), rendered);
        self.visiting.remove(key);
        self.done.insert(key.to_string());
    }

    /// Keys of the mapping a reference to `name` may read from.
    fn defining_keys(&self, name: &str) -> Vec<String> {
        let mut keys = Vec::new();
        let mut push = |k: &str| {
            if self.current.contains_key(k) {
                keys.push(k.to_string());
            }
        };
        match name.strip_prefix("env.") {
            Some(path) => {
                push(ENV_KEY);
                push(path);
            }
            None => {
                push(name);
                if let Some((root, _)) = name.split_once('.') {
                    push(root);
                }
            }
        }
        keys
    }
}

fn collect_refs(value: &ParamValue, names: &mut Vec<String>) {
    match value {
        ParamValue::String(s) if s.contains("${") => {
            names.extend(parse_template(s).vars().map(|v| v.name.clone()));
        }
        ParamValue::Array(arr) => arr.iter().for_each(|v| collect_refs(v, names)),
        ParamValue::Object(map) => map.values().for_each(|v| collect_refs(v, names)),
        _ => {}
    }
}
