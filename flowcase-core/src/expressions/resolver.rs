use super::builtins::Builtin;
use super::env::ENV_KEY;
use super::template::{parse_template, Segment, VarRef};
use crate::types::{ParamMap, ParamValue};

/// Best-effort `${...}` substitution over a flat parameter mapping.
///
/// Lookup order per reference: builtin, `env.<path>`, direct name, default.
/// A reference that resolves to nothing and has no default is left as its
/// original placeholder text; resolution never fails.
#[derive(Debug, Clone, Copy)]
pub struct VariableResolver<'a> {
    params: &'a ParamMap,
}

impl<'a> VariableResolver<'a> {
    pub fn new(params: &'a ParamMap) -> Self {
        Self { params }
    }

    /// Resolve every string inside `value`, keeping its shape.
    pub fn resolve(&self, value: &ParamValue) -> ParamValue {
        match value {
            ParamValue::Null | ParamValue::Bool(_) | ParamValue::Number(_) => value.clone(),
            ParamValue::String(s) => ParamValue::String(self.render(s)),
            ParamValue::Array(arr) => ParamValue::Array(arr.iter().map(|v| self.resolve(v)).collect()),
            ParamValue::Object(map) => ParamValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.resolve(v)))
                    .collect(),
            ),
        }
    }

    pub fn resolve_map(&self, map: &ParamMap) -> ParamMap {
        map.iter()
            .map(|(k, v)| (k.clone(), self.resolve(v)))
            .collect()
    }

    /// Substitute all references in a single string.
    pub fn render(&self, input: &str) -> String {
        if !input.contains("${") {
            return input.to_string();
        }
        let template = parse_template(input);
        let mut out = String::with_capacity(input.len());
        for seg in &template.segments {
            match seg {
                Segment::Literal(l) => out.push_str(l),
                Segment::Var(var) => match self.lookup(var) {
                    Some(v) => push_value(&mut out, &v),
                    None => out.push_str(&var.raw),
                },
            }
        }
        out
    }

    /// Value a single reference resolves to, or `None` if it stays unresolved.
    pub fn lookup(&self, var: &VarRef) -> Option<ParamValue> {
        if let Some(builtin) = Builtin::from_name(&var.name) {
            return Some(builtin.evaluate());
        }

        let found = match var.name.strip_prefix("env.") {
            Some(path) => self.lookup_env(path),
            None => self.lookup_param(&var.name),
        };

        found.or_else(|| var.default.clone().map(ParamValue::String))
    }

    /// Names referenced by `value` that would survive resolution unresolved.
    pub fn unresolved(&self, value: &ParamValue) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_unresolved(value, &mut names);
        names
    }

    fn collect_unresolved(&self, value: &ParamValue, names: &mut Vec<String>) {
        match value {
            ParamValue::String(s) => {
                for var in parse_template(s).vars() {
                    if self.lookup(var).is_none() && !names.contains(&var.name) {
                        names.push(var.name.clone());
                    }
                }
            }
            ParamValue::Array(arr) => {
                for v in arr {
                    self.collect_unresolved(v, names);
                }
            }
            ParamValue::Object(map) => {
                for v in map.values() {
                    self.collect_unresolved(v, names);
                }
            }
            _ => {}
        }
    }

    fn lookup_env(&self, path: &str) -> Option<ParamValue> {
        self.params
            .get(ENV_KEY)
            .and_then(|env| walk(env, path))
            .or_else(|| self.params.get(path))
            .cloned()
    }

    fn lookup_param(&self, name: &str) -> Option<ParamValue> {
        if let Some(v) = self.params.get(name) {
            return Some(v.clone());
        }
        let (root, rest) = name.split_once('.')?;
        self.params.get(root).and_then(|v| walk(v, rest)).cloned()
    }
}

fn walk<'v>(value: &'v ParamValue, path: &str) -> Option<&'v ParamValue> {
    let mut cur = value;
    for seg in path.split('.') {
        cur = cur.as_object()?.get(seg)?;
    }
    Some(cur)
}

fn push_value(out: &mut String, value: &ParamValue) {
    match value {
        ParamValue::String(s) => out.push_str(s),
        ParamValue::Null => {}
        ParamValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        ParamValue::Number(n) => out.push_str(&n.to_string()),
        other => out.push_str(&other.to_string()),
    }
}
