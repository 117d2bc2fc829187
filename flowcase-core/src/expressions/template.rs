/// A `${name}` or `${name:default}` reference inside a template string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarRef {
    pub name: String,
    pub default: Option<String>,
    /// Original placeholder text, kept so unresolved references survive verbatim.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Var(VarRef),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub segments: Vec<Segment>,
}

impl Template {
    pub fn has_vars(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Var(_)))
    }

    pub fn vars(&self) -> impl Iterator<Item = &VarRef> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Var(v) => Some(v),
            Segment::Literal(_) => None,
        })
    }
}

/// Split a string into literal text and variable references.
///
/// Parsing never fails: an unclosed `${` or an empty name is kept as literal text.
pub fn parse_template(input: &str) -> Template {
    let mut segments = Vec::new();
    let mut buf = String::new();
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        buf.push_str(&rest[..start]);
        let after = &rest[start..];
        let body = &after[2..];

        let Some(end) = body.find('}') else {
            buf.push_str(after);
            rest = "";
            break;
        };

        let raw = &after[..end + 3];
        let inner = &body[..end];
        let (name, default) = match inner.split_once(':') {
            Some((n, d)) => (n.trim(), Some(d.to_string())),
            None => (inner.trim(), None),
        };

        if name.is_empty() {
            buf.push_str(raw);
        } else {
            if !buf.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut buf)));
            }
            segments.push(Segment::Var(VarRef {
                name: name.to_string(),
                default,
                raw: raw.to_string(),
            }));
        }
        rest = &body[end + 1..];
    }

    buf.push_str(rest);
    if !buf.is_empty() {
        segments.push(Segment::Literal(buf));
    }

    Template { segments }
}
