//! Path pattern matching module
//!
//! Patterns are split on `/` into literal segments and `{name}` captures.

/// One segment of a path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled path pattern such as `/users/{id}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

/// Values captured from a matched path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = split(pattern)
            .map(|seg| {
                seg.strip_prefix('{')
                    .and_then(|s| s.strip_suffix('}'))
                    .map_or_else(
                        || Segment::Literal(seg.to_string()),
                        |name| Segment::Param(name.to_string()),
                    )
            })
            .collect();

        Self {
            source: pattern.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match a request path, returning the captured parameters
    ///
    /// Literal segments must be equal; a capture takes one whole segment,
    /// which may be empty (`/users/` matches `/users/{id}` with `id = ""`).
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let parts: Vec<&str> = split(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => params.push((name.clone(), part.to_string())),
            }
        }
        Some(PathParams(params))
    }
}

/// Segments after the leading slash; the root path has none
fn split(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let empty = trimmed.is_empty();
    trimmed.split('/').filter(move |_| !empty)
}
