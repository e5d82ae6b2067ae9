/// One entry of a dependency spec: wire the instance registered as `target` into `alias`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    pub alias: String,
    pub target: String,
}
impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.alias == self.target {
            f.write_str(&self.alias)
        } else {
            write!(f, "{}={}", self.alias, self.target)
        }
    }
}

/// Parses a dependency spec like `"address, card = creditCard"`
///
/// Tokens are separated by commas and trimmed, empty tokens are skipped.
/// `alias = key` wires `key` into `alias`, a bare `key` wires it into a property
/// of the same name. The result keeps the order of the spec. Never fails, a
/// missing or blank spec has no dependencies.
pub fn parse(spec: Option<&str>) -> Vec<Dependency> {
    let Some(spec) = spec else {
        return Vec::new();
    };

    spec.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once('=') {
            Some((alias, target)) => Dependency {
                alias: alias.trim().to_string(),
                target: target.trim().to_string(),
            },
            None => Dependency {
                alias: token.to_string(),
                target: token.to_string(),
            },
        })
        .collect()
}
