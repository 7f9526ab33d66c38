/// Declaration kind of a generated type and its supertypes.
///
/// Interfaces carry no implements list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Class {
        extends: Vec<String>,
        implements: Vec<String>,
    },
    Interface {
        extends: Vec<String>,
    },
}

impl Declaration {
    pub fn is_interface(&self) -> bool {
        matches!(self, Self::Interface { .. })
    }

    /// `class` or `interface`.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Class { .. } => "class",
            Self::Interface { .. } => "interface",
        }
    }

    pub fn extends(&self) -> &[String] {
        match self {
            Self::Class { extends, .. } | Self::Interface { extends } => extends,
        }
    }

    pub fn implements(&self) -> &[String] {
        match self {
            Self::Class { implements, .. } => implements,
            Self::Interface { .. } => &[],
        }
    }
}

const CANONICAL_MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "abstract",
    "static",
    "final",
    "strictfp",
];

/// Order modifier tokens canonically and drop duplicates.
///
/// Unknown tokens follow the known ones in encounter order.
pub fn canonical_modifiers<'a>(tokens: impl IntoIterator<Item = &'a str>) -> String {
    let mut known = Vec::new();
    let mut unknown: Vec<&str> = Vec::new();
    for token in tokens {
        if let Some(rank) = CANONICAL_MODIFIERS.iter().position(|m| *m == token) {
            if !known.contains(&rank) {
                known.push(rank);
            }
        } else if !unknown.contains(&token) {
            unknown.push(token);
        }
    }
    known.sort_unstable();
    known
        .into_iter()
        .map(|rank| CANONICAL_MODIFIERS[rank])
        .chain(unknown)
        .collect::<Vec<_>>()
        .join(" ")
}
