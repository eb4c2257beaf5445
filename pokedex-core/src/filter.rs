use crate::pokeapi::NamedResource;
use std::fmt;

/// Type selection for the listing. `All` lists every pokemon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Type(String),
}

impl TypeFilter {
    /// Empty or "all" selects every type
    pub fn from_selection(selection: &str) -> Self {
        let selection = selection.trim().to_lowercase();
        if selection.is_empty() || selection == "all" {
            TypeFilter::All
        } else {
            TypeFilter::Type(selection)
        }
    }

    pub fn type_name(&self) -> Option<&str> {
        match self {
            TypeFilter::All => None,
            TypeFilter::Type(name) => Some(name),
        }
    }

    /// Choices for a type picker: `All` first, then each known type
    pub fn choices(types: &[String]) -> Vec<TypeFilter> {
        std::iter::once(TypeFilter::All)
            .chain(types.iter().map(|t| TypeFilter::Type(t.clone())))
            .collect()
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => write!(f, "All types"),
            TypeFilter::Type(name) => write!(f, "{}", name),
        }
    }
}

/// Case-insensitive substring match on the name, keeping upstream order.
/// Surrounding whitespace in the query is ignored.
pub fn filter_by_name(items: &[NamedResource], query: &str) -> Vec<NamedResource> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&query))
        .cloned()
        .collect()
}
