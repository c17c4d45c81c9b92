use serde::{Deserialize, Serialize};

/// Reference-catalog entry a recipe line points to.
///
/// Recipe views join ingredients live, so renaming an entry changes how every
/// recipe using it is displayed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

/// Payload required to insert a new ingredient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}

impl NewIngredient {
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            measurement_unit: measurement_unit.into().trim().to_string(),
        }
    }
}

/// Patch data applied when correcting an ingredient entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateIngredient {
    pub name: String,
    pub measurement_unit: String,
}

/// Query definition used to look up ingredients.
#[derive(Debug, Clone, Default)]
pub struct IngredientListQuery {
    /// Case-insensitive prefix the ingredient name must start with.
    pub name_prefix: Option<String>,
}

impl IngredientListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the results to names starting with `prefix`.
    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into().trim().to_string();
        self.name_prefix = (!prefix.is_empty()).then_some(prefix);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_prefix_is_ignored() {
        let query = IngredientListQuery::new().name_prefix("   ");
        assert!(query.name_prefix.is_none());

        let query = IngredientListQuery::new().name_prefix(" fl ");
        assert_eq!(query.name_prefix.as_deref(), Some("fl"));
    }
}
