//! Domain models and wire shapes for ingredients.
//!
//! Defines the persisted `Ingredient` record, the strongly-typed id wrapper,
//! and the request shapes for creation and partial update. The partial
//! update is represented as a closed set of [`PatchField`] variants so that
//! UPDATE statements are assembled from a fixed column allow-list rather
//! than request-supplied text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Strongly-typed ingredient identifier.
///
/// Assigned by the database on insert and immutable afterwards. Wrapping the
/// raw i64 keeps ids from being confused with other integer parameters.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct IngredientId(pub i64);

impl fmt::Display for IngredientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for IngredientId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A persisted ingredient row.
///
/// Column order in the assumed schema is (id, name, price, unit); this
/// service never creates or migrates that schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ingredient {
    /// Storage-assigned identifier.
    pub id: IngredientId,
    /// Display name, e.g. "Flour".
    pub name: String,
    /// Price per unit.
    pub price: f64,
    /// Unit of measure, e.g. "g", "ml".
    pub unit: String,
}

/// Request shape for creating an ingredient. All fields required; presence
/// and typing are enforced by the JSON boundary before a handler runs.
#[derive(Debug, Clone, Deserialize)]
pub struct NewIngredient {
    /// Display name.
    pub name: String,
    /// Price per unit.
    pub price: f64,
    /// Unit of measure.
    pub unit: String,
}

/// Request shape for a partial update. Every field optional, but at least
/// one must be supplied; an empty patch is rejected before any connection
/// is acquired.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientPatch {
    /// Replacement name, if changing.
    pub name: Option<String>,
    /// Replacement price, if changing.
    pub price: Option<f64>,
    /// Replacement unit, if changing.
    pub unit: Option<String>,
}

impl IngredientPatch {
    /// Returns the supplied fields as the closed [`PatchField`] set, in
    /// declaration order (name, price, unit).
    pub fn fields(&self) -> Vec<PatchField> {
        let mut fields = Vec::with_capacity(3);
        if let Some(name) = &self.name {
            fields.push(PatchField::Name(name.clone()));
        }
        if let Some(price) = self.price {
            fields.push(PatchField::Price(price));
        }
        if let Some(unit) = &self.unit {
            fields.push(PatchField::Unit(unit.clone()));
        }
        fields
    }

    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.unit.is_none()
    }
}

/// One updatable column with its new value.
///
/// The enum is the allow-list: `column()` is the only source of column names
/// for dynamic UPDATE assembly, so no request text can reach the SQL as an
/// identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchField {
    /// Set the `name` column.
    Name(String),
    /// Set the `price` column.
    Price(f64),
    /// Set the `unit` column.
    Unit(String),
}

impl PatchField {
    /// The fixed column name this field updates.
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Price(_) => "price",
            Self::Unit(_) => "unit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patch_reports_empty() {
        let patch = IngredientPatch::default();
        assert!(patch.is_empty());
        assert!(patch.fields().is_empty());
    }

    #[test]
    fn patch_fields_follow_declaration_order() {
        let patch = IngredientPatch {
            name: Some("Salt".to_string()),
            price: Some(0.8),
            unit: Some("g".to_string()),
        };
        let fields = patch.fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], PatchField::Name("Salt".to_string()));
        assert_eq!(fields[1], PatchField::Price(0.8));
        assert_eq!(fields[2], PatchField::Unit("g".to_string()));
    }

    #[test]
    fn single_field_patch_deserializes() {
        let patch: IngredientPatch = serde_json::from_str(r#"{"price": 5}"#).unwrap();
        assert!(!patch.is_empty());
        assert_eq!(patch.fields(), vec![PatchField::Price(5.0)]);
    }

    #[test]
    fn empty_json_object_is_an_empty_patch() {
        let patch: IngredientPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn columns_come_from_the_fixed_allow_list() {
        assert_eq!(PatchField::Name(String::new()).column(), "name");
        assert_eq!(PatchField::Price(0.0).column(), "price");
        assert_eq!(PatchField::Unit(String::new()).column(), "unit");
    }

    #[test]
    fn ingredient_serializes_with_id() {
        let ingredient = Ingredient {
            id: IngredientId(7),
            name: "Flour".to_string(),
            price: 1.2,
            unit: "kg".to_string(),
        };
        let json = serde_json::to_value(&ingredient).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "Flour");
        assert_eq!(json["price"], 1.2);
        assert_eq!(json["unit"], "kg");
    }
}
