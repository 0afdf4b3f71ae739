//! Cake order domain types.
//!
//! An order's descriptive fields come in one of two shapes, selected by the
//! deployment's [`OrderSchema`]:
//!
//! - **classic**: a fixed set of named slots (`cakeName`, `topping`, `cover`,
//!   `layer1`, `layer2`, `sponge`)
//! - **custom**: a cake name plus a free-form list of ingredient selections
//!
//! Both shapes are stored as the same JSON document column and serialize
//! flattened into the order, so clients see e.g. `{ "id", "cakeName", ... }`.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cake_maker_core::{OrderId, UserId};

use super::user::UserSummary;
use super::validation::{FieldErrorKind, ValidationErrors};

/// Minimum length of a cake name, in characters.
pub const MIN_CAKE_NAME_LENGTH: usize = 5;

/// Which order shape this deployment accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderSchema {
    /// Fixed attribute slots.
    #[default]
    Classic,
    /// Free-form ingredient selections.
    Custom,
}

impl fmt::Display for OrderSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Classic => "classic",
            Self::Custom => "custom",
        })
    }
}

impl FromStr for OrderSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "custom" => Ok(Self::Custom),
            other => Err(format!("unknown order schema '{other}' (expected classic or custom)")),
        }
    }
}

/// A cake built from the fixed set of slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassicCake {
    pub cake_name: String,
    pub topping: String,
    pub cover: String,
    pub layer1: String,
    pub layer2: String,
    pub sponge: String,
}

/// One chosen ingredient for one catalog layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSelection {
    pub layer: String,
    pub ingredient: String,
}

/// A cake built from free-form ingredient selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCake {
    pub cake_name: String,
    pub ingredients: Vec<IngredientSelection>,
}

/// The descriptive part of an order, in whichever shape it was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CakeDetails {
    Classic(ClassicCake),
    Custom(CustomCake),
}

impl CakeDetails {
    /// The cake's name, present in both shapes.
    #[must_use]
    pub fn cake_name(&self) -> &str {
        match self {
            Self::Classic(cake) => &cake.cake_name,
            Self::Custom(cake) => &cake.cake_name,
        }
    }
}

/// A placed cake order (stored record).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(flatten)]
    pub details: CakeDetails,
    pub created_at: DateTime<Utc>,
    /// Weak reference to the user who placed the order.
    pub ordered_by: UserId,
}

/// Everything needed to insert an order. The store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub ordered_by: UserId,
    pub details: CakeDetails,
}

/// The owner of an order, resolved to a profile when possible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OwnerRef {
    Profile(UserSummary),
    Id(UserId),
}

/// An order with its owner embedded, as shown by the order endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: OrderId,
    #[serde(flatten)]
    pub details: CakeDetails,
    pub created_at: DateTime<Utc>,
    pub ordered_by: OwnerRef,
}

impl OrderView {
    /// Build a view, embedding `owner` when it was resolved.
    #[must_use]
    pub fn new(order: Order, owner: Option<UserSummary>) -> Self {
        let ordered_by = owner.map_or(OwnerRef::Id(order.ordered_by), OwnerRef::Profile);
        Self {
            id: order.id,
            details: order.details,
            created_at: order.created_at,
            ordered_by,
        }
    }
}

/// One ingredient selection as sent by a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientSelectionInput {
    pub layer: Option<String>,
    pub ingredient: Option<String>,
}

/// Order fields as sent by a client, before validation.
///
/// Every field is optional here so that missing fields become field errors
/// rather than a body parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFields {
    pub cake_name: Option<String>,
    pub topping: Option<String>,
    pub cover: Option<String>,
    pub layer1: Option<String>,
    pub layer2: Option<String>,
    pub sponge: Option<String>,
    pub ingredients: Option<Vec<IngredientSelectionInput>>,
}

impl OrderFields {
    /// Validate the fields required by `schema` and build the order details.
    ///
    /// # Errors
    ///
    /// Returns every missing or malformed field.
    pub fn validate(&self, schema: OrderSchema) -> Result<CakeDetails, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let cake_name =
            errors.require_text("cakeName", self.cake_name.as_deref(), MIN_CAKE_NAME_LENGTH);

        match schema {
            OrderSchema::Classic => {
                let topping = errors.require_text("topping", self.topping.as_deref(), 1);
                let cover = errors.require_text("cover", self.cover.as_deref(), 1);
                let layer1 = errors.require_text("layer1", self.layer1.as_deref(), 1);
                let layer2 = errors.require_text("layer2", self.layer2.as_deref(), 1);
                let sponge = errors.require_text("sponge", self.sponge.as_deref(), 1);

                match (cake_name, topping, cover, layer1, layer2, sponge) {
                    (
                        Some(cake_name),
                        Some(topping),
                        Some(cover),
                        Some(layer1),
                        Some(layer2),
                        Some(sponge),
                    ) if errors.is_empty() => Ok(CakeDetails::Classic(ClassicCake {
                        cake_name,
                        topping,
                        cover,
                        layer1,
                        layer2,
                        sponge,
                    })),
                    _ => Err(errors),
                }
            }
            OrderSchema::Custom => {
                let ingredients = self.validate_ingredients(&mut errors);
                match (cake_name, ingredients) {
                    (Some(cake_name), Some(ingredients)) if errors.is_empty() => {
                        Ok(CakeDetails::Custom(CustomCake {
                            cake_name,
                            ingredients,
                        }))
                    }
                    _ => Err(errors),
                }
            }
        }
    }

    fn validate_ingredients(
        &self,
        errors: &mut ValidationErrors,
    ) -> Option<Vec<IngredientSelection>> {
        let inputs = match self.ingredients.as_deref() {
            None | Some([]) => {
                errors.add(
                    "ingredients",
                    FieldErrorKind::Required,
                    "at least one ingredient must be chosen",
                );
                return None;
            }
            Some(inputs) => inputs,
        };

        let mut selections = Vec::with_capacity(inputs.len());
        for (i, input) in inputs.iter().enumerate() {
            let layer = errors.require_text(
                &format!("ingredients.{i}.layer"),
                input.layer.as_deref(),
                1,
            );
            let ingredient = errors.require_text(
                &format!("ingredients.{i}.ingredient"),
                input.ingredient.as_deref(),
                1,
            );
            if let (Some(layer), Some(ingredient)) = (layer, ingredient) {
                selections.push(IngredientSelection { layer, ingredient });
            }
        }

        (selections.len() == inputs.len()).then_some(selections)
    }
}
