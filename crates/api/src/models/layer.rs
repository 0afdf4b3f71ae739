//! Catalog layer types.

use serde::{Deserialize, Serialize};

use cake_maker_core::LayerId;

/// An ingredient offered for a layer, with the color the UI renders it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
}

/// A catalog layer (e.g. sponge, filling, cover) and its ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub ingredients: Vec<Ingredient>,
}

/// A layer as it appears in the seed data, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewLayer {
    pub name: String,
    pub ingredients: Vec<Ingredient>,
}
