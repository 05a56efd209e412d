use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub set: SetRef,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub subtypes: Vec<String>,
    #[serde(default)]
    pub images: CardImages,
}

/// The slice of the owning set embedded in every card payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardImages {
    #[serde(default)]
    pub small: String,
    #[serde(default)]
    pub large: String,
}

impl Card {
    pub fn rarity_label(&self) -> &str {
        self.rarity.as_deref().unwrap_or("Unknown rarity")
    }
}
