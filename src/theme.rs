use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub background: String,
    pub font_family: String,
    pub font_size: f32,
    pub text_color: String,
}

impl Theme {
    pub fn netwulf() -> Self {
        Self {
            background: "#FFFFFF".to_string(),
            font_family: "Helvetica, Arial, sans-serif".to_string(),
            font_size: 10.0,
            text_color: "#000000".to_string(),
        }
    }

    pub fn transparent() -> Self {
        Self {
            background: "none".to_string(),
            ..Self::netwulf()
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "netwulf" | "default" => Some(Self::netwulf()),
            "transparent" => Some(Self::transparent()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::netwulf()
    }
}
