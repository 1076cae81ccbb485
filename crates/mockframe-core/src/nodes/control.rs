//! UI control mockups: buttons, inputs and cards.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub text: String,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<ButtonVariant>,
}

impl Default for Button {
    fn default() -> Self {
        Self {
            text: "Button".to_string(),
            width: 100.0,
            height: 40.0,
            variant: Some(ButtonVariant::Primary),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub width: f64,
    pub height: f64,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            placeholder: Some("Input...".to_string()),
            width: 200.0,
            height: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub width: f64,
    pub height: f64,
}

impl Default for Card {
    fn default() -> Self {
        Self {
            title: Some("Card Title".to_string()),
            content: Some("Card Content".to_string()),
            width: 300.0,
            height: 200.0,
        }
    }
}
