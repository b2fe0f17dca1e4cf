//! Google Chat card message types.
//!
//! Widgets are an externally tagged union, so each variant serializes as a
//! single-key object such as `{"textParagraph": {"text": "..."}}`.

use serde::{Deserialize, Serialize};

/// The outbound chat message document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Plain text shown above the cards, used for the mention.
    pub text: String,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub widgets: Vec<Widget>,
}

/// A single renderable node of a card section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Widget {
    TextParagraph(TextParagraph),
    Buttons(Vec<Button>),
    Image(Image),
    KeyValue(KeyValue),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextParagraph {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValue {
    pub top_label: String,
    pub content: String,
    pub content_multiline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Button {
    TextButton(TextButton),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextButton {
    pub text: String,
    pub on_click: OnClick,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnClick {
    pub open_link: OpenLink,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenLink {
    pub url: String,
}

impl Widget {
    pub fn text_paragraph(text: impl Into<String>) -> Self {
        Widget::TextParagraph(TextParagraph { text: text.into() })
    }

    /// A buttons widget holding one text button that opens `url`.
    pub fn link_button(label: impl Into<String>, url: impl Into<String>) -> Self {
        Widget::Buttons(vec![Button::TextButton(TextButton {
            text: label.into(),
            on_click: OnClick {
                open_link: OpenLink { url: url.into() },
            },
        })])
    }

    pub fn image(image_url: impl Into<String>) -> Self {
        Widget::Image(Image {
            image_url: image_url.into(),
        })
    }

    /// A key-value widget with multi-line content.
    pub fn multiline_key_value(top_label: impl Into<String>, content: impl Into<String>) -> Self {
        Widget::KeyValue(KeyValue {
            top_label: top_label.into(),
            content: content.into(),
            content_multiline: true,
        })
    }
}

impl ChatMessage {
    /// Builds a message holding a single card made of the given sections.
    pub fn single_card(text: impl Into<String>, sections: Vec<Vec<Widget>>) -> Self {
        Self {
            text: text.into(),
            cards: vec![Card {
                sections: sections
                    .into_iter()
                    .map(|widgets| Section { widgets })
                    .collect(),
            }],
        }
    }
}
