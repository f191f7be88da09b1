//! Card rendering for matched recommendations.
//!
//! Rendering is pure: the same match and style always produce the same card.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::constants::render::{
    FORM_CARD_HEADING, HEADING_SEPARATOR, ITEM_SEPARATOR, SCHEDULE_SEPARATOR,
};
use crate::data::{Payload, Record, ScheduleItem};
use crate::source::FormAnswer;
use crate::types::{AttributeName, AttributeValue, Glyph};

/// How attribute values are shown in headings and option lists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LabelStyle {
    /// Value exactly as authored.
    #[default]
    Raw,
    /// Underscores become spaces and each word is capitalized (`light_veggie` → `Light Veggie`).
    Humanized,
}

impl LabelStyle {
    /// Format `value` for display.
    pub fn apply(&self, value: &str) -> String {
        match self {
            LabelStyle::Raw => value.to_string(),
            LabelStyle::Humanized => format_option_label(value),
        }
    }
}

/// How a text payload becomes card content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PayloadStyle {
    /// Split on a literal separator into bullet items.
    Bullets {
        /// Literal separator between items (default `|`).
        separator: String,
    },
    /// Keep as a paragraph; embedded newlines become line breaks.
    Paragraph,
}

impl Default for PayloadStyle {
    fn default() -> Self {
        PayloadStyle::Bullets {
            separator: ITEM_SEPARATOR.to_string(),
        }
    }
}

/// Glyphs for the values of one attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeIcons {
    glyphs: IndexMap<AttributeValue, Glyph>,
    fallback: Glyph,
}

/// Static attribute → value → glyph table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IconTable {
    attributes: IndexMap<AttributeName, AttributeIcons>,
}

impl IconTable {
    /// Empty table; no attribute gets a glyph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register glyphs for `attribute`, with `fallback` for unlisted values.
    pub fn with_attribute<K, V, I>(
        mut self,
        attribute: impl Into<AttributeName>,
        glyphs: I,
        fallback: impl Into<Glyph>,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<AttributeValue>,
        V: Into<Glyph>,
    {
        let glyphs = glyphs
            .into_iter()
            .map(|(value, glyph)| (value.into(), glyph.into()))
            .collect();
        self.attributes.insert(
            attribute.into(),
            AttributeIcons {
                glyphs,
                fallback: fallback.into(),
            },
        );
        self
    }

    /// Glyph for `value` of `attribute`; the attribute's fallback when the value is
    /// unlisted, `None` when the attribute has no table at all.
    pub fn glyph(&self, attribute: &str, value: &str) -> Option<&str> {
        let icons = self.attributes.get(attribute)?;
        Some(
            icons
                .glyphs
                .get(value)
                .map(String::as_str)
                .unwrap_or(icons.fallback.as_str()),
        )
    }

    /// True when no attribute has glyphs.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Presentation settings for a page's cards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardStyle {
    /// How values appear in the heading.
    pub label_style: LabelStyle,
    /// How text payloads become the card body.
    pub payload_style: PayloadStyle,
    /// Glyphs per attribute value.
    pub icons: IconTable,
    /// Attributes shown in the heading; `None` means every selector.
    pub heading_attributes: Option<Vec<AttributeName>>,
    /// Word appended to the heading (e.g. `route`).
    pub heading_suffix: Option<String>,
    /// Heading used for form-schema cards.
    pub form_heading: String,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            label_style: LabelStyle::Raw,
            payload_style: PayloadStyle::default(),
            icons: IconTable::new(),
            heading_attributes: None,
            heading_suffix: None,
            form_heading: FORM_CARD_HEADING.to_string(),
        }
    }
}

/// Labelled value shown above the card body (form-schema cards).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CardField {
    /// Question label.
    pub label: String,
    /// Chosen option label.
    pub value: String,
}

/// Main content of a card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardBody {
    /// Bullet list.
    Items {
        /// Items in payload order.
        items: Vec<String>,
    },
    /// Paragraph split into lines.
    Paragraph {
        /// Lines shown separated by line breaks.
        lines: Vec<String>,
    },
    /// Structured schedule.
    Schedule {
        /// Plan title.
        title: String,
        /// Plan summary.
        summary: String,
        /// Stops in presentation order.
        entries: Vec<ScheduleItem>,
    },
}

/// Display fragment for one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecommendationCard {
    /// Heading built from the matched attribute values.
    pub heading: String,
    /// Glyphs or image paths shown beside the heading.
    pub icons: Vec<Glyph>,
    /// Answered questions, for form-schema cards.
    pub fields: Vec<CardField>,
    /// Main card content.
    pub body: CardBody,
}

impl RecommendationCard {
    /// Bullet items, or an empty slice for paragraph and schedule bodies.
    pub fn items(&self) -> &[String] {
        match &self.body {
            CardBody::Items { items } => items,
            _ => &[],
        }
    }

    /// HTML fragment for the card; all text is escaped.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<div class=\"card route-card\">\n");
        if !self.icons.is_empty() {
            let icons: Vec<String> = self.icons.iter().map(|glyph| icon_html(glyph)).collect();
            html.push_str(&format!(
                "  <div class=\"route-card-icon\">{}</div>\n",
                icons.join(" ")
            ));
        }
        html.push_str("  <div class=\"card-text\">\n");
        html.push_str(&format!("    <h3>{}</h3>\n", escape_html(&self.heading)));
        for field in &self.fields {
            html.push_str(&format!(
                "    <p><strong>{}:</strong> {}</p>\n",
                escape_html(&field.label),
                escape_html(&field.value)
            ));
        }
        match &self.body {
            CardBody::Items { items } => {
                let list: String = items
                    .iter()
                    .map(|item| format!("<li>{}</li>", escape_html(item)))
                    .collect();
                html.push_str(&format!("    <ul>{list}</ul>\n"));
            }
            CardBody::Paragraph { lines } => {
                let lines: Vec<String> = lines.iter().map(|line| escape_html(line)).collect();
                html.push_str(&format!("    <p>{}</p>\n", lines.join("<br>")));
            }
            CardBody::Schedule {
                title,
                summary,
                entries,
            } => {
                html.push_str(&format!(
                    "    <p><strong>{}</strong><br><em>{}</em></p>\n",
                    escape_html(title),
                    escape_html(summary)
                ));
                for entry in entries {
                    html.push_str(&format!(
                        "    <p><strong>{}{}{}</strong><br>{}</p>\n",
                        escape_html(&entry.time),
                        SCHEDULE_SEPARATOR,
                        escape_html(&entry.title),
                        escape_html(&entry.description)
                    ));
                }
            }
        }
        html.push_str("  </div>\n</div>\n");
        html
    }

    /// Plain-text rendering for terminals.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if !self.icons.is_empty() {
            out.push_str(&self.icons.join(" "));
            out.push(' ');
        }
        out.push_str(&self.heading);
        out.push('\n');
        for field in &self.fields {
            out.push_str(&format!("{}: {}\n", field.label, field.value));
        }
        match &self.body {
            CardBody::Items { items } => {
                for item in items {
                    out.push_str(&format!("- {item}\n"));
                }
            }
            CardBody::Paragraph { lines } => {
                for line in lines {
                    out.push_str(line);
                    out.push('\n');
                }
            }
            CardBody::Schedule {
                title,
                summary,
                entries,
            } => {
                out.push_str(&format!("{title}\n{summary}\n"));
                for entry in entries {
                    out.push_str(&format!(
                        "{}{}{}\n  {}\n",
                        entry.time, SCHEDULE_SEPARATOR, entry.title, entry.description
                    ));
                }
            }
        }
        out
    }
}

/// Render a matched record.
pub fn render_record(record: &Record, style: &CardStyle) -> RecommendationCard {
    let heading_names: Vec<&str> = match &style.heading_attributes {
        Some(names) => names.iter().map(String::as_str).collect(),
        None => record.attributes.keys().map(String::as_str).collect(),
    };
    let mut heading = heading_names
        .iter()
        .filter_map(|name| record.attribute(name))
        .map(|value| style.label_style.apply(value))
        .collect::<Vec<_>>()
        .join(HEADING_SEPARATOR);
    if let Some(suffix) = &style.heading_suffix {
        heading.push(' ');
        heading.push_str(suffix);
    }

    let icons = record
        .attributes
        .iter()
        .filter_map(|(name, value)| style.icons.glyph(name, value))
        .map(str::to_string)
        .collect();

    RecommendationCard {
        heading,
        icons,
        fields: Vec::new(),
        body: payload_body(&record.payload, &style.payload_style),
    }
}

/// Render the merged per-question advice of a form-schema match.
///
/// List items from every answer are concatenated in question order with
/// duplicates removed (first occurrence wins).
pub fn render_form(answers: &[FormAnswer<'_>], style: &CardStyle) -> RecommendationCard {
    let fields = answers
        .iter()
        .map(|answer| CardField {
            label: answer.question.label.clone(),
            value: answer.option.label.clone(),
        })
        .collect();
    let mut merged = IndexSet::new();
    for answer in answers {
        merged.extend(payload_lines(answer.payload, &style.payload_style));
    }
    let icons = answers
        .iter()
        .filter_map(|answer| style.icons.glyph(&answer.question.id, &answer.option.id))
        .map(str::to_string)
        .collect();
    RecommendationCard {
        heading: style.form_heading.clone(),
        icons,
        fields,
        body: CardBody::Items {
            items: merged.into_iter().collect(),
        },
    }
}

fn payload_body(payload: &Payload, style: &PayloadStyle) -> CardBody {
    match (payload, style) {
        (Payload::Plan(plan), _) => CardBody::Schedule {
            title: plan.title.clone(),
            summary: plan.summary.clone(),
            entries: plan.schedule.clone(),
        },
        (_, PayloadStyle::Paragraph) => CardBody::Paragraph {
            lines: payload_lines(payload, style),
        },
        (_, PayloadStyle::Bullets { .. }) => CardBody::Items {
            items: payload_lines(payload, style),
        },
    }
}

fn payload_lines(payload: &Payload, style: &PayloadStyle) -> Vec<String> {
    match payload {
        Payload::Text(text) => match style {
            PayloadStyle::Bullets { separator } => {
                text.split(separator.as_str()).map(str::to_string).collect()
            }
            PayloadStyle::Paragraph => text.split('\n').map(str::to_string).collect(),
        },
        Payload::Items(items) => items.clone(),
        Payload::Plan(plan) => plan
            .schedule
            .iter()
            .map(|entry| format!("{}{}{}", entry.time, SCHEDULE_SEPARATOR, entry.title))
            .collect(),
    }
}

/// `light_veggie` → `Light Veggie`.
pub fn format_option_label(raw: &str) -> String {
    let spaced = raw.replace('_', " ");
    let mut out = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for ch in spaced.chars() {
        if at_word_start && ch.is_alphanumeric() {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = !ch.is_alphanumeric();
    }
    out
}

/// Escape `&`, `<`, `>`, `"` and `'` for HTML text and attribute positions.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn icon_html(glyph: &str) -> String {
    if is_image_ref(glyph) {
        format!("<img src=\"{}\" alt=\"\">", escape_html(glyph))
    } else {
        escape_html(glyph)
    }
}

fn is_image_ref(glyph: &str) -> bool {
    let lower = glyph.to_ascii_lowercase();
    [".png", ".jpg", ".jpeg", ".svg", ".webp", ".gif"]
        .iter()
        .any(|ext| lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RoutePlan;
    use crate::source::{Question, QuestionOption};

    fn salina_record() -> Record {
        Record::new(
            [("category", "solo"), ("daytime", "evening")],
            Payload::Text("Night tour|Photography spot".to_string()),
        )
    }

    #[test]
    fn text_payload_splits_into_bullet_items() {
        let card = render_record(&salina_record(), &CardStyle::default());
        assert_eq!(card.heading, "solo • evening");
        assert_eq!(card.items(), ["Night tour", "Photography spot"]);
        assert!(card.icons.is_empty());
    }

    #[test]
    fn rendering_is_idempotent() {
        let record = salina_record();
        let style = CardStyle::default();
        assert_eq!(render_record(&record, &style), render_record(&record, &style));
    }

    #[test]
    fn paragraph_style_keeps_lines_and_suffix() {
        let record = Record::new(
            [("interests", "Art"), ("food", "Local"), ("budget", "Low")],
            Payload::Text("Museum\nCafe".to_string()),
        );
        let style = CardStyle {
            payload_style: PayloadStyle::Paragraph,
            heading_suffix: Some("route".to_string()),
            ..CardStyle::default()
        };
        let card = render_record(&record, &style);
        assert_eq!(card.heading, "Art • Local • Low route");
        assert_eq!(
            card.body,
            CardBody::Paragraph {
                lines: vec!["Museum".to_string(), "Cafe".to_string()]
            }
        );
        assert!(card.items().is_empty());
        assert!(card.to_html().contains("<p>Museum<br>Cafe</p>"));
    }

    #[test]
    fn icons_fall_back_per_attribute() {
        let style = CardStyle {
            icons: IconTable::new().with_attribute("category", [("family", "👪")], "⭐"),
            ..CardStyle::default()
        };
        let card = render_record(&salina_record(), &style);
        assert_eq!(card.icons, vec!["⭐".to_string()]);
    }

    #[test]
    fn plan_payload_renders_schedule() {
        let record = Record::new(
            [("interest", "light_veggie")],
            Payload::Plan(RoutePlan {
                title: "Green day".to_string(),
                summary: "Parks & salads".to_string(),
                schedule: vec![ScheduleItem {
                    time: "09:00".to_string(),
                    title: "Rose Park".to_string(),
                    description: "Walk <slowly>".to_string(),
                }],
            }),
        );
        let style = CardStyle {
            label_style: LabelStyle::Humanized,
            ..CardStyle::default()
        };
        let card = render_record(&record, &style);
        assert_eq!(card.heading, "Light Veggie");
        let html = card.to_html();
        assert!(html.contains("<em>Parks &amp; salads</em>"));
        assert!(html.contains("<strong>09:00 — Rose Park</strong><br>Walk &lt;slowly&gt;"));
        assert!(card.to_text().contains("09:00 — Rose Park"));
    }

    #[test]
    fn form_answers_merge_and_dedupe_items() {
        let interest = Question {
            id: "Interests".to_string(),
            label: "Interest".to_string(),
            options: vec![QuestionOption {
                id: "History".to_string(),
                label: "History".to_string(),
            }],
        };
        let duration = Question {
            id: "Tour Duration".to_string(),
            label: "Duration".to_string(),
            options: vec![QuestionOption {
                id: "Half day".to_string(),
                label: "Half day".to_string(),
            }],
        };
        let first = Payload::Items(vec!["Citadel".to_string(), "Museum".to_string()]);
        let second = Payload::Items(vec!["Citadel".to_string(), "Cafe".to_string()]);
        let answers = [
            FormAnswer {
                question: &interest,
                option: &interest.options[0],
                payload: &first,
            },
            FormAnswer {
                question: &duration,
                option: &duration.options[0],
                payload: &second,
            },
        ];
        let card = render_form(&answers, &CardStyle::default());
        assert_eq!(card.heading, FORM_CARD_HEADING);
        assert_eq!(card.items(), ["Citadel", "Museum", "Cafe"]);
        assert_eq!(card.fields[1].label, "Duration");
        assert!(card.to_html().contains("<p><strong>Interest:</strong> History</p>"));
    }

    #[test]
    fn option_labels_are_humanized() {
        assert_eq!(format_option_label("local_specialties"), "Local Specialties");
        assert_eq!(format_option_label("full_day"), "Full Day");
        assert_eq!(format_option_label("art"), "Art");
        assert_eq!(format_option_label(""), "");
    }

    #[test]
    fn image_glyphs_render_as_img_tags() {
        let card = RecommendationCard {
            heading: "Art".to_string(),
            icons: vec!["/assets/images/logo/art_route.png".to_string(), "🎨".to_string()],
            fields: Vec::new(),
            body: CardBody::Items { items: Vec::new() },
        };
        let html = card.to_html();
        assert!(html.contains("<img src=\"/assets/images/logo/art_route.png\" alt=\"\"> 🎨"));
    }
}
