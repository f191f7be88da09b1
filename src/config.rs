use indexmap::IndexMap;
use std::collections::HashSet;

use crate::constants::config::{ASSET_BASE_ENV, RECOMMENDATIONS_DIR};
use crate::constants::messages;
use crate::csv::CsvTable;
use crate::data::{Payload, Record};
use crate::errors::RouteError;
use crate::render::{CardStyle, IconTable, LabelStyle, PayloadStyle};
use crate::source::DatasetFormat;
use crate::types::{AssetPath, AttributeName, Cell, SourceId};

/// Canonical attribute name plus the alternative column names it may be read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeSpec {
    /// Name used in records, selections, and domains.
    pub name: AttributeName,
    /// Fallback column names tried in order when `name` is absent or blank.
    pub aliases: Vec<AttributeName>,
}

impl AttributeSpec {
    /// Spec reading only the column `name`.
    pub fn new(name: impl Into<AttributeName>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    /// Add a fallback column name.
    pub fn with_alias(mut self, alias: impl Into<AttributeName>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// First non-empty value among `name` and its aliases.
    fn pick<'a>(&self, row: &'a IndexMap<AttributeName, Cell>) -> Option<&'a str> {
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .filter_map(|column| row.get(column))
            .map(String::as_str)
            .find(|value| !value.is_empty())
    }
}

impl From<&str> for AttributeSpec {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Which columns of a tabular dataset are selectors and which one holds the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordLayout {
    /// Selector attributes in page order.
    pub selectors: Vec<AttributeSpec>,
    /// Column holding the recommendation text.
    pub payload: AttributeSpec,
}

impl RecordLayout {
    /// Create a layout from selector specs and a payload column.
    pub fn new<S, I>(selectors: I, payload: impl Into<AttributeSpec>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<AttributeSpec>,
    {
        Self {
            selectors: selectors.into_iter().map(Into::into).collect(),
            payload: payload.into(),
        }
    }

    /// Canonical selector names in page order.
    pub fn selector_names(&self) -> Vec<AttributeName> {
        self.selectors.iter().map(|spec| spec.name.clone()).collect()
    }

    /// Reject layouts without selectors or with clashing names.
    pub fn validate(&self) -> Result<(), RouteError> {
        if self.selectors.is_empty() {
            return Err(RouteError::Configuration(
                "record layout needs at least one selector attribute".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for name in self
            .selectors
            .iter()
            .map(|spec| &spec.name)
            .chain(std::iter::once(&self.payload.name))
        {
            if name.trim().is_empty() {
                return Err(RouteError::Configuration(
                    "record layout contains a blank attribute name".to_string(),
                ));
            }
            if !seen.insert(name) {
                return Err(RouteError::Configuration(format!(
                    "record layout names attribute '{name}' more than once"
                )));
            }
        }
        Ok(())
    }

    /// Build a record from a header-keyed row, or `None` when a required column is blank.
    pub fn record_from_row(&self, row: &IndexMap<AttributeName, Cell>) -> Option<Record> {
        let mut attributes = Vec::with_capacity(self.selectors.len());
        for spec in &self.selectors {
            attributes.push((spec.name.clone(), spec.pick(row)?.to_string()));
        }
        let payload = self.payload.pick(row)?;
        Some(Record::new(attributes, Payload::Text(payload.to_string())))
    }

    /// Records for every complete row of `table`, in table order.
    pub fn records_from_table(&self, table: &CsvTable) -> Vec<Record> {
        table
            .to_maps()
            .iter()
            .filter_map(|row| self.record_from_row(row))
            .collect()
    }
}

/// Fixed user-facing strings shown by a page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageMessages {
    /// Shown after the dataset failed to load.
    pub load_failed: String,
    /// Shown while the dataset is still loading.
    pub still_loading: String,
    /// Shown when a selector has no value.
    pub selection_incomplete: String,
    /// Shown when no recommendation matches.
    pub no_match: String,
}

impl Default for PageMessages {
    fn default() -> Self {
        Self {
            load_failed: messages::LOAD_FAILED.to_string(),
            still_loading: messages::STILL_LOADING.to_string(),
            selection_incomplete: messages::SELECTION_INCOMPLETE.to_string(),
            no_match: messages::NO_MATCH.to_string(),
        }
    }
}

/// Everything a route-planner page needs: where its dataset lives, how to read it,
/// and how to present matches.
#[derive(Clone, Debug)]
pub struct PageConfig {
    /// Stable page identifier used in records and logs.
    pub page_id: SourceId,
    /// Dataset location (static-asset path or absolute URL).
    pub dataset: AssetPath,
    /// Decoding applied to the fetched body.
    pub format: DatasetFormat,
    /// Selector/payload mapping for tabular and nested formats.
    pub layout: RecordLayout,
    /// Card presentation.
    pub card: CardStyle,
    /// User-facing messages.
    pub messages: PageMessages,
}

impl PageConfig {
    /// Create a config with explicit id, dataset location, format, and layout.
    pub fn new(
        page_id: impl Into<SourceId>,
        dataset: impl Into<AssetPath>,
        format: DatasetFormat,
        layout: RecordLayout,
    ) -> Self {
        Self {
            page_id: page_id.into(),
            dataset: dataset.into(),
            format,
            layout,
            card: CardStyle::default(),
            messages: PageMessages::default(),
        }
    }

    /// Override the dataset location.
    pub fn with_dataset(mut self, dataset: impl Into<AssetPath>) -> Self {
        self.dataset = dataset.into();
        self
    }

    /// Override card presentation.
    pub fn with_card_style(mut self, card: CardStyle) -> Self {
        self.card = card;
        self
    }

    /// Override user-facing messages.
    pub fn with_messages(mut self, messages: PageMessages) -> Self {
        self.messages = messages;
        self
    }

    /// Check the config before any load is attempted.
    pub fn validate(&self) -> Result<(), RouteError> {
        if self.page_id.trim().is_empty() {
            return Err(RouteError::Configuration("page id must not be blank".to_string()));
        }
        if self.dataset.trim().is_empty() {
            return Err(RouteError::Configuration(format!(
                "page '{}' has no dataset location",
                self.page_id
            )));
        }
        if self.format.uses_record_layout() {
            self.layout.validate()?;
        }
        Ok(())
    }

    /// Salina Turda: visitor category and time of day, `|`-separated bullet items.
    pub fn salina_turda() -> Self {
        Self::new(
            "salina_turda",
            recommendations_path("salina_turda_route_recommendations.csv"),
            DatasetFormat::Csv,
            RecordLayout::new(["category", "daytime"], "recommendation"),
        )
    }

    /// Timisoara (CSV): trip type, interests, food, budget; multi-line paragraph payload
    /// with an interest logo.
    pub fn timisoara_csv() -> Self {
        let logo = |name: &str| format!("/assets/images/logo/{name}_route.png");
        let icons = IconTable::new().with_attribute(
            "interests",
            [
                ("History", logo("history")),
                ("Art", logo("art")),
                ("Nature", logo("nature")),
                ("Nightlife", logo("nightlife")),
            ],
            logo("history"),
        );
        let layout = RecordLayout::new(
            [
                AttributeSpec::new("trip_type").with_alias("tripType"),
                AttributeSpec::new("interests").with_alias("interest"),
                AttributeSpec::new("food"),
                AttributeSpec::new("budget"),
            ],
            "recommendation",
        );
        Self::new(
            "timisoara",
            recommendations_path("timisoara_route_recommendations.csv"),
            DatasetFormat::Csv,
            layout,
        )
        .with_card_style(CardStyle {
            payload_style: PayloadStyle::Paragraph,
            icons,
            heading_attributes: Some(vec![
                "interests".to_string(),
                "food".to_string(),
                "budget".to_string(),
            ]),
            heading_suffix: Some("route".to_string()),
            ..CardStyle::default()
        })
    }

    /// Timisoara (JSON): nested duration → interest → food → budget mapping with
    /// structured schedules and per-attribute emoji.
    pub fn timisoara_json() -> Self {
        let icons = IconTable::new()
            .with_attribute(
                "trip_type",
                [("full_day", "🕒"), ("half_day", "⏱️"), ("evening", "🌙")],
                crate::constants::render::DEFAULT_GLYPH,
            )
            .with_attribute(
                "interest",
                [
                    ("history", "🏰"),
                    ("art", "🎨"),
                    ("nature", "🌿"),
                    ("nightlife", "🍸"),
                ],
                crate::constants::render::DEFAULT_GLYPH,
            )
            .with_attribute(
                "food",
                [
                    ("local_specialties", "🍲"),
                    ("light_veggie", "🥗"),
                    ("try_everything", "🍽️"),
                ],
                crate::constants::render::DEFAULT_GLYPH,
            )
            .with_attribute(
                "budget",
                [("low", "💸"), ("medium", "💶"), ("high", "💎")],
                crate::constants::render::DEFAULT_GLYPH,
            );
        Self::new(
            "timisoara",
            recommendations_path("timisoara_route_recommendations.json"),
            DatasetFormat::NestedJson,
            RecordLayout::new(["trip_type", "interest", "food", "budget"], "recommendation"),
        )
        .with_card_style(CardStyle {
            label_style: LabelStyle::Humanized,
            icons,
            heading_attributes: Some(vec![
                "interest".to_string(),
                "food".to_string(),
                "budget".to_string(),
            ]),
            ..CardStyle::default()
        })
    }

    /// Alba Iulia: one option per dimension, merged and de-duplicated advice lists.
    pub fn alba_iulia() -> Self {
        Self::new(
            "alba_iulia",
            recommendations_path("alba_lulia_route_recommendations.json"),
            DatasetFormat::DimensionCatalog,
            RecordLayout::new(Vec::<AttributeSpec>::new(), "recommendation"),
        )
        .with_card_style(CardStyle {
            form_heading: "Your Alba Iulia Route".to_string(),
            ..CardStyle::default()
        })
    }

    /// Every built-in page preset.
    pub fn presets() -> Vec<PageConfig> {
        vec![
            Self::salina_turda(),
            Self::timisoara_csv(),
            Self::timisoara_json(),
            Self::alba_iulia(),
        ]
    }
}

fn recommendations_path(file_name: &str) -> AssetPath {
    format!("{RECOMMENDATIONS_DIR}/{file_name}")
}

/// Asset base from `ROUTE_PLANNER_ASSET_BASE`, ignoring blank values.
pub fn asset_base_from_env() -> Option<String> {
    std::env::var(ASSET_BASE_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
