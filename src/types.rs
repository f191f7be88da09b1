/// Identifier for the page (and dataset) that produced a record.
/// Examples: `salina_turda`, `timisoara`
pub type SourceId = String;
/// Name of a record attribute / CSV column.
/// Examples: `category`, `daytime`, `trip_type`
pub type AttributeName = String;
/// Raw attribute value as authored in the dataset.
/// Examples: `family`, `evening`, `local_specialties`
pub type AttributeValue = String;
/// Identifier of a question in a form-schema dataset.
/// Examples: `interest`, `Tour Duration`
pub type QuestionId = String;
/// Identifier of an option within a form-schema question.
/// Examples: `history`, `Half day`
pub type OptionId = String;
/// Dataset location, either a URL or a static-asset path.
/// Examples: `/assets/recommendations/salina_turda_route_recommendations.csv`
pub type AssetPath = String;
/// Single field of a parsed CSV row.
pub type Cell = String;
/// Glyph or image reference shown next to a recommendation heading.
/// Examples: `🏰`, `../assets/images/logo/history_route.png`
pub type Glyph = String;
