/// Constants used by the delimited-text parser and encoder.
pub mod csv {
    /// Field separator outside quoted spans.
    pub const FIELD_SEPARATOR: char = ',';
    /// Row separator after `\r\n` normalization.
    pub const ROW_SEPARATOR: char = '\n';
    /// Quote character opening and closing a quoted span.
    pub const QUOTE: char = '"';
}

/// Constants used when decoding JSON datasets.
pub mod source {
    /// Suffix of the leaf array field holding recommendation items (e.g. `alba_iulia_recommendations`).
    pub const RECOMMENDATIONS_SUFFIX: &str = "_recommendations";
    /// UTF-8 byte order mark dropped from the start of a dataset body.
    pub const BYTE_ORDER_MARK: char = '\u{feff}';
}

/// Constants used by card rendering.
pub mod render {
    /// Separator splitting a text payload into bullet items.
    pub const ITEM_SEPARATOR: &str = "|";
    /// Separator between heading parts.
    pub const HEADING_SEPARATOR: &str = " • ";
    /// Separator between a schedule entry's time and title.
    pub const SCHEDULE_SEPARATOR: &str = " — ";
    /// Glyph used when an icon table has no entry for the selected value.
    pub const DEFAULT_GLYPH: &str = "📍";
    /// Heading used for form-schema cards when the page does not set one.
    pub const FORM_CARD_HEADING: &str = "Your route";
}

/// Fixed user-facing messages shown by a page.
pub mod messages {
    /// Shown after the dataset failed to load.
    pub const LOAD_FAILED: &str = "Error loading route data.";
    /// Shown while the dataset is still loading.
    pub const STILL_LOADING: &str = "Routes are still loading...";
    /// Shown when not every attribute was chosen.
    pub const SELECTION_INCOMPLETE: &str = "Please select all fields.";
    /// Shown when no record matches the selection.
    pub const NO_MATCH: &str = "No recommendation for this combination.";
}

/// Constants used by page configuration.
pub mod config {
    /// Environment variable overriding the asset base (URL or directory).
    pub const ASSET_BASE_ENV: &str = "ROUTE_PLANNER_ASSET_BASE";
    /// Directory holding the bundled recommendation datasets.
    pub const RECOMMENDATIONS_DIR: &str = "/assets/recommendations";
    /// Contact relay endpoint path.
    pub const CONTACT_ENDPOINT: &str = "/api/send-email";
}
