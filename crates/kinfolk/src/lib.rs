//! Kinfolk - generation-aligned family charts
//!
//! This library loads a person table, positions every person on a chart
//! (one row per generation, couples side by side, parents centered over their
//! children) and renders the result to SVG.
//!
//! [`ChartBuilder`] drives the whole pipeline. The individual stages are
//! public for callers that need more control: [`layout::Engine`] for
//! positioning, [`structure::check`] for data sanity warnings and
//! [`details::PersonDetails`] for per-person summaries.

pub mod config;
pub mod details;
pub mod export;
pub mod layout;
pub mod structure;

mod error;
mod sample;

pub use kinfolk_core::{color, geometry, identifier, person, record, store};

pub use error::KinfolkError;

use log::{debug, info, warn};

use kinfolk_core::{identifier::PersonId, store::RelationshipStore};

use config::AppConfig;
use details::PersonDetails;
use export::{Exporter, svg::SvgBuilder};
use layout::{Engine, Layout};

/// Builder for loading, laying out and rendering family charts.
///
/// # Examples
///
/// ```
/// use kinfolk::{ChartBuilder, config::AppConfig};
///
/// let builder = ChartBuilder::new(AppConfig::default());
/// let store = builder
///     .load("ID,Name,generation,SpouseID,Parent1ID,Parent2ID\n\
///            1,John,1,2,,\n\
///            2,Mary,1,1,,\n\
///            3,Rob,2,,1,2\n")
///     .expect("valid table");
///
/// let layout = builder.layout(&store);
/// assert_eq!(layout.len(), 3);
///
/// let svg = builder.render_svg(&store).expect("renders");
/// assert!(svg.contains("Rob"));
/// ```
#[derive(Debug, Default)]
pub struct ChartBuilder {
    config: AppConfig,
}

impl ChartBuilder {
    /// Create a new chart builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parses CSV text into a store.
    ///
    /// Malformed rows are dropped by the store. Structure warnings are
    /// logged and never fail the load.
    ///
    /// # Errors
    ///
    /// Returns [`KinfolkError::Parse`] if the table as a whole is unusable.
    pub fn load(&self, source: &str) -> Result<RelationshipStore, KinfolkError> {
        self.load_bytes(source.as_bytes())
    }

    /// Like [`load`](Self::load), for raw bytes that may not be valid UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`KinfolkError::Parse`] if the table as a whole is unusable.
    pub fn load_bytes(&self, source: &[u8]) -> Result<RelationshipStore, KinfolkError> {
        info!(bytes = source.len(); "Parsing person table");
        let records = kinfolk_parser::parse_bytes(source).map_err(|err| {
            KinfolkError::new_parse_error(err, String::from_utf8_lossy(source).into_owned())
        })?;
        debug!(records = records.len(); "Table parsed");

        let mut store = RelationshipStore::new();
        let summary = store.load(records);
        debug!(
            accepted = summary.accepted,
            dropped = summary.dropped;
            "Store loaded"
        );

        for warning in structure::check(&store) {
            warn!(warning:% = warning; "Suspicious family structure");
        }
        Ok(store)
    }

    /// The built-in sample dataset.
    pub fn sample(&self) -> RelationshipStore {
        sample::sample_store()
    }

    /// Positions every reachable person in `store`.
    pub fn layout<'a>(&self, store: &'a RelationshipStore) -> Layout<'a> {
        let layout_config = self.config.layout();
        let layout = Engine::from_config(layout_config)
            .position_nodes(store, layout_config.canvas_width());
        for person in layout.unplaced() {
            warn!(id:% = person.id(), name = person.name(); "Person is not connected to any root");
        }
        layout
    }

    /// Lays out `store` and renders it to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`KinfolkError::Config`] for an unusable configuration and
    /// [`KinfolkError::Export`] if rendering fails.
    pub fn render_svg(&self, store: &RelationshipStore) -> Result<String, KinfolkError> {
        self.config.validate().map_err(KinfolkError::Config)?;

        let layout = self.layout(store);
        info!(people = layout.len(); "Layout calculated");

        let layout_config = self.config.layout();
        let mut exporter = SvgBuilder::new()
            .with_style(self.config.style())
            .with_margin(layout_config.margin())
            .with_min_height(layout_config.canvas_height())
            .build()?;

        let mut out = Vec::new();
        exporter.export_layout(&layout, &mut out)?;
        String::from_utf8(out).map_err(|err| KinfolkError::Export(err.to_string()))
    }

    /// Detail summary of the person with id `id`.
    pub fn details(
        &self,
        store: &RelationshipStore,
        id: PersonId,
        current_year: i32,
    ) -> Option<PersonDetails> {
        PersonDetails::collect(store, id, current_year)
    }
}
