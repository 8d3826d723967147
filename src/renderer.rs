//! Fetch-parse-render pass

use crate::card::{Card, DisplayZone};
use crate::config::Config;
use crate::errors::{DashboardError, Result};
use crate::mount::Document;
use crate::source::{self, StatusSource};
use crate::status::{StatusCollection, StatusRecord};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Renders the status document into a container, one card per service
pub struct Renderer {
    source: Box<dyn StatusSource>,
    zone: DisplayZone,
    escape_markup: bool,
}

/// What a render pass appended
#[derive(Debug)]
pub struct RenderReport {
    pub pass_id: String,
    pub cards_appended: usize,
    pub alive: usize,
    pub dead: usize,
    /// The error that stopped the pass, if any
    pub failure: Option<DashboardError>,
}

impl RenderReport {
    fn new() -> Self {
        Self {
            pass_id: Uuid::new_v4().to_string(),
            cards_appended: 0,
            alive: 0,
            dead: 0,
            failure: None,
        }
    }

    fn record(&mut self, card: &Card) {
        self.cards_appended += 1;
        if card.is_up {
            self.alive += 1;
        } else {
            self.dead += 1;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

impl Renderer {
    pub fn new(source: Box<dyn StatusSource>, zone: DisplayZone) -> Self {
        Self {
            source,
            zone,
            escape_markup: false,
        }
    }

    pub fn with_escaped_markup(mut self, escape: bool) -> Self {
        self.escape_markup = escape;
        self
    }

    /// Build from an already validated configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = source::from_location(&config.source, config.http_timeout())?;
        let zone = config.display_zone().map_err(DashboardError::Config)?;

        Ok(Self::new(source, zone).with_escaped_markup(config.escape_markup))
    }

    /// Render every record, stopping at the first error.
    ///
    /// Cards appended before a failure stay in the container.
    pub async fn render(&self, container_id: &str, document: &mut dyn Document) -> Result<RenderReport> {
        let mut report = RenderReport::new();
        self.render_into(container_id, document, &mut report).await?;
        Ok(report)
    }

    /// Render once and log any failure instead of returning it
    pub async fn run(&self, container_id: &str, document: &mut dyn Document) -> RenderReport {
        let mut report = RenderReport::new();

        match self.render_into(container_id, document, &mut report).await {
            Ok(()) => {
                info!(
                    pass_id = %report.pass_id,
                    "Rendered {} cards ({} alive, {} dead) from {}",
                    report.cards_appended,
                    report.alive,
                    report.dead,
                    self.source.location()
                );
            }
            Err(e) => {
                error!(
                    pass_id = %report.pass_id,
                    kind = e.kind(),
                    cards_appended = report.cards_appended,
                    "Failed to fetch and render data: {}",
                    e
                );
                report.failure = Some(e);
            }
        }

        report
    }

    #[instrument(skip(self, document, report), fields(pass_id = %report.pass_id))]
    async fn render_into(
        &self,
        container_id: &str,
        document: &mut dyn Document,
        report: &mut RenderReport,
    ) -> Result<()> {
        let body = self.source.fetch().await?;
        let collection = StatusCollection::from_slice(&body)?;

        debug!(
            "Fetched {} records from {}",
            collection.len(),
            self.source.location()
        );

        let container = document.locate(container_id)?;

        for (service_id, raw) in collection.iter() {
            let record = StatusRecord::from_value(service_id, raw)?;
            let card = Card::from_record(service_id, &record, &self.zone)?;

            container.append_child(card.to_html(self.escape_markup));
            report.record(&card);

            debug!("Appended card for {} ({})", service_id, card.status);
        }

        Ok(())
    }
}
