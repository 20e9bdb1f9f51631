//! Events command - taxable events for a year, one row per stored record

use super::{InputArgs, YearArgs};
use clap::{Args, ValueEnum};
use imposta::text_report::{format_amount, format_rate};
use imposta::{TaxEvent, TaxEventType};
use std::io;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct EventsCommand {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    year: YearArgs,

    /// Owner recorded on every event
    #[arg(short, long)]
    user_id: String,

    /// Filter by event type
    #[arg(short = 't', long, value_enum)]
    event_type: Option<EventTypeFilter>,

    /// Output as CSV instead of formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EventTypeFilter {
    CapitalGain,
    Dividend,
    Interest,
}

impl EventTypeFilter {
    fn matches(self, event_type: TaxEventType) -> bool {
        matches!(
            (self, event_type),
            (EventTypeFilter::CapitalGain, TaxEventType::CapitalGain)
                | (EventTypeFilter::Dividend, TaxEventType::Dividend)
                | (EventTypeFilter::Interest, TaxEventType::Interest)
        )
    }
}

/// Row for the events table
#[derive(Debug, Clone, Tabled)]
pub struct EventRow {
    #[tabled(rename = "Date")]
    pub event_date: String,

    #[tabled(rename = "Type")]
    pub event_type: String,

    #[tabled(rename = "Holding")]
    pub holding_id: String,

    #[tabled(rename = "Taxable")]
    pub taxable_amount: String,

    #[tabled(rename = "Rate")]
    pub tax_rate: String,

    #[tabled(rename = "Tax")]
    pub tax_owed: String,

    #[tabled(rename = "Notes")]
    pub notes: String,
}

impl From<&TaxEvent> for EventRow {
    fn from(e: &TaxEvent) -> Self {
        EventRow {
            event_date: e.event_date.format("%Y-%m-%d").to_string(),
            event_type: e.event_type.display().to_string(),
            holding_id: e.holding_id.clone().unwrap_or_default(),
            taxable_amount: format_amount(e.taxable_amount),
            tax_rate: format!("{}%", format_rate(e.tax_rate)),
            tax_owed: format_amount(e.tax_owed),
            notes: e.notes.clone(),
        }
    }
}

impl EventsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = self.input.load()?;
        let events: Vec<TaxEvent> = input
            .generate_tax_events(&self.year.engine(), &self.user_id, self.year.year)?
            .into_iter()
            .filter(|e| self.event_type.is_none_or(|f| f.matches(e.event_type)))
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&events)?);
            return Ok(());
        }

        if self.csv {
            return self.write_csv(&events);
        }

        let rows: Vec<EventRow> = events.iter().map(EventRow::from).collect();
        self.print_table(&rows);
        Ok(())
    }

    fn print_table(&self, rows: &[EventRow]) {
        if rows.is_empty() {
            println!("No taxable events found for {}", self.year.year);
            return;
        }

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }

    /// Unrounded rows, ready to load into the events store
    fn write_csv(&self, events: &[TaxEvent]) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for event in events {
            wtr.serialize(event)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
