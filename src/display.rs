/// Display collaborators for saved entries
///
/// The list controller hands records here. Output is plain text or JSON;
/// no layout is attempted.

use std::io::{self, Write};

use crate::controller::list::DISPLAY_COLUMNS;
use crate::state::data::SurveyRecord;
use crate::state::schema;

/// Receives the loaded entries, or the empty state
pub trait RecordDisplay {
    fn show(&mut self, records: &[SurveyRecord]) -> io::Result<()>;
    fn show_empty(&mut self) -> io::Result<()>;
}

/// Value of a mapped display column
fn column_value<'r>(record: &'r SurveyRecord, column: &str) -> &'r str {
    match column {
        schema::COLUMN_SITE_NAME => &record.site_name,
        schema::COLUMN_DATE => &record.date,
        schema::COLUMN_COORDINATES => &record.coordinates,
        schema::COLUMN_DESCRIPTION => &record.description,
        schema::COLUMN_TERRAIN_TYPE => &record.terrain_type,
        schema::COLUMN_OBSERVATIONS => &record.observations,
        schema::COLUMN_CONDITION => record.condition.as_str(),
        _ => "",
    }
}

/// One block per entry, one line per column
pub struct TextDisplay<W: Write> {
    out: W,
}

impl<W: Write> TextDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RecordDisplay for TextDisplay<W> {
    fn show(&mut self, records: &[SurveyRecord]) -> io::Result<()> {
        for (i, record) in records.iter().enumerate() {
            if i > 0 {
                writeln!(self.out)?;
            }
            writeln!(self.out, "[{} {}]", schema::ROW_ID_ALIAS, record.id)?;
            for column in DISPLAY_COLUMNS {
                let value = column_value(record, column);
                // Multi-line values (coordinates) are indented under their label
                let mut lines = value.lines();
                writeln!(self.out, "  {:<13} {}", column, lines.next().unwrap_or(""))?;
                for line in lines {
                    writeln!(self.out, "  {:<13} {}", "", line)?;
                }
            }
        }
        self.out.flush()
    }

    fn show_empty(&mut self) -> io::Result<()> {
        writeln!(self.out, "No entries found.")?;
        self.out.flush()
    }
}

/// Pretty JSON array of entries
pub struct JsonDisplay<W: Write> {
    out: W,
}

impl<W: Write> JsonDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RecordDisplay for JsonDisplay<W> {
    fn show(&mut self, records: &[SurveyRecord]) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.out, records)?;
        writeln!(self.out)?;
        self.out.flush()
    }

    fn show_empty(&mut self) -> io::Result<()> {
        writeln!(self.out, "[]")?;
        self.out.flush()
    }
}
