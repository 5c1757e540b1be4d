//! Parse `profiles.md`: agronomy notes and sowing windows per crop.
//!
//! Uses pulldown-cmark to walk the markdown AST. Each H2 heading names a crop
//! and starts a new profile. Paragraphs below it become the agronomy text and
//! the first table becomes the sowing rows:
//!
//! ```markdown
//! ## Wheat
//! Cool-season cereal; ideal temp 15–25°C.
//!
//! | Region | Season | Window |
//! |--------|--------|--------|
//! | Punjab/Haryana/UP | Rabi | Nov–Dec |
//! ```
//!
//! Column order is taken from the header row (`State` is accepted for
//! `Region`); rows with missing cells are skipped.

use std::path::Path;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::loader::error::{read_optional, LoadError};
use crate::model::{CropName, CropProfile, ProfileTable, SowingWindow};

pub const FILE_NAME: &str = "profiles.md";

/// Load profiles from a farm data directory. A missing file is an empty table.
pub fn parse_profiles(data_dir: &Path) -> Result<ProfileTable, LoadError> {
    let path = data_dir.join(FILE_NAME);
    Ok(read_optional(&path)?
        .map(|content| parse_profiles_content(&content))
        .unwrap_or_default())
}

/// Where text events are currently going.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Sink {
    Nothing,
    Heading,
    Paragraph,
    Cell,
}

/// Column positions of the sowing table.
#[derive(Debug, Clone, Copy)]
struct Columns {
    region: usize,
    season: usize,
    window: usize,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            region: 0,
            season: 1,
            window: 2,
        }
    }
}

impl Columns {
    fn from_header(header: &[String]) -> Self {
        let find = |names: &[&str]| {
            header
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };
        let defaults = Self::default();
        Self {
            region: find(&["region", "state"]).unwrap_or(defaults.region),
            season: find(&["season"]).unwrap_or(defaults.season),
            window: find(&["window", "sowing window"]).unwrap_or(defaults.window),
        }
    }

    fn row(&self, cells: &[String]) -> Option<SowingWindow> {
        let get = |i: usize| cells.get(i).map(|c| c.trim()).filter(|c| !c.is_empty());
        Some(SowingWindow::new(
            get(self.region)?,
            get(self.season)?,
            get(self.window)?,
        ))
    }
}

/// Parse the raw markdown of profiles.md into a table keyed by crop name.
/// This is the core logic, separated for testability.
pub fn parse_profiles_content(content: &str) -> ProfileTable {
    let parser = Parser::new_ext(content, Options::ENABLE_TABLES);

    let mut table = ProfileTable::new();
    let mut current: Option<(CropName, CropProfile)> = None;
    let mut sink = Sink::Nothing;
    let mut heading_text = String::new();
    let mut paragraph = String::new();
    let mut cell = String::new();
    let mut row: Vec<String> = Vec::new();
    let mut columns = Columns::default();
    let mut table_done = false;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                if level == HeadingLevel::H2 {
                    flush_profile(&mut table, current.take());
                    heading_text.clear();
                    sink = Sink::Heading;
                } else {
                    sink = Sink::Nothing;
                }
            }
            Event::End(TagEnd::Heading(HeadingLevel::H2)) => {
                let name = heading_text.trim();
                if !name.is_empty() {
                    current = Some((CropName::new(name), CropProfile::default()));
                    table_done = false;
                }
                sink = Sink::Nothing;
            }

            Event::Start(Tag::Paragraph) if current.is_some() && sink != Sink::Cell => {
                paragraph.clear();
                sink = Sink::Paragraph;
            }
            Event::End(TagEnd::Paragraph) if sink == Sink::Paragraph => {
                if let Some((_, profile)) = current.as_mut() {
                    let text = paragraph.trim();
                    if !text.is_empty() {
                        if !profile.agronomy.is_empty() {
                            profile.agronomy.push(' ');
                        }
                        profile.agronomy.push_str(text);
                    }
                }
                sink = Sink::Nothing;
            }

            Event::Start(Tag::Table(_)) => {
                columns = Columns::default();
            }
            Event::Start(Tag::TableHead) | Event::Start(Tag::TableRow) => {
                row.clear();
            }
            Event::Start(Tag::TableCell) => {
                cell.clear();
                sink = Sink::Cell;
            }
            Event::End(TagEnd::TableCell) => {
                row.push(std::mem::take(&mut cell));
                sink = Sink::Nothing;
            }
            Event::End(TagEnd::TableHead) => {
                columns = Columns::from_header(&row);
            }
            Event::End(TagEnd::TableRow) => {
                if let Some((_, profile)) = current.as_mut() {
                    if !table_done {
                        if let Some(window) = columns.row(&row) {
                            profile.sowing.push(window);
                        }
                    }
                }
            }
            Event::End(TagEnd::Table) => {
                // Only the first table under a heading holds sowing rows.
                table_done = current.is_some();
            }

            Event::Text(text) | Event::Code(text) => match sink {
                Sink::Heading => heading_text.push_str(&text),
                Sink::Paragraph => paragraph.push_str(&text),
                Sink::Cell => cell.push_str(&text),
                Sink::Nothing => {}
            },
            Event::SoftBreak | Event::HardBreak => match sink {
                Sink::Heading => heading_text.push(' '),
                Sink::Paragraph => paragraph.push(' '),
                Sink::Cell => cell.push(' '),
                Sink::Nothing => {}
            },

            _ => {}
        }
    }

    flush_profile(&mut table, current);
    table
}

fn flush_profile(table: &mut ProfileTable, entry: Option<(CropName, CropProfile)>) {
    if let Some((name, profile)) = entry {
        if table.contains_key(name.as_str()) {
            tracing::warn!(crop = name.as_str(), "duplicate profile, keeping the later one");
        }
        table.insert(name, profile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_profile() {
        let md = r#"# Crop Profiles

## Wheat
Cool-season cereal; ideal temp 15–25°C.

| Region | Season | Window |
|--------|--------|--------|
| Punjab/Haryana/UP | Rabi | Nov–Dec |
"#;
        let table = parse_profiles_content(md);
        assert_eq!(table.len(), 1);
        let wheat = &table["Wheat"];
        assert_eq!(wheat.agronomy, "Cool-season cereal; ideal temp 15–25°C.");
        assert_eq!(
            wheat.sowing,
            vec![SowingWindow::new("Punjab/Haryana/UP", "Rabi", "Nov–Dec")]
        );
    }

    #[test]
    fn test_multiple_paragraphs_are_joined() {
        let md = "## Rice\nWarm-season cereal.\n\nPrefers **puddled** fields.\n";
        let table = parse_profiles_content(md);
        assert_eq!(
            table["Rice"].agronomy,
            "Warm-season cereal. Prefers puddled fields."
        );
        assert!(table["Rice"].sowing.is_empty());
    }

    #[test]
    fn test_header_order_and_state_alias() {
        let md = r#"## Tomato
| Window | State | Season |
|---|---|---|
| Oct–Nov | Maharashtra | Rabi |
| | Karnataka | Kharif |
"#;
        let table = parse_profiles_content(md);
        // Second row has an empty window and is skipped
        assert_eq!(
            table["Tomato"].sowing,
            vec![SowingWindow::new("Maharashtra", "Rabi", "Oct–Nov")]
        );
    }

    #[test]
    fn test_text_before_first_heading_is_ignored() {
        let md = "Intro paragraph.\n\n## Onion\nShallow roots.\n";
        let table = parse_profiles_content(md);
        assert_eq!(table.len(), 1);
        assert_eq!(table["Onion"].agronomy, "Shallow roots.");
    }

    #[test]
    fn test_h3_does_not_start_profile() {
        let md = "## Cotton\nDeep black soils.\n\n### Notes\nBollworm watch.\n";
        let table = parse_profiles_content(md);
        assert_eq!(table.len(), 1);
        assert_eq!(table["Cotton"].agronomy, "Deep black soils. Bollworm watch.");
    }

    #[test]
    fn test_empty_content() {
        assert!(parse_profiles_content("").is_empty());
    }
}
