// Markdown rendering for the generated reports: a small document builder
// plus one generator per analysis policy.

pub mod playoffs;
pub mod tank;

use crate::model::Team;

// ---------------------------------------------------------------------------
// Document builder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A markdown pipe table. Columns default to centered.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    alignments: Vec<Align>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new() -> Self {
        Table::default()
    }

    pub fn add_column(&mut self, name: &str, align: Align) {
        self.columns.push(name.to_string());
        self.alignments.push(align);
    }

    pub fn add_columns(&mut self, names: &[&str]) {
        for name in names {
            self.add_column(name, Align::Center);
        }
    }

    pub fn add_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    fn render(&self, out: &mut String) {
        out.push_str(&self.columns.join("|"));
        out.push('\n');

        let separators: Vec<&str> = self
            .alignments
            .iter()
            .map(|align| match align {
                Align::Center => ":---:",
                Align::Left => ":---",
                Align::Right => "---:",
            })
            .collect();
        out.push_str(&separators.join("|"));
        out.push('\n');

        for row in &self.rows {
            out.push_str(&row.join("|"));
            out.push('\n');
        }
        out.push('\n');
    }
}

#[derive(Debug, Clone)]
pub enum Element {
    Heading { level: usize, text: String },
    Paragraph(String),
    Quote(String),
    HorizontalRule,
    List { items: Vec<String>, numbered: bool },
    Table(Table),
}

impl Element {
    pub fn h1(text: impl Into<String>) -> Element {
        Element::Heading {
            level: 1,
            text: text.into(),
        }
    }

    pub fn h2(text: impl Into<String>) -> Element {
        Element::Heading {
            level: 2,
            text: text.into(),
        }
    }

    fn render(&self, out: &mut String) {
        match self {
            Element::Heading { level, text } => {
                for _ in 0..*level {
                    out.push('#');
                }
                out.push(' ');
                out.push_str(text);
                out.push('\n');
            }
            Element::Paragraph(text) => {
                out.push_str(text);
                out.push_str("\n\n");
            }
            Element::Quote(text) => {
                out.push_str("> ");
                out.push_str(text);
                out.push_str("\n\n");
            }
            Element::HorizontalRule => out.push_str("***\n"),
            Element::List { items, numbered } => {
                out.push('\n');
                for (idx, item) in items.iter().enumerate() {
                    if *numbered {
                        out.push_str(&format!("{}. ", idx + 1));
                    } else {
                        out.push_str("* ");
                    }
                    out.push_str(item);
                    out.push('\n');
                }
                out.push('\n');
            }
            Element::Table(table) => table.render(out),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    items: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    pub fn add(&mut self, element: Element) {
        self.items.push(element);
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for item in &self.items {
            item.render(&mut out);
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Shared formatting helpers
// ---------------------------------------------------------------------------

/// Team cell: subreddit flair link plus the short code, or just the code.
pub(crate) fn fmt_team(team: &Team) -> String {
    match &team.subreddit {
        Some(subreddit) => format!("[](/r/{}) {}", subreddit, team.code.to_uppercase()),
        None => team.code.to_uppercase(),
    }
}

pub(crate) fn fmt_vs(away: &Team, home: &Team) -> String {
    format!("{} at {}", fmt_team(away), fmt_team(home))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
