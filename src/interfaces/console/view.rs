//! Front-end neutral view models plus a plain-text rendering

use std::fmt;

use super::banner::{Banner, Severity};

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell of the first row whose `column` equals `value`
    pub fn find(&self, column: &str, value: &str) -> Option<&Vec<String>> {
        let idx = self.headers.iter().position(|h| h == column)?;
        self.rows.iter().find(|row| row.get(idx).map(String::as_str) == Some(value))
    }

    pub fn column(&self, column: &str) -> Vec<&str> {
        match self.headers.iter().position(|h| h == column) {
            Some(idx) => self
                .rows
                .iter()
                .filter_map(|row| row.get(idx).map(String::as_str))
                .collect(),
            None => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Heading(String),
    Text(String),
    Notice { severity: Severity, message: String },
    Field { label: String, value: String },
    Counts(Vec<(String, usize)>),
    Table(Table),
    Loading,
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub title: String,
    pub banner: Option<Banner>,
    pub sections: Vec<Section>,
}

impl View {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            banner: None,
            sections: Vec::new(),
        }
    }

    /// Attach the banner if it has not expired yet
    pub fn with_banner(mut self, banner: Option<&Banner>) -> Self {
        self.banner = banner.filter(|b| b.is_visible()).cloned();
        self
    }

    pub fn heading(&mut self, text: impl Into<String>) {
        self.sections.push(Section::Heading(text.into()));
    }

    pub fn text(&mut self, text: impl Into<String>) {
        self.sections.push(Section::Text(text.into()));
    }

    pub fn notice(&mut self, severity: Severity, message: impl Into<String>) {
        self.sections.push(Section::Notice {
            severity,
            message: message.into(),
        });
    }

    pub fn field(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.sections.push(Section::Field {
            label: label.into(),
            value: value.into(),
        });
    }

    pub fn table(&mut self, table: Table) {
        self.sections.push(Section::Table(table));
    }

    pub fn loading(&mut self) {
        self.sections.push(Section::Loading);
    }

    pub fn is_loading(&self) -> bool {
        self.sections.contains(&Section::Loading)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.sections.iter().filter_map(|s| match s {
            Section::Table(t) => Some(t),
            _ => None,
        })
    }

    pub fn notices(&self) -> impl Iterator<Item = (Severity, &str)> {
        self.sections.iter().filter_map(|s| match s {
            Section::Notice { severity, message } => Some((*severity, message.as_str())),
            _ => None,
        })
    }

    /// Whether any text-bearing section contains `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.to_string().contains(needle)
    }
}

fn render_table(f: &mut fmt::Formatter<'_>, table: &Table) -> fmt::Result {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }
    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
    };
    writeln!(f, "{}", line(&table.headers).trim_end())?;
    writeln!(
        f,
        "{}",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ")
    )?;
    for row in &table.rows {
        writeln!(f, "{}", line(row).trim_end())?;
    }
    Ok(())
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        if let Some(banner) = &self.banner {
            writeln!(f, "{}", banner)?;
        }
        for section in &self.sections {
            match section {
                Section::Heading(text) => writeln!(f, "\n## {}", text)?,
                Section::Text(text) => writeln!(f, "{}", text)?,
                Section::Notice { severity, message } => {
                    writeln!(f, "({}) {}", severity.as_str(), message)?
                }
                Section::Field { label, value } => writeln!(f, "{}: {}", label, value)?,
                Section::Counts(counts) => {
                    for (label, count) in counts {
                        writeln!(f, "{:<14}{}", label, count)?;
                    }
                }
                Section::Table(table) => render_table(f, table)?,
                Section::Loading => writeln!(f, "Loading...")?,
            }
        }
        Ok(())
    }
}
