use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};

pub type Cell = Option<String>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Append a row, padding with blanks or truncating to the table width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.width(), None);
        self.rows.push(row);
    }

    pub fn extend_rows(&mut self, other: Table) {
        for row in other.rows {
            self.push_row(row);
        }
    }
}

pub fn unnamed(position: usize) -> String {
    format!("Unnamed: {position}")
}

/// Make header names unique: the second `x` becomes `x.1`, the third `x.2`,
/// skipping any suffixed name that is already taken. Blank names become
/// `Unnamed: <position>` first. Applying it to unique names is a no-op.
pub fn dedup_headers<I>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let named = headers
        .into_iter()
        .enumerate()
        .map(|(idx, h)| {
            let trimmed = h.trim();
            if trimmed.is_empty() {
                unnamed(idx)
            } else {
                trimmed.to_string()
            }
        })
        .collect::<Vec<_>>();

    let mut used: HashSet<String> = HashSet::new();
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(named.len());
    for name in named {
        if used.insert(name.clone()) {
            out.push(name);
            continue;
        }
        let mut k = next_suffix.get(&name).copied().unwrap_or(1);
        let mut candidate = format!("{name}.{k}");
        while used.contains(&candidate) {
            k += 1;
            candidate = format!("{name}.{k}");
        }
        next_suffix.insert(name, k + 1);
        used.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

pub fn read_csv(path: &Path) -> Result<Table> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    read_csv_from(file).with_context(|| format!("read csv {}", path.display()))
}

pub fn read_csv_from<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr
        .headers()
        .context("read csv header row")?
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    let mut table = Table::new(dedup_headers(headers));
    for (idx, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("read csv record {}", idx + 1))?;
        // Short records are padded by push_row.
        if record.len() > table.width() {
            bail!(
                "csv record {} has {} fields, header has {}",
                idx + 1,
                record.len(),
                table.width()
            );
        }
        let row = record
            .iter()
            .map(|cell| {
                let trimmed = cell.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .collect::<Vec<_>>();
        table.push_row(row);
    }
    Ok(table)
}

pub fn write_csv(path: &Path, table: &Table) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).ok();
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_csv_to(file, table).with_context(|| format!("write csv {}", path.display()))
}

pub fn write_csv_to<W: Write>(writer: W, table: &Table) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&table.headers)
        .context("write csv header row")?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))
            .context("write csv record")?;
    }
    wtr.flush().context("flush csv writer")?;
    Ok(())
}
