use crate::classify::Partition;
use crate::error::Result;
use crate::index::Inventory;
use crate::util::format::format_gib;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Color, Table};
use console::style;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReclaimableEntry {
    pub hash: String,
    pub name: String,
    pub category: Option<String>,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub retained: usize,
    pub reclaimable: usize,
    pub indeterminate: usize,
    pub excluded: usize,
    pub files_scanned: usize,
    pub inaccessible_files: usize,
    pub unique_identities: usize,
    pub total_reclaimable_bytes: u64,
    /// Largest first.
    pub entries: Vec<ReclaimableEntry>,
}

impl Summary {
    pub fn build(partition: &Partition<'_>, inventory: &Inventory) -> Self {
        let mut entries: Vec<ReclaimableEntry> = partition
            .reclaimable
            .iter()
            .map(|item| ReclaimableEntry {
                hash: item.hash.clone(),
                name: item.name.clone(),
                category: (!item.category.is_empty()).then(|| item.category.clone()),
                size: item.size,
            })
            .collect();
        entries.sort_unstable_by(|a, b| b.size.cmp(&a.size));

        let total_reclaimable_bytes = entries.iter().map(|e| e.size).sum();

        Self {
            retained: partition.retained.len(),
            reclaimable: partition.reclaimable.len(),
            indeterminate: partition.indeterminate.len(),
            excluded: partition.excluded,
            files_scanned: inventory.files_scanned,
            inaccessible_files: inventory.inaccessible,
            unique_identities: inventory.unique_identities(),
            total_reclaimable_bytes,
            entries,
        }
    }

    /// Hashes of the reclaimable items, in report order.
    pub fn reclaimable_hashes(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.hash.clone()).collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render(&self) -> String {
        let rule = style("═".repeat(60)).dim().to_string();
        let mut lines = vec![
            rule.clone(),
            format!(
                "  Externally linked (KEEP):        {}",
                style(self.retained).green()
            ),
            format!(
                "  Cross-seed only (REMOVABLE):     {}",
                style(self.reclaimable).yellow()
            ),
            format!(
                "  No accessible files (SKIPPED):   {}",
                style(self.indeterminate).dim()
            ),
            format!("  Excluded by policy:              {}", self.excluded),
            rule,
        ];

        if self.entries.is_empty() {
            lines.push(format!(
                "\n{}",
                style("All torrents with files are externally linked. Nothing to tag.").green()
            ));
        } else {
            lines.push(format!(
                "\n{}",
                style("Removable torrents (no external hardlinks)").bold()
            ));
            lines.push(self.entries_table().to_string());
            lines.push(format!(
                "\n  Total reclaimable: {}",
                style(format_gib(self.total_reclaimable_bytes)).bold()
            ));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn entries_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("Size").fg(Color::Cyan),
            Cell::new("Category").fg(Color::Cyan),
            Cell::new("Name").fg(Color::Cyan),
        ]);

        for entry in &self.entries {
            let category = entry
                .category
                .as_deref()
                .map(|c| format!("[{}]", c))
                .unwrap_or_default();
            table.add_row(vec![
                Cell::new(format_gib(entry.size)).set_alignment(CellAlignment::Right),
                Cell::new(category),
                Cell::new(&entry.name),
            ]);
        }

        table
    }
}
