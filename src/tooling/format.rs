//! Format mappings, resolutions, leaf paths and trees as text.

use crate::extract::LeafPath;
use crate::mapping::table::{MatchKind, Resolution};
use crate::mapping::{Level, PathLevels, PathMapping};
use crate::tree::state::stringify_value;
use crate::tree::{FlatTreeNode, TreeNode};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn table_with_header(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(header);
    table
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// Format extracted leaf paths with their values.
pub fn format_leaf_paths_text(leaves: &[LeafPath<'_>]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Leaf paths")));
    if leaves.is_empty() {
        out.push_str("No leaf paths.\n");
        return out;
    }
    let mut table = table_with_header(vec!["Path", "Value"]);
    for leaf in leaves {
        table.add_row(vec![
            leaf.joined(),
            truncate(&stringify_value(leaf.value), 60),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));
    out.push_str(&format!("Total: {}\n", leaves.len()));
    out
}

fn match_label(matched: &MatchKind) -> String {
    match matched {
        MatchKind::Exact { mapping_id } => format!("exact (#{})", mapping_id),
        MatchKind::Prefix { mapping_id, prefix } => format!("prefix {} (#{})", prefix, mapping_id),
        MatchKind::Unmapped => "unmapped".to_string(),
    }
}

/// Format raw-to-transformed resolutions.
pub fn format_resolutions_text(resolutions: &[Resolution]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Resolved paths")));
    let mut table = table_with_header(vec!["Raw path", "Transformed path", "Match"]);
    for r in resolutions {
        table.add_row(vec![
            r.raw_path.clone(),
            r.transformed_path.clone(),
            match_label(&r.matched),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

/// Format the five levels of a path.
pub fn format_levels_text(path: &str, levels: &PathLevels) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Path levels")));
    out.push_str(&format!("  Path: {}\n\n", path));
    let mut table = table_with_header(vec!["Level", "Value"]);
    for level in Level::ALL {
        table.add_row(vec![level.to_string(), levels.get(level).to_string()]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

/// Format the mapping table.
pub fn format_mappings_text(mappings: &[PathMapping]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Mappings")));
    if mappings.is_empty() {
        out.push_str("No mappings defined.\n");
        return out;
    }
    let mut table = table_with_header(vec!["ID", "Raw path", "Transformed path", "Type", "Description"]);
    for m in mappings {
        table.add_row(vec![
            m.id.to_string(),
            m.raw_path.clone(),
            m.transformed_path.clone(),
            m.data_type.clone().unwrap_or_else(|| "-".to_string()),
            m.description
                .as_deref()
                .map(|d| truncate(d, 40))
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));
    out.push_str(&format!("Total: {}\n", mappings.len()));
    out
}

/// Format distinct values of one level.
pub fn format_unique_values_text(level: Level, values: &[String]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format!("Distinct {} values", level))
    ));
    if values.is_empty() {
        out.push_str("No values.\n");
        return out;
    }
    for value in values {
        out.push_str(&format!("  {}\n", value));
    }
    out
}

/// Format the outcome of an add or update.
pub fn format_mapping_change_text(action: &str, mapping: &PathMapping, saved_to: Option<&str>) -> String {
    let mut out = format!(
        "{} mapping #{}: {} -> {}\n",
        action, mapping.id, mapping.raw_path, mapping.transformed_path
    );
    if let Some(path) = saved_to {
        out.push_str(&format!("Saved to {}\n", path));
    }
    out
}

/// Format a tree as an indented outline.
pub fn format_tree_text(roots: &[TreeNode]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Tree")));
    if roots.is_empty() {
        out.push_str("Empty tree.\n");
        return out;
    }
    let mut nodes = 0usize;
    for root in roots {
        root.walk(&mut |node: &TreeNode| {
            nodes += 1;
            let indent = "  ".repeat(node.level + 1);
            if node.is_file() {
                let value = node
                    .value
                    .as_ref()
                    .map(|v| format!(" = {}", truncate(&stringify_value(v), 40)))
                    .unwrap_or_default();
                out.push_str(&format!("{}- {}{}\n", indent, node.name, value));
            } else {
                out.push_str(&format!("{}+ {}\n", indent, node.name.bold()));
            }
        });
    }
    out.push_str(&format!("\nNodes: {}\n", nodes));
    out
}

/// Format tree search matches.
pub fn format_search_results_text(query: &str, matches: &[&FlatTreeNode]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format!("Matches for \"{}\"", query))
    ));
    if matches.is_empty() {
        out.push_str("No matches.\n");
        return out;
    }
    let mut table = table_with_header(vec!["Name", "Path", "Type", "Value"]);
    for node in matches {
        table.add_row(vec![
            node.name.clone(),
            node.path.clone(),
            if node.is_file() { "file" } else { "folder" }.to_string(),
            node.value
                .as_ref()
                .map(|v| truncate(&stringify_value(v), 40))
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));
    out.push_str(&format!("Total: {}\n", matches.len()));
    out
}
