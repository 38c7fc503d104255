//! Terminal report of a [`Page`], drawn with `comfy-table`.

use crate::data::format_number;
use crate::ir::{Chart, ChartKind, Page, Section, StatCard, Tone};
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use std::fmt::Write;

/// Render the whole page as text: headline, cards, charts as tables, sections
pub fn render_page(page: &Page) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", page.title);
    if !page.subtitle.is_empty() {
        let _ = writeln!(out, "{}", page.subtitle);
    }

    if !page.cards.is_empty() {
        let _ = writeln!(out, "\n{}", cards_table(&page.cards));
    }
    for chart in &page.charts {
        let _ = writeln!(out, "\n{}", chart_heading(chart));
        let _ = writeln!(out, "{}", chart_table(chart));
    }
    for section in &page.sections {
        let _ = writeln!(out, "\n{}", section.title);
        let _ = writeln!(out, "{}", section_table(section));
    }
    out
}

fn cards_table(cards: &[StatCard]) -> Table {
    let mut table = styled_table();
    table.set_header(vec![header_cell("Metric"), header_cell("Value"), header_cell("Detail")]);
    for card in cards {
        table.add_row(vec![
            Cell::new(&card.label),
            Cell::new(&card.value)
                .fg(tone_color(card.tone))
                .add_attribute(Attribute::Bold),
            dim_cell(card.sub.as_deref().unwrap_or("")),
        ]);
    }
    align_column(&mut table, 1, CellAlignment::Right);
    table
}

fn chart_heading(chart: &Chart) -> String {
    match &chart.subtitle {
        Some(sub) => format!("{} ({})", chart.title, sub),
        None => chart.title.clone(),
    }
}

fn chart_table(chart: &Chart) -> Table {
    let mut table = styled_table();
    match &chart.kind {
        ChartKind::Bars { categories, series } => {
            let mut header = vec![header_cell("Category")];
            header.extend(series.iter().map(|s| header_cell(&s.name).fg(tone_color(s.tone))));
            table.set_header(header);

            for (idx, category) in categories.iter().enumerate() {
                let mut row = vec![Cell::new(category)];
                row.extend(
                    series
                        .iter()
                        .map(|s| Cell::new(s.values.get(idx).map(|v| format_number(*v)).unwrap_or_default())),
                );
                table.add_row(row);
            }
            for col in 1..=series.len() {
                align_column(&mut table, col, CellAlignment::Right);
            }
        }
        ChartKind::Scatter { series } => {
            table.set_header(vec![header_cell("Series"), header_cell("Points")]);
            for s in series {
                table.add_row(vec![
                    Cell::new(&s.name).fg(tone_color(s.tone)),
                    Cell::new(s.points.len()),
                ]);
            }
            align_column(&mut table, 1, CellAlignment::Right);
        }
    }
    table
}

fn section_table(section: &Section) -> Table {
    let mut table = styled_table();
    for item in &section.items {
        table.add_row(vec![
            Cell::new(&item.label).fg(tone_color(item.tone)),
            Cell::new(&item.detail),
        ]);
    }
    table
}

fn styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Disease => Color::Red,
        Tone::Healthy => Color::Green,
        Tone::Primary => Color::Blue,
        Tone::Teal => Color::Cyan,
        Tone::Warning => Color::Yellow,
        Tone::Muted => Color::DarkGrey,
        Tone::Neutral => Color::Reset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Series, SectionItem};

    #[test]
    fn test_report_contains_cards_and_charts() {
        let mut page = Page::new("Overview", "High-level summary");
        page.cards.push(StatCard::new("Total Patients", "303", Tone::Primary));
        page.charts.push(Chart::bars(
            "Age Distribution",
            vec!["<40".into(), "40–49".into()],
            vec![Series::new("Patients", Tone::Primary, vec![12.0, 71.0])],
        ));
        page.sections.push(Section {
            title: "Risk Flags".into(),
            items: vec![SectionItem::new("OK", "All indicators within normal range", Tone::Healthy)],
        });

        let text = render_page(&page);
        assert!(text.starts_with("Overview\n"));
        assert!(text.contains("Total Patients"));
        assert!(text.contains("303"));
        assert!(text.contains("Age Distribution"));
        assert!(text.contains("71"));
        assert!(text.contains("All indicators within normal range"));
    }

    #[test]
    fn test_no_data_page_report() {
        let text = render_page(&Page::no_data());
        assert!(text.contains("No Data Loaded"));
        assert!(text.contains("trestbps"));
    }
}
