use crate::extraction::{PageContent, RawTable};

/// Reconstruct tables from pdftotext -layout output.
///
/// pdftotext -layout preserves column alignment using spaces. A table starts
/// at a header row (see [`is_table_header`]) and runs until a blank line,
/// a page footer or the end of the page. Cells are assigned to header
/// columns by horizontal position.
pub fn detect_tables(pages: &[PageContent]) -> Vec<RawTable> {
    find_table_regions(pages)
        .iter()
        .map(|region| {
            let lines = &pages[region.page_index].lines;
            build_table(&lines[region.header_line], &lines[region.header_line + 1..region.end_line])
        })
        .filter(|t| !t.rows.is_empty())
        .collect()
}

const HEADER_KEYWORDS: &[&str] = &[
    "item",
    "s/n",
    "sl",
    "no",
    "description",
    "particulars",
    "qty",
    "quantity",
    "unit",
    "uom",
    "rate",
    "amount",
    "price",
];

/// Detect if a line looks like a table header row.
pub fn is_table_header(line: &str) -> bool {
    let segments = split_segments(line);
    if segments.len() < 2 {
        return false;
    }
    let count = segments
        .iter()
        .filter(|s| is_header_cell(&s.text.to_lowercase()))
        .count();
    count >= 2
}

fn is_header_cell(cell: &str) -> bool {
    HEADER_KEYWORDS.iter().any(|kw| {
        cell == *kw
            || cell
                .strip_prefix(kw)
                .and_then(|rest| rest.chars().next())
                .is_some_and(|c| !c.is_alphanumeric())
    })
}

#[derive(Debug, Clone)]
pub struct TableRegion {
    pub page_index: usize,
    pub header_line: usize,
    /// Exclusive end of the data lines.
    pub end_line: usize,
}

/// Find the table region(s) within page content.
pub fn find_table_regions(pages: &[PageContent]) -> Vec<TableRegion> {
    let mut regions = Vec::new();

    for (page_index, page) in pages.iter().enumerate() {
        let mut header_line: Option<usize> = None;

        for (i, line) in page.lines.iter().enumerate() {
            if let Some(start) = header_line {
                let trimmed = line.trim();
                if trimmed.is_empty()
                    || trimmed.starts_with("Page")
                    || trimmed.starts_with("---")
                {
                    if i > start + 1 {
                        regions.push(TableRegion {
                            page_index,
                            header_line: start,
                            end_line: i,
                        });
                    }
                    header_line = None;
                }
                continue;
            }

            if is_table_header(line) {
                header_line = Some(i);
            }
        }

        // Reached end of page while in a table
        if let Some(start) = header_line {
            if page.lines.len() > start + 1 {
                regions.push(TableRegion {
                    page_index,
                    header_line: start,
                    end_line: page.lines.len(),
                });
            }
        }
    }

    regions
}

fn build_table(header_line: &str, data_lines: &[String]) -> RawTable {
    let header_segments = split_segments(header_line);
    let header: Vec<String> = header_segments.iter().map(|s| s.text.to_string()).collect();
    let mut rows: Vec<Vec<String>> = Vec::new();

    for line in data_lines {
        let mut cells = vec![String::new(); header.len()];
        for segment in split_segments(line) {
            let col = assign_column(&header_segments, &segment);
            push_cell_text(&mut cells[col], segment.text);
        }

        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }

        // A row without an item number continues the wrapped row above it.
        match rows.last_mut() {
            Some(prev) if cells[0].is_empty() => {
                for (prev_cell, cell) in prev.iter_mut().zip(cells) {
                    push_cell_text(prev_cell, &cell);
                }
            }
            _ => rows.push(cells),
        }
    }

    RawTable { header, rows }
}

fn push_cell_text(cell: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !cell.is_empty() {
        cell.push(' ');
    }
    cell.push_str(text);
}

/// Pick the header column a segment belongs to: the one it overlaps most,
/// otherwise the one whose start is closest.
fn assign_column(header: &[Segment<'_>], segment: &Segment<'_>) -> usize {
    let best_overlap = header
        .iter()
        .enumerate()
        .map(|(i, h)| (i, overlap(h, segment)))
        .filter(|(_, o)| *o > 0)
        .max_by_key(|(i, o)| (*o, std::cmp::Reverse(*i)));
    if let Some((i, _)) = best_overlap {
        return i;
    }

    header
        .iter()
        .enumerate()
        .min_by_key(|(_, h)| h.column.abs_diff(segment.column))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn overlap(a: &Segment<'_>, b: &Segment<'_>) -> usize {
    let start = a.column.max(b.column);
    let end = a.end_column().min(b.end_column());
    end.saturating_sub(start)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment<'a> {
    /// Character column where the segment starts.
    column: usize,
    text: &'a str,
}

impl Segment<'_> {
    fn end_column(&self) -> usize {
        self.column + self.text.chars().count()
    }
}

/// Split a line by gaps of 2+ whitespace characters, keeping each
/// segment's starting column.
fn split_segments(line: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut start: Option<(usize, usize)> = None;
    let mut last_end = 0;
    let mut space_count = 0;

    for (column, (i, c)) in line.char_indices().enumerate() {
        if c.is_whitespace() {
            space_count += 1;
            if space_count == 2 {
                if let Some((s, s_col)) = start.take() {
                    segments.push(Segment {
                        column: s_col,
                        text: &line[s..last_end],
                    });
                }
            }
        } else {
            if start.is_none() {
                start = Some((i, column));
            }
            space_count = 0;
            last_end = i + c.len_utf8();
        }
    }

    if let Some((s, s_col)) = start {
        segments.push(Segment {
            column: s_col,
            text: &line[s..last_end],
        });
    }

    segments
}
