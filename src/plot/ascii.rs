//! ASCII bar chart of a discrete distribution.
//!
//! This is intentionally "dumb" (one row per bucket of integers), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Bar glyphs:
//! - `#` bucket entirely inside the window
//! - `+` bucket partly inside the window
//! - `.` bucket outside the window

/// Render `points` (value, probability) as horizontal bars.
///
/// `points` must be sorted by value and contiguous. When there are more points
/// than `max_rows`, neighbouring values are merged into buckets of equal size.
pub fn render_mass_chart(points: &[(i64, f64)], window: (i64, i64), width: usize, max_rows: usize) -> String {
    if points.is_empty() {
        return String::from("(no data)\n");
    }

    let rows = bucket(points, max_rows.max(1));
    let peak = rows.iter().map(|r| r.mass).fold(0.0_f64, f64::max);
    let width = width.max(1);
    let label_width = rows
        .iter()
        .map(|r| r.label().len())
        .max()
        .unwrap_or(1);

    let mut out = String::new();
    for row in &rows {
        let glyph = row.glyph(window);
        let len = if peak > 0.0 {
            ((row.mass / peak) * width as f64).round() as usize
        } else {
            0
        };
        let line = format!(
            "{:>label_width$} |{} {:.4}",
            row.label(),
            glyph.to_string().repeat(len),
            row.mass,
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[derive(Debug, Clone, Copy)]
struct Bucket {
    lo: i64,
    hi: i64,
    mass: f64,
}

impl Bucket {
    fn label(&self) -> String {
        if self.lo == self.hi {
            self.lo.to_string()
        } else {
            format!("{}..{}", self.lo, self.hi)
        }
    }

    fn glyph(&self, (from, to): (i64, i64)) -> char {
        if self.lo >= from && self.hi <= to {
            '#'
        } else if self.hi < from || self.lo > to {
            '.'
        } else {
            '+'
        }
    }
}

fn bucket(points: &[(i64, f64)], max_rows: usize) -> Vec<Bucket> {
    let size = points.len().div_ceil(max_rows);
    points
        .chunks(size)
        .map(|chunk| Bucket {
            lo: chunk[0].0,
            hi: chunk[chunk.len() - 1].0,
            mass: chunk.iter().map(|p| p.1).sum(),
        })
        .collect()
}
