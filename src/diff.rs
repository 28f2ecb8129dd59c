//! Line-based unified diff between original and improved code.
//!
//! Implements a Myers O(ND) shortest-edit-script over lines and renders
//! the result in the two-file unified-diff convention (`a/<file>` /
//! `b/<file>` headers, hunks with three context lines). Lines are compared
//! with their terminators so a missing trailing newline is a real change;
//! the git-style `\ No newline at end of file` marker keeps the output
//! applyable byte-for-byte.

/// Sentinel returned when both inputs are line-for-line identical.
/// Callers that need to detect no-op diffs programmatically must compare
/// against this exact string.
pub const NO_CHANGES_MESSAGE: &str = "No changes detected between original and improved code.";

/// Context lines kept on each side of a change run.
const CONTEXT_LINES: usize = 3;

/// Counts derived from a rendered unified diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffStats {
    pub lines_added: usize,
    pub lines_removed: usize,
    pub total_changes: usize,
}

/// One step of the edit script. Indices point into the line vectors of
/// the original (`old`) and improved (`new`) inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiffOp {
    Equal { old: usize, new: usize },
    Delete { old: usize },
    Insert { new: usize },
}

/// Generate a unified diff between `original` and `improved`.
///
/// Returns [`NO_CHANGES_MESSAGE`] when the inputs are identical. The
/// `filename` only labels the `---`/`+++` headers; it is never parsed.
pub fn generate_diff(original: &str, improved: &str, filename: &str) -> String {
    if original == improved {
        return NO_CHANGES_MESSAGE.to_string();
    }

    let old_lines: Vec<&str> = original.split_inclusive('\n').collect();
    let new_lines: Vec<&str> = improved.split_inclusive('\n').collect();
    let ops = edit_script(&old_lines, &new_lines);

    let mut out = String::new();
    out.push_str(&format!("--- a/{}\n+++ b/{}\n", filename, filename));

    for (start, end) in hunk_ranges(&ops) {
        render_hunk(&mut out, &ops[start..=end], &old_lines, &new_lines);
    }

    out
}

/// Count added and removed content lines in a rendered diff.
///
/// The `---`/`+++` header lines also start with the change markers; they
/// are excluded by prefix, matching version-control tooling conventions.
pub fn diff_stats(diff_text: &str) -> DiffStats {
    let mut added = 0;
    let mut removed = 0;
    for line in diff_text.lines() {
        if line.starts_with('+') && !line.starts_with("+++") {
            added += 1;
        } else if line.starts_with('-') && !line.starts_with("---") {
            removed += 1;
        }
    }
    DiffStats {
        lines_added: added,
        lines_removed: removed,
        total_changes: added + removed,
    }
}

/// Myers greedy forward search. Returns the edit script as a flat list of
/// ops in input order. Exact minimality is guaranteed by the algorithm,
/// but callers only rely on validity.
fn edit_script(old: &[&str], new: &[&str]) -> Vec<DiffOp> {
    let n = old.len() as isize;
    let m = new.len() as isize;
    let max = n + m;
    if max == 0 {
        return Vec::new();
    }

    // v[k + max] holds the furthest x reached on diagonal k.
    let offset = max;
    let mut v = vec![0isize; (2 * max + 1) as usize];
    let mut trace: Vec<Vec<isize>> = Vec::new();

    'search: for d in 0..=max {
        trace.push(v.clone());
        let mut k = -d;
        while k <= d {
            let idx = (k + offset) as usize;
            let mut x = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
                v[idx + 1]
            } else {
                v[idx - 1] + 1
            };
            let mut y = x - k;
            while x < n && y < m && old[x as usize] == new[y as usize] {
                x += 1;
                y += 1;
            }
            v[idx] = x;
            if x >= n && y >= m {
                break 'search;
            }
            k += 2;
        }
    }

    backtrack(&trace, old.len(), new.len())
}

/// Walk the search trace backwards from (n, m) to (0, 0), emitting ops.
fn backtrack(trace: &[Vec<isize>], n: usize, m: usize) -> Vec<DiffOp> {
    let offset = (n + m) as isize;
    let mut ops = Vec::new();
    let mut x = n as isize;
    let mut y = m as isize;

    for (d, v) in trace.iter().enumerate().rev() {
        let d = d as isize;
        let k = x - y;
        let idx = (k + offset) as usize;
        let prev_k = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = v[(prev_k + offset) as usize];
        let prev_y = prev_x - prev_k;

        // Diagonal snake: equal lines.
        while x > prev_x && y > prev_y {
            ops.push(DiffOp::Equal {
                old: (x - 1) as usize,
                new: (y - 1) as usize,
            });
            x -= 1;
            y -= 1;
        }

        if d > 0 {
            if x == prev_x {
                ops.push(DiffOp::Insert {
                    new: prev_y as usize,
                });
            } else {
                ops.push(DiffOp::Delete {
                    old: prev_x as usize,
                });
            }
            x = prev_x;
            y = prev_y;
        }
    }

    ops.reverse();
    ops
}

/// Group change ops into hunk ranges over the op list, padded with
/// [`CONTEXT_LINES`] of surrounding context. Runs whose context regions
/// would touch are merged into one hunk.
fn hunk_ranges(ops: &[DiffOp]) -> Vec<(usize, usize)> {
    let mut groups: Vec<(usize, usize)> = Vec::new();
    for (i, op) in ops.iter().enumerate() {
        if matches!(op, DiffOp::Equal { .. }) {
            continue;
        }
        match groups.last_mut() {
            Some((_, end)) if i - *end <= 2 * CONTEXT_LINES => *end = i,
            _ => groups.push((i, i)),
        }
    }

    groups
        .into_iter()
        .map(|(start, end)| {
            (
                start.saturating_sub(CONTEXT_LINES),
                (end + CONTEXT_LINES).min(ops.len() - 1),
            )
        })
        .collect()
}

fn render_hunk(out: &mut String, ops: &[DiffOp], old_lines: &[&str], new_lines: &[&str]) {
    // First positions touched on each side. Insert ops carry no old index
    // (and vice versa), so scan for the first op that does.
    let old_start = ops
        .iter()
        .find_map(|op| match op {
            DiffOp::Equal { old, .. } | DiffOp::Delete { old } => Some(*old),
            DiffOp::Insert { .. } => None,
        })
        .unwrap_or(0);
    let new_start = ops
        .iter()
        .find_map(|op| match op {
            DiffOp::Equal { new, .. } | DiffOp::Insert { new } => Some(*new),
            DiffOp::Delete { .. } => None,
        })
        .unwrap_or(0);

    let old_count = ops
        .iter()
        .filter(|op| matches!(op, DiffOp::Equal { .. } | DiffOp::Delete { .. }))
        .count();
    let new_count = ops
        .iter()
        .filter(|op| matches!(op, DiffOp::Equal { .. } | DiffOp::Insert { .. }))
        .count();

    out.push_str(&format!(
        "@@ -{} +{} @@\n",
        format_range(old_start, old_count),
        format_range(new_start, new_count)
    ));

    for op in ops {
        match op {
            DiffOp::Equal { old, .. } => push_line(out, ' ', old_lines[*old]),
            DiffOp::Delete { old } => push_line(out, '-', old_lines[*old]),
            DiffOp::Insert { new } => push_line(out, '+', new_lines[*new]),
        }
    }
}

/// Unified-diff range: 1-based start, length omitted when exactly one.
fn format_range(start: usize, count: usize) -> String {
    let begin = if count == 0 { start } else { start + 1 };
    if count == 1 {
        begin.to_string()
    } else {
        format!("{},{}", begin, count)
    }
}

/// Emit one marked line. Lines keep their own terminator from
/// `split_inclusive`; a line without one was the last line of its file
/// and gets the no-newline marker so the diff stays reversible.
fn push_line(out: &mut String, marker: char, line: &str) {
    out.push(marker);
    match line.strip_suffix('\n') {
        Some(body) => {
            out.push_str(body);
            out.push('\n');
        }
        None => {
            out.push_str(line);
            out.push_str("\n\\ No newline at end of file\n");
        }
    }
}
