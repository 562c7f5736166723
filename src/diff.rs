//! Line-level structural diffs of `Debug` output.
//!
//! Values are pretty-printed with `{:#?}`, which puts every field on its own
//! line, and the two renderings are compared with a longest-common-subsequence
//! line diff. Long unchanged runs are collapsed.

use std::fmt::{Debug, Write};

/// Unchanged lines kept around each change.
const CONTEXT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Same(&'a str),
    Removed(&'a str),
    Added(&'a str),
}

/// Render the difference between `expected` and `actual`, or `None` when
/// their debug representations are identical.
///
/// Removed lines (present only in `expected`) are prefixed with `-`, added
/// lines (present only in `actual`) with `+`.
pub fn diff<T: Debug + ?Sized>(expected: &T, actual: &T) -> Option<String> {
    let expected = format!("{:#?}", expected);
    let actual = format!("{:#?}", actual);
    if expected == actual {
        return None;
    }
    let old: Vec<&str> = expected.lines().collect();
    let new: Vec<&str> = actual.lines().collect();
    Some(render(&line_diff(&old, &new)))
}

fn line_diff<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<Line<'a>> {
    // lcs[i][j] = length of the LCS of old[i..] and new[j..]
    let mut lcs = vec![vec![0usize; new.len() + 1]; old.len() + 1];
    for i in (0..old.len()).rev() {
        for j in (0..new.len()).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut lines = Vec::with_capacity(old.len().max(new.len()));
    let (mut i, mut j) = (0, 0);
    while i < old.len() && j < new.len() {
        if old[i] == new[j] {
            lines.push(Line::Same(old[i]));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            lines.push(Line::Removed(old[i]));
            i += 1;
        } else {
            lines.push(Line::Added(new[j]));
            j += 1;
        }
    }
    lines.extend(old[i..].iter().map(|line| Line::Removed(*line)));
    lines.extend(new[j..].iter().map(|line| Line::Added(*line)));
    lines
}

fn render(lines: &[Line<'_>]) -> String {
    let changed: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !matches!(line, Line::Same(_)))
        .map(|(index, _)| index)
        .collect();
    let near_change = |index: usize| {
        changed
            .iter()
            .any(|&c| index + CONTEXT >= c && index <= c + CONTEXT)
    };

    let mut out = String::new();
    let mut skipped = 0usize;
    for (index, line) in lines.iter().enumerate() {
        if matches!(line, Line::Same(_)) && !near_change(index) {
            skipped += 1;
            continue;
        }
        if skipped > 0 {
            let _ = writeln!(out, "  … ({} unchanged)", skipped);
            skipped = 0;
        }
        let _ = match line {
            Line::Same(text) => writeln!(out, "  {}", text),
            Line::Removed(text) => writeln!(out, "- {}", text),
            Line::Added(text) => writeln!(out, "+ {}", text),
        };
    }
    if skipped > 0 {
        let _ = writeln!(out, "  … ({} unchanged)", skipped);
    }
    out
}
