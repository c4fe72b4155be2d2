//! Difference between the original and the generated resume.
//!
//! Myers diff (via `similar`) over tokens. Word granularity matches what the
//! page highlights by default; line granularity uses `str::lines`, so a
//! missing trailing newline never shows up as a change.

use serde::{Deserialize, Serialize};
use similar::{capture_diff_slices, Algorithm, DiffTag};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    #[default]
    Word,
    Line,
}

impl Granularity {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "line" => Granularity::Line,
            _ => Granularity::Word,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Unchanged,
    Added,
    Removed,
}

impl SegmentKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            SegmentKind::Unchanged => "same",
            SegmentKind::Added => "added",
            SegmentKind::Removed => "removed",
        }
    }
}

/// One token (word or line) of the diff, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSegment {
    pub text: String,
    pub kind: SegmentKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub unchanged: usize,
    pub added: usize,
    pub removed: usize,
}

impl DiffSummary {
    pub fn of(segments: &[DiffSegment]) -> Self {
        segments.iter().fold(Self::default(), |mut acc, seg| {
            match seg.kind {
                SegmentKind::Unchanged => acc.unchanged += 1,
                SegmentKind::Added => acc.added += 1,
                SegmentKind::Removed => acc.removed += 1,
            }
            acc
        })
    }

    pub fn has_changes(&self) -> bool {
        self.added > 0 || self.removed > 0
    }
}

fn tokenize(text: &str, granularity: Granularity) -> Vec<&str> {
    match granularity {
        Granularity::Word => text.split_whitespace().collect(),
        Granularity::Line => text.lines().collect(),
    }
}

/// Ordered segments classifying every token of both texts.
/// Within a replaced block, removals come before additions.
pub fn diff_text(original: &str, revised: &str, granularity: Granularity) -> Vec<DiffSegment> {
    let old = tokenize(original, granularity);
    let new = tokenize(revised, granularity);

    let mut segments = Vec::with_capacity(old.len().max(new.len()));
    let mut push = |tokens: &[&str], kind: SegmentKind| {
        segments.extend(tokens.iter().map(|t| DiffSegment {
            text: (*t).to_string(),
            kind,
        }));
    };

    for op in capture_diff_slices(Algorithm::Myers, &old, &new) {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => push(&old[old_range], SegmentKind::Unchanged),
            DiffTag::Delete => push(&old[old_range], SegmentKind::Removed),
            DiffTag::Insert => push(&new[new_range], SegmentKind::Added),
            DiffTag::Replace => {
                push(&old[old_range], SegmentKind::Removed);
                push(&new[new_range], SegmentKind::Added);
            }
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Doe\nSoftware Engineer\n- Built billing service in Go\n- Led migration to Kubernetes";

    #[test]
    fn test_identical_text_has_no_changes() {
        for granularity in [Granularity::Word, Granularity::Line] {
            let segments = diff_text(RESUME, RESUME, granularity);
            let summary = DiffSummary::of(&segments);
            assert!(!summary.has_changes(), "{granularity:?}");
            assert!(segments.iter().all(|s| s.kind == SegmentKind::Unchanged));
        }
    }

    #[test]
    fn test_appended_line_is_the_only_addition() {
        let revised = format!("{RESUME}\n- Shipped Rust ingestion pipeline");
        let segments = diff_text(RESUME, &revised, Granularity::Line);

        let added: Vec<_> = segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Added)
            .collect();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].text, "- Shipped Rust ingestion pipeline");

        let (last, prior) = segments.split_last().unwrap();
        assert_eq!(last.kind, SegmentKind::Added);
        assert_eq!(prior.len(), RESUME.lines().count());
        assert!(prior.iter().all(|s| s.kind == SegmentKind::Unchanged));
    }

    #[test]
    fn test_trailing_newline_is_not_a_change() {
        let segments = diff_text("a\nb", "a\nb\n", Granularity::Line);
        assert!(!DiffSummary::of(&segments).has_changes());
    }

    #[test]
    fn test_word_replacement_orders_removal_before_addition() {
        let segments = diff_text(
            "Built billing service in Go",
            "Built billing service in Rust",
            Granularity::Word,
        );
        let kinds: Vec<_> = segments.iter().map(|s| (s.text.as_str(), s.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("Built", SegmentKind::Unchanged),
                ("billing", SegmentKind::Unchanged),
                ("service", SegmentKind::Unchanged),
                ("in", SegmentKind::Unchanged),
                ("Go", SegmentKind::Removed),
                ("Rust", SegmentKind::Added),
            ]
        );
    }

    #[test]
    fn test_word_granularity_ignores_reflowed_whitespace() {
        let segments = diff_text("led  the\nteam", "led the team", Granularity::Word);
        assert!(!DiffSummary::of(&segments).has_changes());
    }

    #[test]
    fn test_empty_original_marks_everything_added() {
        let segments = diff_text("", "one two", Granularity::Word);
        assert_eq!(
            DiffSummary::of(&segments),
            DiffSummary {
                unchanged: 0,
                added: 2,
                removed: 0
            }
        );
    }

    #[test]
    fn test_granularity_parse() {
        assert_eq!(Granularity::parse("line"), Granularity::Line);
        assert_eq!(Granularity::parse("word"), Granularity::Word);
        assert_eq!(Granularity::parse(""), Granularity::Word);
    }
}
