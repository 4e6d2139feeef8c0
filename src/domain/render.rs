//! Publication rendering: chapter text, subtitle documents, titles and
//! descriptions.
//!
//! Every function here is pure and byte-stable: the same timeline always
//! renders to the same text. The subtitle grammar is consumed verbatim by
//! the video platform's caption ingestion, so it must not drift.

use std::collections::HashSet;
use std::fmt::Write as _;

use super::timeline::{RelativeCaption, RelativeMetadataEvent};

/// Section header preceding the category list.
pub const CATEGORIES_HEADER: &str = "Categories:";
/// Section header preceding the chapter list.
pub const TIMESTAMPS_HEADER: &str = "Timestamps:";
/// Prefix of the closing line carrying the recording start time.
pub const STREAMED_PREFIX: &str = "Streamed: ";

/// A chapter mark at a non-negative offset.
///
/// Video platforms reject negative chapter marks, so chapters can only be
/// built from timeline entries that start inside the recording. See
/// [`chapters_from_timeline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Chapter label.
    pub text: String,
    /// Seconds from recording start.
    pub offset_seconds: u64,
}

/// Keeps the timeline entries usable as chapter marks.
///
/// Entries with a negative offset (values carried forward from before the
/// recording) are dropped.
#[must_use]
pub fn chapters_from_timeline(events: &[RelativeMetadataEvent]) -> Vec<Chapter> {
    events
        .iter()
        .filter_map(|event| {
            u64::try_from(event.start_offset_seconds)
                .ok()
                .map(|offset_seconds| Chapter {
                    text: event.text.clone(),
                    offset_seconds,
                })
        })
        .collect()
}

/// Formats an offset as zero-padded `HH:MM:SS`.
#[must_use]
pub fn format_timestamp(offset_seconds: u64) -> String {
    let hours = offset_seconds / 3600;
    let minutes = (offset_seconds % 3600) / 60;
    let seconds = offset_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Renders chapter lines, starting with a synthetic `00:00:00` line
/// labelled `leading_label`. Every line ends with `\n`.
#[must_use]
pub fn render_chapter_text(chapters: &[Chapter], leading_label: &str) -> String {
    let mut text = format!("{} {leading_label}\n", format_timestamp(0));
    for chapter in chapters {
        let _ = writeln!(
            text,
            "{} {}",
            format_timestamp(chapter.offset_seconds),
            chapter.text
        );
    }
    text
}

/// Renders captions as a subtitle document.
///
/// Each block is `index\nHH:MM:SS,000 --> HH:MM:SS,000\ntext\n\n`,
/// 1-indexed in ascending start order.
#[must_use]
pub fn render_subtitle_document(captions: &[RelativeCaption]) -> String {
    let mut ordered: Vec<&RelativeCaption> = captions.iter().collect();
    ordered.sort_by_key(|c| (c.start_offset_seconds, c.end_offset_seconds));

    let mut text = String::new();
    for (index, caption) in ordered.into_iter().enumerate() {
        let start = u64::try_from(caption.start_offset_seconds).unwrap_or(0);
        let end = u64::try_from(caption.end_offset_seconds).unwrap_or(0);
        let _ = write!(
            text,
            "{}\n{},000 --> {},000\n{}\n\n",
            index + 1,
            format_timestamp(start),
            format_timestamp(end),
            caption.text
        );
    }
    text
}

/// Joins every title in chronological order with `delimiter`.
#[must_use]
pub fn render_title(titles: &[RelativeMetadataEvent], delimiter: &str) -> String {
    titles
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(delimiter)
}

/// Splits every tag value on commas and returns the distinct, non-empty
/// tokens in first-seen order.
#[must_use]
pub fn unique_tags(tag_events: &[RelativeMetadataEvent]) -> Vec<String> {
    let mut seen = HashSet::new();
    tag_events
        .iter()
        .flat_map(|event| event.text.split(','))
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.to_string()))
        .map(str::to_string)
        .collect()
}

/// Inputs for [`render_description`].
#[derive(Debug, Clone, Copy)]
pub struct DescriptionInput<'a> {
    /// Every category value in effect during the recording, carried-forward
    /// value included. Not deduplicated.
    pub categories: &'a [RelativeMetadataEvent],
    /// Task chapters.
    pub chapters: &'a [Chapter],
    /// Label of the synthetic first chapter.
    pub leading_label: &'a str,
    /// Static social-links block.
    pub social_links: &'a str,
    /// Distinct tags, rendered as hashtags.
    pub tags: &'a [String],
    /// Recording start time, ISO 8601.
    pub streamed_at: &'a str,
}

/// Composes the video description.
///
/// Sections, in order, separated by a blank line: categories, timestamps,
/// social links (omitted when empty), hashtags (omitted when there are no
/// tags), and the `Streamed:` line.
#[must_use]
pub fn render_description(input: &DescriptionInput<'_>) -> String {
    let mut sections = Vec::with_capacity(5);

    let mut categories = format!("{CATEGORIES_HEADER}\n");
    for category in input.categories {
        let _ = writeln!(categories, "{}", category.text);
    }
    sections.push(categories);

    sections.push(format!(
        "{TIMESTAMPS_HEADER}\n{}",
        render_chapter_text(input.chapters, input.leading_label)
    ));

    let social = input.social_links.trim_end();
    if !social.is_empty() {
        sections.push(format!("{social}\n"));
    }

    if !input.tags.is_empty() {
        let hashtags = input
            .tags
            .iter()
            .map(|tag| format!("#{tag}"))
            .collect::<Vec<_>>()
            .join(" ");
        sections.push(format!("{hashtags}\n"));
    }

    sections.push(format!("{STREAMED_PREFIX}{}\n", input.streamed_at));

    sections.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str, offset: i64) -> RelativeMetadataEvent {
        RelativeMetadataEvent {
            text: text.to_string(),
            start_offset_seconds: offset,
            carried_forward: offset < 0,
        }
    }

    fn caption(text: &str, start: i64, end: i64) -> RelativeCaption {
        RelativeCaption {
            text: text.to_string(),
            start_offset_seconds: start,
            end_offset_seconds: end,
        }
    }

    #[test]
    fn timestamp_formatting() {
        assert_eq!(format_timestamp(0), "00:00:00");
        assert_eq!(format_timestamp(80), "00:01:20");
        assert_eq!(format_timestamp(3_661), "01:01:01");
        assert_eq!(format_timestamp(36_000 + 59 * 60 + 59), "10:59:59");
    }

    #[test]
    fn chapters_drop_carried_forward_entries() {
        let events = vec![entry("setup", -50), entry("intro", 0), entry("outro", 80)];
        let chapters = chapters_from_timeline(&events);
        assert_eq!(chapters.len(), 2);
        assert_eq!(
            render_chapter_text(&chapters, "Starting stream"),
            "00:00:00 Starting stream\n00:00:00 intro\n00:01:20 outro\n"
        );
    }

    #[test]
    fn chapter_text_without_events_has_leading_line() {
        assert_eq!(
            render_chapter_text(&[], "Starting stream"),
            "00:00:00 Starting stream\n"
        );
    }

    #[test]
    fn subtitle_single_block() {
        assert_eq!(
            render_subtitle_document(&[caption("hello", 47, 50)]),
            "1\n00:00:47,000 --> 00:00:50,000\nhello\n\n"
        );
    }

    #[test]
    fn subtitle_blocks_indexed_in_start_order() {
        let doc = render_subtitle_document(&[
            caption("second", 70, 75),
            caption("first", 3, 6),
            caption("third", 3_600, 3_602),
        ]);
        let blocks: Vec<&str> = doc.trim_end_matches('\n').split("\n\n").collect();
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks,
            vec![
                "1\n00:00:03,000 --> 00:00:06,000\nfirst",
                "2\n00:01:10,000 --> 00:01:15,000\nsecond",
                "3\n01:00:00,000 --> 01:00:02,000\nthird",
            ]
        );
    }

    #[test]
    fn subtitle_document_empty_for_no_captions() {
        assert_eq!(render_subtitle_document(&[]), "");
    }

    #[test]
    fn title_joins_every_change() {
        let titles = vec![entry("Morning coding", -10), entry("Afternoon gaming", 400)];
        assert_eq!(
            render_title(&titles, " / "),
            "Morning coding / Afternoon gaming"
        );
        assert_eq!(render_title(&[], " / "), "");
    }

    #[test]
    fn tags_split_trim_and_deduplicate() {
        let events = vec![entry("rust, coding,", -5), entry("coding,gamedev , rust", 30)];
        assert_eq!(unique_tags(&events), vec!["rust", "coding", "gamedev"]);
    }

    #[test]
    fn description_sections_in_fixed_order() {
        let categories = vec![entry("Science & Technology", -60), entry("Software", 120)];
        let chapters = chapters_from_timeline(&[entry("intro", 0), entry("outro", 80)]);
        let tags = vec!["rust".to_string(), "coding".to_string()];
        let description = render_description(&DescriptionInput {
            categories: &categories,
            chapters: &chapters,
            leading_label: "Starting stream",
            social_links: "Follow me: https://example.com\n",
            tags: &tags,
            streamed_at: "2024-03-01T18:00:00Z",
        });
        assert_eq!(
            description,
            "Categories:\n\
             Science & Technology\n\
             Software\n\
             \n\
             Timestamps:\n\
             00:00:00 Starting stream\n\
             00:00:00 intro\n\
             00:01:20 outro\n\
             \n\
             Follow me: https://example.com\n\
             \n\
             #rust #coding\n\
             \n\
             Streamed: 2024-03-01T18:00:00Z\n"
        );
    }

    #[test]
    fn description_keeps_duplicate_categories() {
        let categories = vec![entry("Games", -1), entry("Games", 10)];
        let description = render_description(&DescriptionInput {
            categories: &categories,
            chapters: &[],
            leading_label: "Starting stream",
            social_links: "",
            tags: &[],
            streamed_at: "2024-03-01T18:00:00Z",
        });
        assert!(description.starts_with("Categories:\nGames\nGames\n\nTimestamps:\n"));
        assert!(!description.contains('#'));
        assert!(description.ends_with("\nStreamed: 2024-03-01T18:00:00Z\n"));
    }
}
