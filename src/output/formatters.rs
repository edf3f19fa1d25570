use chrono::{DateTime, Local, Utc};

use crate::catalog::VideoRecord;
use crate::digest::TutorialDigest;
use crate::distill::NO_TRANSCRIPT_PLACEHOLDER;
use crate::extractors::watch_url;
use crate::utils::{filename_slug, format_duration, format_relative_time, group_thousands};

pub const NO_TRANSCRIPT_MESSAGE: &str = "No transcript available for this video.";
pub const NO_STEPS_MESSAGE: &str = "No steps could be extracted from the transcript.";

/// Distilled content shown under an entry
#[derive(Debug, Clone, PartialEq)]
pub enum EntryBody {
    /// Step lines, verbatim
    Steps(Vec<String>),
    /// Transcript fetched but nothing looked like a step
    NoSteps,
    /// Transcript could not be fetched
    NoTranscript,
    /// Overview prose for a search result
    Overview(String),
}

/// Presentation-neutral view of one video, shared by both renderers
#[derive(Debug, Clone, PartialEq)]
pub struct DigestEntry {
    pub title: String,
    pub link: String,
    /// Label/value pairs such as channel, published time, duration and views
    pub stats: Vec<(String, String)>,
    pub body: EntryBody,
}

impl DigestEntry {
    pub fn from_tutorial(digest: &TutorialDigest) -> Self {
        let body = match &digest.steps {
            None => EntryBody::NoTranscript,
            Some(steps) if steps.is_empty() => EntryBody::NoSteps,
            Some(steps) => EntryBody::Steps(steps.clone()),
        };

        Self {
            title: digest.title.clone(),
            link: watch_url(&digest.video_id),
            stats: Vec::new(),
            body,
        }
    }

    pub fn from_record(record: &VideoRecord, now: DateTime<Utc>) -> Self {
        let overview = record
            .overview
            .clone()
            .unwrap_or_else(|| NO_TRANSCRIPT_PLACEHOLDER.to_string());

        Self {
            title: record.title.clone(),
            link: watch_url(&record.id),
            stats: vec![
                ("Channel".to_string(), record.channel_title.clone()),
                (
                    "Published".to_string(),
                    format_relative_time(record.published_at, now),
                ),
                ("Duration".to_string(), format_duration(record.duration)),
                ("Views".to_string(), group_thousands(record.view_count)),
            ],
            body: EntryBody::Overview(overview),
        }
    }

    /// Stats as a single `Label: value | ...` line
    pub fn stats_line(&self) -> String {
        self.stats
            .iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// One export document: a heading, its entries and the generated filename
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub file_name: String,
    /// Top-level heading; `None` makes each entry a level-1 heading
    pub heading: Option<String>,
    pub entries: Vec<DigestEntry>,
}

impl ExportDocument {
    /// `<YYYY-MM-DD>_<sanitized-title>_tutorial.md`
    pub fn tutorial(digest: &TutorialDigest, now: DateTime<Local>) -> Self {
        Self {
            file_name: format!(
                "{}_{}_tutorial.md",
                now.format("%Y-%m-%d"),
                filename_slug(&digest.title)
            ),
            heading: None,
            entries: vec![DigestEntry::from_tutorial(digest)],
        }
    }

    /// `<subject>_<YYYY-MM-DD>_video_summaries.md`
    pub fn summaries(subject: &str, records: &[VideoRecord], now: DateTime<Local>) -> Self {
        let now_utc = now.with_timezone(&Utc);
        Self {
            file_name: format!(
                "{}_{}_video_summaries.md",
                filename_slug(subject.trim()),
                now.format("%Y-%m-%d")
            ),
            heading: Some(format!("Top YouTube videos: {}", subject.trim())),
            entries: records
                .iter()
                .map(|record| DigestEntry::from_record(record, now_utc))
                .collect(),
        }
    }
}

/// Escape characters that would end or nest Markdown link text
fn escape_link_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Render a document as Markdown
pub fn format_as_markdown(document: &ExportDocument) -> String {
    let mut output = String::new();

    let entry_level = match &document.heading {
        Some(heading) => {
            output.push_str(&format!("# {}\n\n", heading));
            "##"
        }
        None => "#",
    };

    if document.entries.is_empty() {
        output.push_str("No videos found.\n");
        return output;
    }

    for entry in &document.entries {
        output.push_str(&format!(
            "{} [{}]({})\n\n",
            entry_level,
            escape_link_text(&entry.title),
            entry.link
        ));

        if !entry.stats.is_empty() {
            output.push_str(&format!("{}\n\n", entry.stats_line()));
        }

        match &entry.body {
            EntryBody::Steps(steps) => {
                for step in steps {
                    output.push_str(&format!("- {}\n", step));
                }
                output.push('\n');
            }
            EntryBody::NoSteps => output.push_str(&format!("_{}_\n\n", NO_STEPS_MESSAGE)),
            EntryBody::NoTranscript => {
                output.push_str(&format!("_{}_\n\n", NO_TRANSCRIPT_MESSAGE))
            }
            EntryBody::Overview(text) => output.push_str(&format!("{}\n\n", text)),
        }
    }

    output
}

/// Render a document for the terminal
pub fn format_for_console(document: &ExportDocument) -> String {
    use console::style;

    let mut output = String::new();

    if let Some(heading) = &document.heading {
        output.push_str(&format!("{}\n\n", style(heading).bold().underlined()));
    }

    if document.entries.is_empty() {
        output.push_str("No videos found.\n");
        return output;
    }

    let numbered = document.entries.len() > 1;
    for (i, entry) in document.entries.iter().enumerate() {
        if numbered {
            output.push_str(&format!("{}. {}\n", i + 1, style(&entry.title).bold()));
        } else {
            output.push_str(&format!("{}\n", style(&entry.title).bold()));
        }
        output.push_str(&format!("   {}\n", style(&entry.link).cyan().underlined()));

        if !entry.stats.is_empty() {
            output.push_str(&format!("   {}\n", style(entry.stats_line()).dim()));
        }

        match &entry.body {
            EntryBody::Steps(steps) => {
                output.push_str("\nExtracted Steps:\n");
                for step in steps {
                    output.push_str(&format!("- {}\n", step));
                }
            }
            EntryBody::NoSteps => output.push_str(&format!("\n{}\n", NO_STEPS_MESSAGE)),
            EntryBody::NoTranscript => {
                output.push_str(&format!("\n{}\n", style(NO_TRANSCRIPT_MESSAGE).yellow()))
            }
            EntryBody::Overview(text) => output.push_str(&format!("\n   {}\n", text)),
        }
        output.push('\n');
    }

    output
}
