//! Fixed title tables and URL templates for generated checklists.

use std::ops::Range;

/// Video lengths are drawn from this range, in minutes.
pub const VIDEO_MINUTES: Range<u32> = 10..20;

const VIDEO_TITLES: [&str; 5] = [
    "Introduction & Concepts",
    "Formulas & Shortcuts",
    "Problem Solving Techniques",
    "Advanced Concepts",
    "Tricks & Time Savers",
];

const PDF_TITLES: [&str; 10] = [
    "Quick Notes",
    "Formula Sheet",
    "Important Questions",
    "Previous Year Paper 1",
    "Previous Year Paper 2",
    "Practice Problems Set 1",
    "Practice Problems Set 2",
    "Solved Examples",
    "Shortcut Tricks",
    "Revision Notes",
];

#[must_use]
pub fn video_title(index: usize) -> String {
    VIDEO_TITLES
        .get(index)
        .map_or_else(|| format!("Video Lesson {}", index + 1), |t| (*t).to_string())
}

/// Tests come in four tiers of five; the last tier is open-ended.
#[must_use]
pub fn test_title(index: usize) -> String {
    match index {
        0..5 => format!("Basic Practice {}", index + 1),
        5..10 => format!("Intermediate Test {}", index - 4),
        10..15 => format!("Advanced Practice {}", index - 9),
        _ => format!("Mock Test {}", index - 14),
    }
}

#[must_use]
pub fn pdf_title(index: usize) -> String {
    PDF_TITLES
        .get(index)
        .map_or_else(|| format!("Study Material {}", index + 1), |t| (*t).to_string())
}

#[must_use]
pub fn video_url(subject: &str, topic: &str, index: usize) -> String {
    format!("/resources/videos/{subject}/{topic}/{index}")
}

#[must_use]
pub fn test_url(subject: &str, topic: &str, index: usize) -> String {
    format!("/student/test/{subject}-{topic}-{index}")
}

#[must_use]
pub fn pdf_url(subject: &str, topic: &str, index: usize) -> String {
    format!("/resources/pdfs/{subject}/{topic}/{index}.pdf")
}
