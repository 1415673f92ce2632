//! Artist/title inference from file names.
//!
//! A file name such as `bob marley-no woman no cry.mp3` is normalized with
//! the [`BanList`] and split on `-`: the first segment is the artist, the
//! rest is the title. Malformed names are never an error, they simply
//! produce odd tags.

mod ban_list;

pub use ban_list::BanList;

use crate::scanner::AUDIO_EXTENSIONS;

/// Artist and title parsed from a file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferredName {
    pub artist: String,
    pub title: String,
}

/// Infer artist and title from a bare file name (no directory part).
pub fn infer(file_name: &str, ban_list: &BanList) -> InferredName {
    let normalized = normalize(strip_audio_extension(file_name), ban_list);

    let mut segments = normalized.split('-');
    let artist = title_case(segments.next().unwrap_or_default());
    let rest: String = segments.map(|segment| format!(" {segment}")).collect();
    let title = title_case(&rest);

    InferredName { artist, title }
}

/// Apply every ban-list fragment in order, replacing each occurrence with a
/// single space and trimming trailing whitespace after each fragment.
pub fn normalize(name: &str, ban_list: &BanList) -> String {
    let mut name = name.to_string();
    for fragment in ban_list.iter().filter(|f| !f.is_empty()) {
        name = name.replace(fragment, " ").trim_end().to_string();
    }
    name
}

fn strip_audio_extension(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, ext))
            if AUDIO_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known)) =>
        {
            stem
        }
        _ => file_name,
    }
}

/// Capitalize the first letter of every whitespace-separated word and
/// lowercase the rest. Words are rejoined with single spaces.
///
/// Only whitespace starts a word: `o'brien` becomes `O'brien`, not
/// `O'Brien`.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
