// src/analytics/mod.rs
//! Content measurement for post detail pages.

use crate::constants::WORDS_PER_MINUTE;
use crate::model::{ContentSection, Post};

/// Word statistics of a post body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentMeasurement {
    pub sections: usize,
    pub blocks: usize,
    pub words: usize,
}

/// Counts sections, body blocks and whitespace-delimited words.
///
/// Headings count towards the word total; titles and subtitles do not.
pub fn measure_content(post: &Post) -> ContentMeasurement {
    post.content
        .iter()
        .fold(ContentMeasurement::default(), |total, section| {
            ContentMeasurement {
                sections: total.sections + 1,
                blocks: total.blocks + section.body.len(),
                words: total.words + section_word_count(section),
            }
        })
}

/// Estimated minutes needed to read the post body, rounded up.
///
/// A post without content reads in 0 minutes.
pub fn compute_reading_time(post: &Post) -> u32 {
    let words = measure_content(post).words;
    u32::try_from(words.div_ceil(WORDS_PER_MINUTE)).unwrap_or(u32::MAX)
}

fn section_word_count(section: &ContentSection) -> usize {
    let heading = count_words(&section.heading);
    let body: usize = section.body.iter().map(|block| count_words(&block.text)).sum();
    heading + body
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RichTextBlock;
    use crate::types::PostUid;

    fn post_with(content: Vec<ContentSection>) -> Post {
        Post {
            id: PostUid::parse("leitura").unwrap(),
            publication_timestamp: None,
            title: "Um título que não conta".to_string(),
            subtitle: String::new(),
            author: String::new(),
            banner: None,
            content,
        }
    }

    fn section(heading: &str, body: &[&str]) -> ContentSection {
        ContentSection {
            heading: heading.to_string(),
            body: body.iter().map(|t| RichTextBlock::paragraph(*t)).collect(),
        }
    }

    #[test]
    fn five_words_read_in_one_minute() {
        let post = post_with(vec![section("A B", &["C D E"])]);
        assert_eq!(measure_content(&post).words, 5);
        assert_eq!(compute_reading_time(&post), 1);
    }

    #[test]
    fn empty_content_reads_in_zero_minutes() {
        assert_eq!(compute_reading_time(&post_with(vec![])), 0);
        assert_eq!(compute_reading_time(&post_with(vec![section("", &["   "])])), 0);
    }

    #[test]
    fn rounds_up_partial_minutes() {
        let two_hundred = vec!["palavra"; 200].join(" ");
        let post = post_with(vec![section("", &[&two_hundred])]);
        assert_eq!(compute_reading_time(&post), 1);

        let post = post_with(vec![section("mais uma", &[&two_hundred])]);
        assert_eq!(compute_reading_time(&post), 2);
    }

    #[test]
    fn irregular_whitespace_does_not_inflate_counts() {
        let post = post_with(vec![
            section("  Título\tda seção ", &["linha um\n\nlinha  dois", ""]),
            section("Outra", &["fim"]),
        ]);
        let measurement = measure_content(&post);
        assert_eq!(measurement.words, 9);
        assert_eq!(measurement.sections, 2);
        assert_eq!(measurement.blocks, 3);
    }
}
