use crate::project::{text_or_placeholder, Cue};
use crate::utils::timestamp_to_ms;
use once_cell::sync::Lazy;
use regex::Regex;

static TIMING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+:\d{2}:\d{2},\d{3})\s*-->\s*(\d+:\d{2}:\d{2},\d{3})")
        .expect("valid timing pattern")
});

/// Parse SRT text into cues sorted by start time.
///
/// Blocks without a recognizable timing line are skipped. Timing is taken as
/// written; overlap and length repair is left to `normalize`.
pub fn parse(text: &str) -> Vec<Cue> {
    let mut cues: Vec<Cue> = split_blocks(text)
        .into_iter()
        .filter_map(|block| parse_block(&block))
        .collect();

    cues.sort_by_key(|c| c.start_ms);
    cues
}

/// Group lines into blocks separated by blank lines
fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn parse_block(lines: &[&str]) -> Option<Cue> {
    // The index line, if any, sits before the timing line and is ignored
    let (timing_idx, caps) = lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| TIMING_RE.captures(line).map(|caps| (i, caps)))?;

    let start_ms = timestamp_to_ms(&caps[1]);
    let end_ms = timestamp_to_ms(&caps[2]);
    let text = lines[timing_idx + 1..].join("\n");

    Some(Cue::new(start_ms, end_ms, text_or_placeholder(&text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::PLACEHOLDER_TEXT;

    fn contents(cues: &[Cue]) -> Vec<(i64, i64, &str)> {
        cues.iter().map(|c| c.content()).collect()
    }

    #[test]
    fn test_parse_basic() {
        let srt = "1\n00:00:01,000 --> 00:00:02,500\nHello\n\n2\n00:00:02,000 --> 00:00:04,000\nWorld\n";
        let cues = parse(srt);
        assert_eq!(
            contents(&cues),
            vec![(1_000, 2_500, "Hello"), (2_000, 4_000, "World")]
        );
    }

    #[test]
    fn test_parse_multiline_and_crlf() {
        let srt = "1\r\n00:00:01,000 --> 00:00:02,000\r\nline one\r\nline two  \r\n\r\n";
        let cues = parse(srt);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "line one\nline two");
    }

    #[test]
    fn test_parse_missing_or_garbled_index() {
        let srt = "00:00:05,000 --> 00:00:06,000\nno index\n\nabc\n00:00:01,000-->00:00:02,000\ngarbled index\n";
        let cues = parse(srt);
        assert_eq!(
            contents(&cues),
            vec![(1_000, 2_000, "garbled index"), (5_000, 6_000, "no index")]
        );
    }

    #[test]
    fn test_parse_skips_blocks_without_timing() {
        let srt = "1\nnot a timing line\ntext\n\n2\n00:00:03,000 --> 00:00:04,000\nkept\n\n3\n00:00:05.000 --> 00:00:06.000\ndot separator\n";
        let cues = parse(srt);
        assert_eq!(contents(&cues), vec![(3_000, 4_000, "kept")]);
    }

    #[test]
    fn test_parse_empty_text_uses_placeholder() {
        let cues = parse("1\n00:00:01,000 --> 00:00:02,000\n\n");
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, PLACEHOLDER_TEXT);
    }

    #[test]
    fn test_parse_sorts_by_start() {
        let srt = "1\n00:00:09,000 --> 00:00:10,000\nlate\n\n2\n00:00:01,000 --> 00:00:02,000\nearly\n";
        let cues = parse(srt);
        assert_eq!(cues[0].text, "early");
        assert_eq!(cues[1].text, "late");
    }

    #[test]
    fn test_parse_garbage_yields_nothing() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n\njust words\n\n").is_empty());
    }

    #[test]
    fn test_parse_long_hours() {
        let cues = parse("1\n100:00:00,000 --> 100:00:01,000\nx\n");
        assert_eq!(cues[0].start_ms, 360_000_000);
    }
}
