use crate::project::{text_or_placeholder, Cue, MIN_CUE_LEN_MS};
use crate::utils::Millis;

/// Repair a cue set: non-negative, minimum length, sorted, de-overlapped and
/// clamped to `total_ms` when known.
///
/// Overlaps are resolved by pushing a cue's start forward to the previous
/// cue's end; earlier cues are never moved back. Applying the pass to its own
/// output changes nothing.
pub fn normalize(cues: &[Cue], total_ms: Option<Millis>) -> Vec<Cue> {
    let total_ms = total_ms.map(|d| d.max(0));

    let mut items: Vec<Cue> = cues
        .iter()
        .map(|c| {
            let start_ms = c.start_ms.max(0);
            let end_ms = c.end_ms.max(0).max(start_ms + MIN_CUE_LEN_MS);
            Cue {
                id: c.id,
                start_ms,
                end_ms,
                text: sanitize_text(&c.text),
            }
        })
        .collect();

    items.sort_by_key(|c| c.start_ms);

    let mut kept: Vec<Cue> = Vec::with_capacity(items.len());
    let mut prev_end = 0;
    for mut cue in items {
        // No room left before the end of the media: the cue is dropped whole
        if let Some(d) = total_ms {
            if !kept.is_empty() && prev_end > d - MIN_CUE_LEN_MS {
                continue;
            }
        }
        if cue.start_ms < prev_end {
            cue.start_ms = prev_end;
        }
        cue.end_ms = cue.end_ms.max(cue.start_ms + MIN_CUE_LEN_MS);
        if let Some(d) = total_ms {
            cue.start_ms = cue.start_ms.min((d - MIN_CUE_LEN_MS).max(0));
            cue.end_ms = cue.end_ms.min(d);
        }
        prev_end = cue.end_ms;
        kept.push(cue);
    }

    kept
}

/// Text as it will survive an SRT round trip: no carriage returns and no
/// blank lines, which would end the block early.
fn sanitize_text(text: &str) -> String {
    let joined = text
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .replace('\r', "");
    text_or_placeholder(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::PLACEHOLDER_TEXT;

    fn cue(start: Millis, end: Millis, text: &str) -> Cue {
        Cue::new(start, end, text)
    }

    fn contents(cues: &[Cue]) -> Vec<(Millis, Millis, &str)> {
        cues.iter().map(|c| c.content()).collect()
    }

    /// Deterministic pseudo-random cue sets
    fn sample_sets() -> Vec<Vec<Cue>> {
        let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;
        let mut next = move |modulo: i64| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed % modulo as u64) as i64
        };

        (0..40)
            .map(|_| {
                let n = next(8) as usize;
                (0..n)
                    .map(|_| {
                        let start = next(12_000) - 1_000;
                        let end = start + next(4_000) - 500;
                        cue(start, end, if next(4) == 0 { "" } else { "text" })
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_overlap_pushes_later_start() {
        let cues = vec![cue(1_000, 2_500, "Hello"), cue(2_000, 4_000, "World")];
        let out = normalize(&cues, Some(5_000));
        assert_eq!(
            contents(&out),
            vec![(1_000, 2_500, "Hello"), (2_500, 4_000, "World")]
        );
        // Ids survive normalization
        assert_eq!(out[0].id, cues[0].id);
    }

    #[test]
    fn test_negative_and_short_cues() {
        let out = normalize(&[cue(-500, -100, "a"), cue(300, 310, "b")], None);
        assert_eq!(contents(&out), vec![(0, 50, "a"), (300, 350, "b")]);
    }

    #[test]
    fn test_clamps_to_duration() {
        let out = normalize(&[cue(4_000, 9_000, "x"), cue(9_990, 12_000, "y")], Some(10_000));
        assert_eq!(contents(&out), vec![(4_000, 9_000, "x"), (9_950, 10_000, "y")]);
    }

    #[test]
    fn test_text_is_sanitized() {
        let out = normalize(&[cue(0, 100, "  a\r\n\r\n  \nb  "), cue(200, 300, "   ")], None);
        assert_eq!(out[0].text, "a\nb");
        assert_eq!(out[1].text, PLACEHOLDER_TEXT);
    }

    #[test]
    fn test_sorted_and_non_overlapping_without_duration() {
        for set in sample_sets() {
            let out = normalize(&set, None);
            for pair in out.windows(2) {
                assert!(pair[0].start_ms <= pair[1].start_ms);
                assert!(pair[0].end_ms <= pair[1].start_ms);
            }
            for c in &out {
                assert!(c.start_ms >= 0);
                assert!(c.len_ms() >= MIN_CUE_LEN_MS);
            }
        }
    }

    #[test]
    fn test_idempotent() {
        for set in sample_sets() {
            for total in [None, Some(0), Some(30), Some(5_000), Some(20_000)] {
                let once = normalize(&set, total);
                let twice = normalize(&once, total);
                assert_eq!(once, twice, "total = {:?}", total);
            }
        }
    }

    #[test]
    fn test_dense_tail_drops_cues_without_room() {
        // "a" leaves no room for a full-length cue before 100
        let out = normalize(&[cue(0, 80, "a"), cue(60, 120, "b")], Some(100));
        assert_eq!(contents(&out), vec![(0, 80, "a")]);
        assert_eq!(normalize(&out, Some(100)), out);

        // Exactly enough room is still used
        let out = normalize(&[cue(0, 50, "a"), cue(60, 120, "b")], Some(100));
        assert_eq!(contents(&out), vec![(0, 50, "a"), (50, 100, "b")]);
    }

    #[test]
    fn test_cues_past_a_shorter_duration() {
        let cues = vec![cue(0, 5_000, "a"), cue(6_000, 7_000, "b"), cue(8_000, 9_000, "c")];
        let out = normalize(&cues, Some(5_000));
        assert_eq!(contents(&out), vec![(0, 5_000, "a")]);

        let out = normalize(&cues, Some(6_500));
        assert_eq!(contents(&out), vec![(0, 5_000, "a"), (6_000, 6_500, "b")]);
    }

    #[test]
    fn test_non_overlapping_with_duration() {
        for set in sample_sets() {
            for total in [Some(0), Some(30), Some(500), Some(5_000), Some(20_000)] {
                let out = normalize(&set, total);
                let d = total.unwrap_or_default();
                for pair in out.windows(2) {
                    assert!(pair[0].end_ms <= pair[1].start_ms, "total = {:?}", total);
                }
                for c in &out {
                    assert!(c.end_ms <= d);
                    if d >= MIN_CUE_LEN_MS {
                        assert!(c.len_ms() >= MIN_CUE_LEN_MS, "total = {:?}", total);
                    }
                }
            }
        }
    }

    #[test]
    fn test_duration_shorter_than_min_len() {
        let out = normalize(&[cue(0, 500, "a")], Some(30));
        assert_eq!(contents(&out), vec![(0, 30, "a")]);
    }
}
