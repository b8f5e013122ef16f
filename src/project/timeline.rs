use super::cue::{text_or_placeholder, Cue, CueId, MIN_CUE_LEN_MS, NEW_CUE_TEXT};
use crate::srt;
use crate::utils::{clamp_ms, Millis};

/// Which edge of a cue a resize touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
}

/// Direction for stepping through cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Result of removing a cue
#[derive(Debug, Clone)]
pub struct Deleted {
    pub cue: Cue,
    /// Cue that should take over the selection: next one, else previous one
    pub fallback: Option<CueId>,
}

/// Authoritative, always sorted and non-overlapping set of cues.
///
/// `cues` is re-sorted at the end of every mutation, so index neighbors are
/// time neighbors whenever an operation starts.
#[derive(Debug, Clone, Default)]
pub struct CueTimeline {
    cues: Vec<Cue>,
}

impl CueTimeline {
    pub fn new() -> Self {
        Self { cues: Vec::new() }
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn get(&self, id: CueId) -> Option<&Cue> {
        self.cues.iter().find(|c| c.id == id)
    }

    pub fn first_id(&self) -> Option<CueId> {
        self.cues.first().map(|c| c.id)
    }

    /// Cue under the playhead, if any
    pub fn active_at(&self, ms: Millis) -> Option<&Cue> {
        self.cues.iter().find(|c| c.contains(ms))
    }

    fn index_of(&self, id: CueId) -> Option<usize> {
        self.cues.iter().position(|c| c.id == id)
    }

    fn resort(&mut self) {
        self.cues.sort_by_key(|c| c.start_ms);
    }

    /// End of the cue before `idx`, or 0
    fn prev_end(&self, idx: usize) -> Millis {
        if idx > 0 {
            self.cues[idx - 1].end_ms
        } else {
            0
        }
    }

    /// Start of the cue after `idx`, else the duration, else unbounded
    fn next_start(&self, idx: usize, total_ms: Option<Millis>) -> Option<Millis> {
        let next = self.cues.get(idx + 1).map(|c| c.start_ms);
        match (next, total_ms) {
            (Some(n), Some(d)) => Some(n.min(d)),
            (Some(n), None) => Some(n),
            (None, d) => d,
        }
    }

    /// Replace the whole set, repairing it against the known duration
    pub fn replace_all(&mut self, cues: Vec<Cue>, total_ms: Option<Millis>) {
        self.cues = srt::normalize(&cues, total_ms);
        tracing::debug!(count = self.cues.len(), "Replaced cue set");
    }

    /// Re-establish the invariants once the media duration becomes known
    pub fn conform_to_duration(&mut self, total_ms: Millis) {
        if self.cues.iter().any(|c| c.end_ms > total_ms) {
            self.cues = srt::normalize(&self.cues, Some(total_ms));
            tracing::debug!(total_ms, "Conformed cues to media duration");
        }
    }

    /// Create a cue of `default_len_ms` at `at_ms`, fitted into the free gap
    /// it lands in. No-op without a known, non-zero duration or without room.
    pub fn create(
        &mut self,
        at_ms: Millis,
        default_len_ms: Millis,
        total_ms: Option<Millis>,
    ) -> Option<CueId> {
        let total = total_ms.filter(|d| *d > 0)?;

        let mut start = clamp_ms(at_ms, 0, (total - default_len_ms).max(0));

        // Inside a cue: start where it ends, unless that is taken too
        if let Some(covering) = self.active_at(start) {
            start = covering.end_ms;
            if self.active_at(start).is_some() {
                tracing::debug!(at_ms, "No room to create cue");
                return None;
            }
        }
        let limit = self
            .cues
            .iter()
            .find(|c| c.start_ms > start)
            .map_or(total, |next| next.start_ms.min(total));

        let end = clamp_ms(start + default_len_ms, start + MIN_CUE_LEN_MS, total).min(limit);
        if end - start < MIN_CUE_LEN_MS {
            tracing::debug!(at_ms, "No room to create cue");
            return None;
        }

        let cue = Cue::new(start, end, NEW_CUE_TEXT);
        let id = cue.id;
        self.cues.push(cue);
        self.resort();
        tracing::debug!(%id, start, end, "Created cue");
        Some(id)
    }

    /// Remove a cue and report which cue should inherit the selection
    pub fn delete(&mut self, id: CueId) -> Option<Deleted> {
        let idx = self.index_of(id)?;

        let fallback = self
            .cues
            .get(idx + 1)
            .or_else(|| idx.checked_sub(1).and_then(|i| self.cues.get(i)))
            .map(|c| c.id);

        let cue = self.cues.remove(idx);
        tracing::debug!(%id, "Deleted cue");
        Some(Deleted { cue, fallback })
    }

    /// Drag one edge; the other edge stays put
    pub fn resize_edge(
        &mut self,
        id: CueId,
        edge: Edge,
        proposed_ms: Millis,
        total_ms: Option<Millis>,
    ) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let lower = self.prev_end(idx);
        let upper = self.next_start(idx, total_ms);
        let cue = &mut self.cues[idx];

        let changed = match edge {
            Edge::Left => {
                let start = clamp_ms(proposed_ms, lower, cue.end_ms - MIN_CUE_LEN_MS);
                std::mem::replace(&mut cue.start_ms, start) != start
            }
            Edge::Right => {
                let min_end = cue.start_ms + MIN_CUE_LEN_MS;
                let end = match upper {
                    Some(max_end) => clamp_ms(proposed_ms, min_end, max_end),
                    None => proposed_ms.max(min_end),
                };
                std::mem::replace(&mut cue.end_ms, end) != end
            }
        };

        if changed {
            self.resort();
        }
        changed
    }

    /// Shift a cue by `delta_ms` keeping its length, stopping at neighbors
    pub fn move_by(&mut self, id: CueId, delta_ms: Millis, total_ms: Option<Millis>) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let len = self.cues[idx].len_ms();
        let lower = self.prev_end(idx);
        let upper = self
            .next_start(idx, total_ms)
            .map_or(Millis::MAX - len, |limit| limit - len);

        if upper < lower {
            return false;
        }

        let cue = &mut self.cues[idx];
        let start = clamp_ms(cue.start_ms.saturating_add(delta_ms), lower, upper);
        if start == cue.start_ms {
            return false;
        }

        cue.start_ms = start;
        cue.end_ms = start + len;
        self.resort();
        true
    }

    /// Grow or shrink a cue from its end
    pub fn adjust_length(&mut self, id: CueId, delta_ms: Millis, total_ms: Option<Millis>) -> bool {
        let Some(cue) = self.get(id) else {
            return false;
        };
        let proposed = cue.end_ms.saturating_add(delta_ms);
        self.resize_edge(id, Edge::Right, proposed, total_ms)
    }

    /// Step from `current` to the neighboring cue, clamped at both ends
    pub fn navigate(&self, current: Option<CueId>, direction: Direction) -> Option<CueId> {
        let last = self.cues.len().checked_sub(1)?;

        let target = match current {
            None => match direction {
                Direction::Next => 0,
                Direction::Previous => last,
            },
            Some(id) => {
                let idx = self.index_of(id)?;
                match direction {
                    Direction::Next => (idx + 1).min(last),
                    Direction::Previous => idx.saturating_sub(1),
                }
            }
        };

        Some(self.cues[target].id)
    }

    /// Replace a cue's text; empty text becomes the placeholder
    pub fn set_text(&mut self, id: CueId, text: &str) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let text = text_or_placeholder(text);
        if self.cues[idx].text == text {
            return false;
        }
        self.cues[idx].text = text;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOTAL: Option<Millis> = Some(10_000);

    fn timeline_with(spans: &[(Millis, Millis)]) -> (CueTimeline, Vec<CueId>) {
        let mut timeline = CueTimeline::new();
        let cues: Vec<Cue> = spans.iter().map(|&(s, e)| Cue::new(s, e, "x")).collect();
        let ids = cues.iter().map(|c| c.id).collect();
        timeline.replace_all(cues, TOTAL);
        (timeline, ids)
    }

    fn assert_invariants(timeline: &CueTimeline, total: Option<Millis>) {
        for cue in timeline.cues() {
            assert!(cue.start_ms >= 0);
            assert!(cue.len_ms() >= MIN_CUE_LEN_MS, "too short: {:?}", cue);
            if let Some(d) = total {
                assert!(cue.end_ms <= d);
            }
        }
        for pair in timeline.cues().windows(2) {
            assert!(pair[0].start_ms <= pair[1].start_ms);
            assert!(pair[0].end_ms <= pair[1].start_ms, "overlap: {:?}", pair);
        }
    }

    #[test]
    fn test_create_clamps_to_duration() {
        let mut timeline = CueTimeline::new();
        let id = timeline.create(10_000, 2_000, Some(11_000)).unwrap();
        let cue = timeline.get(id).unwrap();
        assert_eq!((cue.start_ms, cue.end_ms), (9_000, 11_000));
        assert_eq!(cue.text, NEW_CUE_TEXT);
    }

    #[test]
    fn test_create_without_duration_is_noop() {
        let mut timeline = CueTimeline::new();
        assert!(timeline.create(0, 2_000, None).is_none());
        assert!(timeline.create(0, 2_000, Some(0)).is_none());
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_create_short_media() {
        let mut timeline = CueTimeline::new();
        let id = timeline.create(500, 2_000, Some(1_000)).unwrap();
        let cue = timeline.get(id).unwrap();
        assert_eq!((cue.start_ms, cue.end_ms), (0, 1_000));
    }

    #[test]
    fn test_create_fits_into_gap() {
        let (mut timeline, _) = timeline_with(&[(1_000, 3_000), (4_000, 6_000)]);

        // Lands inside the first cue: starts at its end, stops at the next start
        let id = timeline.create(2_000, 2_000, TOTAL).unwrap();
        let cue = timeline.get(id).unwrap();
        assert_eq!((cue.start_ms, cue.end_ms), (3_000, 4_000));
        assert_invariants(&timeline, TOTAL);

        // No room left between 3_000 and 4_000
        assert!(timeline.create(3_500, 2_000, TOTAL).is_none());
        assert_eq!(timeline.len(), 3);
    }

    #[test]
    fn test_delete_picks_next_then_previous() {
        let (mut timeline, ids) = timeline_with(&[(0, 100), (200, 300), (400, 500)]);

        let deleted = timeline.delete(ids[1]).unwrap();
        assert_eq!(deleted.fallback, Some(ids[2]));

        let deleted = timeline.delete(ids[2]).unwrap();
        assert_eq!(deleted.fallback, Some(ids[0]));

        let deleted = timeline.delete(ids[0]).unwrap();
        assert_eq!(deleted.fallback, None);
        assert!(timeline.is_empty());

        assert!(timeline.delete(ids[0]).is_none());
    }

    #[test]
    fn test_delete_after_create_uses_time_order() {
        let (mut timeline, ids) = timeline_with(&[(0, 100), (5_000, 5_100)]);
        // Created last but sits between the two loaded cues
        let created = timeline.create(1_000, 500, TOTAL).unwrap();
        let deleted = timeline.delete(ids[0]).unwrap();
        assert_eq!(deleted.fallback, Some(created));
    }

    #[test]
    fn test_resize_edges() {
        let (mut timeline, ids) = timeline_with(&[(1_000, 2_000), (3_000, 4_000)]);

        assert!(timeline.resize_edge(ids[1], Edge::Left, 500, TOTAL));
        assert_eq!(timeline.get(ids[1]).unwrap().start_ms, 2_000);

        assert!(timeline.resize_edge(ids[1], Edge::Left, 3_990, TOTAL));
        assert_eq!(timeline.get(ids[1]).unwrap().start_ms, 3_950);

        assert!(timeline.resize_edge(ids[0], Edge::Right, 9_000, TOTAL));
        assert_eq!(timeline.get(ids[0]).unwrap().end_ms, 3_950);

        assert!(timeline.resize_edge(ids[1], Edge::Right, 20_000, TOTAL));
        assert_eq!(timeline.get(ids[1]).unwrap().end_ms, 10_000);

        // Same value again changes nothing
        assert!(!timeline.resize_edge(ids[1], Edge::Right, 20_000, TOTAL));
        assert_invariants(&timeline, TOTAL);
    }

    #[test]
    fn test_move_scenario_next_neighbor() {
        let (mut timeline, ids) = timeline_with(&[(500, 1_500), (3_000, 4_000)]);
        assert!(timeline.move_by(ids[0], 10_000, TOTAL));
        let cue = timeline.get(ids[0]).unwrap();
        assert_eq!((cue.start_ms, cue.end_ms), (2_000, 3_000));
    }

    #[test]
    fn test_move_respects_neighbors_and_duration() {
        let (mut timeline, ids) = timeline_with(&[(0, 1_000), (2_000, 3_000), (8_000, 9_000)]);

        assert!(timeline.move_by(ids[1], -5_000, TOTAL));
        assert_eq!(timeline.get(ids[1]).unwrap().start_ms, 1_000);
        assert!(!timeline.move_by(ids[1], -100, TOTAL));

        assert!(timeline.move_by(ids[2], 5_000, TOTAL));
        assert_eq!(timeline.get(ids[2]).unwrap().end_ms, 10_000);
        assert!(!timeline.move_by(ids[2], 1, TOTAL));
    }

    #[test]
    fn test_move_without_room_is_rejected() {
        let (mut timeline, ids) = timeline_with(&[(0, 1_000), (1_000, 2_000), (2_000, 3_000)]);
        assert!(!timeline.move_by(ids[1], 300, TOTAL));
        assert!(!timeline.move_by(ids[1], -300, TOTAL));
        assert_eq!(timeline.get(ids[1]).unwrap().start_ms, 1_000);
    }

    #[test]
    fn test_move_with_unknown_duration() {
        let (mut timeline, ids) = timeline_with(&[(0, 1_000)]);
        assert!(timeline.move_by(ids[0], 50_000, None));
        assert_eq!(timeline.get(ids[0]).unwrap().start_ms, 50_000);
    }

    #[test]
    fn test_adjust_length() {
        let (mut timeline, ids) = timeline_with(&[(0, 1_000), (1_200, 2_000)]);

        assert!(timeline.adjust_length(ids[0], 500, TOTAL));
        assert_eq!(timeline.get(ids[0]).unwrap().end_ms, 1_200);

        assert!(timeline.adjust_length(ids[0], -5_000, TOTAL));
        assert_eq!(timeline.get(ids[0]).unwrap().end_ms, MIN_CUE_LEN_MS);

        assert!(timeline.adjust_length(ids[1], 50_000, TOTAL));
        assert_eq!(timeline.get(ids[1]).unwrap().end_ms, 10_000);
    }

    #[test]
    fn test_navigate() {
        let (timeline, ids) = timeline_with(&[(0, 100), (200, 300), (400, 500)]);

        assert_eq!(timeline.navigate(None, Direction::Next), Some(ids[0]));
        assert_eq!(timeline.navigate(None, Direction::Previous), Some(ids[2]));
        assert_eq!(timeline.navigate(Some(ids[1]), Direction::Next), Some(ids[2]));
        assert_eq!(timeline.navigate(Some(ids[2]), Direction::Next), Some(ids[2]));
        assert_eq!(timeline.navigate(Some(ids[0]), Direction::Previous), Some(ids[0]));
        assert_eq!(timeline.navigate(Some(CueId::new()), Direction::Next), None);

        assert_eq!(CueTimeline::new().navigate(None, Direction::Next), None);
    }

    #[test]
    fn test_set_text_and_active_at() {
        let (mut timeline, ids) = timeline_with(&[(1_000, 2_000), (2_000, 3_000)]);
        assert!(timeline.set_text(ids[0], "  hello  "));
        assert_eq!(timeline.get(ids[0]).unwrap().text, "hello");
        assert!(timeline.set_text(ids[0], ""));
        assert_eq!(timeline.get(ids[0]).unwrap().text, "Subtitle");

        assert_eq!(timeline.active_at(1_500).map(|c| c.id), Some(ids[0]));
        assert_eq!(timeline.active_at(2_000).map(|c| c.id), Some(ids[1]));
        assert!(timeline.active_at(3_000).is_none());
    }

    #[test]
    fn test_conform_to_duration() {
        let mut timeline = CueTimeline::new();
        timeline.replace_all(vec![Cue::new(1_000, 2_000, "a"), Cue::new(4_000, 9_000, "b")], None);
        timeline.conform_to_duration(5_000);
        assert_eq!(timeline.cues()[1].end_ms, 5_000);
        assert_invariants(&timeline, Some(5_000));
    }

    #[test]
    fn test_shorter_media_drops_cues_past_the_end() {
        let spans = [(0, 5_000), (6_000, 7_000), (8_000, 9_000)];
        let mut timeline = CueTimeline::new();
        timeline.replace_all(spans.iter().map(|&(s, e)| Cue::new(s, e, "x")).collect(), None);
        timeline.conform_to_duration(5_000);
        assert_eq!(timeline.len(), 1);
        assert_invariants(&timeline, Some(5_000));

        let mut timeline = CueTimeline::new();
        timeline.replace_all(spans.iter().map(|&(s, e)| Cue::new(s, e, "x")).collect(), None);
        timeline.conform_to_duration(6_500);
        let spans: Vec<_> = timeline.cues().iter().map(|c| (c.start_ms, c.end_ms)).collect();
        assert_eq!(spans, vec![(0, 5_000), (6_000, 6_500)]);

        // Edges of the conformed set still respect neighbors and length
        let id = timeline.cues()[1].id;
        assert!(timeline.resize_edge(id, Edge::Left, 6_460, Some(6_500)));
        assert_eq!(timeline.get(id).map(|c| c.start_ms), Some(6_450));
        timeline.resize_edge(id, Edge::Left, 4_000, Some(6_500));
        assert_eq!(timeline.get(id).map(|c| c.start_ms), Some(5_000));
        assert_invariants(&timeline, Some(6_500));
    }

    #[test]
    fn test_invariants_hold_under_mixed_operations() {
        let mut timeline = CueTimeline::new();
        let mut ids = Vec::new();
        let mut seed: u64 = 42;
        let mut next = move |modulo: u64| {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            ((seed >> 33) % modulo) as Millis
        };

        for _ in 0..2_000 {
            let pick = |ids: &Vec<CueId>, n: Millis| ids.get(n as usize % ids.len().max(1)).copied();
            match next(6) {
                0 => {
                    if let Some(id) = timeline.create(next(10_000), 200 + next(3_000), TOTAL) {
                        ids.push(id);
                    }
                }
                1 => {
                    if let Some(id) = pick(&ids, next(100)) {
                        timeline.move_by(id, next(6_000) - 3_000, TOTAL);
                    }
                }
                2 => {
                    if let Some(id) = pick(&ids, next(100)) {
                        let edge = if next(2) == 0 { Edge::Left } else { Edge::Right };
                        timeline.resize_edge(id, edge, next(12_000) - 1_000, TOTAL);
                    }
                }
                3 => {
                    if let Some(id) = pick(&ids, next(100)) {
                        timeline.adjust_length(id, next(2_000) - 1_000, TOTAL);
                    }
                }
                4 => {
                    if let Some(id) = pick(&ids, next(100)) {
                        if next(3) == 0 {
                            timeline.delete(id);
                            ids.retain(|i| *i != id);
                        }
                    }
                }
                _ => {
                    let before: Vec<_> = timeline.cues().iter().map(|c| (c.id, c.start_ms, c.end_ms)).collect();
                    if let Some(id) = pick(&ids, next(100)) {
                        let delta = next(4_000) - 2_000;
                        let idx = before.iter().position(|b| b.0 == id).unwrap();
                        if timeline.move_by(id, delta, TOTAL) {
                            let moved = timeline.get(id).unwrap();
                            if idx > 0 {
                                assert!(moved.start_ms >= before[idx - 1].2);
                            }
                            let limit = before.get(idx + 1).map_or(10_000, |b| b.1);
                            assert!(moved.end_ms <= limit);
                        }
                    }
                }
            }
            assert_invariants(&timeline, TOTAL);
        }
    }
}
