use super::MediaSource;
use crate::utils::Millis;

/// Default slack between the wanted and the reported position while paused
pub const DEFAULT_SEEK_TOLERANCE_MS: Millis = 10;

/// Turns explicit seeks into single writes to the media source.
///
/// Every request bumps `epoch`. While playing, the target is written only when
/// `epoch` has not been applied yet, so playback ticks never re-seek. While
/// paused, the desired position is authoritative and written whenever the
/// source has drifted from it by more than the tolerance.
#[derive(Debug)]
pub struct SeekCoordinator {
    epoch: u64,
    applied_epoch: u64,
    target_ms: Millis,
    tolerance_ms: Millis,
    writes: u64,
}

impl SeekCoordinator {
    pub fn new(tolerance_ms: Millis) -> Self {
        Self {
            epoch: 0,
            applied_epoch: 0,
            target_ms: 0,
            tolerance_ms: tolerance_ms.max(0),
            writes: 0,
        }
    }

    /// Record an explicit seek; a newer request replaces an unapplied one
    pub fn request(&mut self, target_ms: Millis) -> u64 {
        self.epoch += 1;
        self.target_ms = target_ms;
        tracing::debug!(epoch = self.epoch, target_ms, "Seek requested");
        self.epoch
    }

    /// Target of a seek that has not reached the source yet
    pub fn pending(&self) -> Option<Millis> {
        (self.epoch != self.applied_epoch).then_some(self.target_ms)
    }

    /// Number of positions written to the source so far
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Bring the source in line with explicit seeks; returns what was written
    pub fn reconcile(
        &mut self,
        source: &mut dyn MediaSource,
        desired_ms: Millis,
        playing: bool,
    ) -> Option<Millis> {
        if playing {
            let target = self.pending()?;
            self.applied_epoch = self.epoch;
            return Some(self.write(source, target));
        }

        self.applied_epoch = self.epoch;
        if (source.position_ms() - desired_ms).abs() > self.tolerance_ms {
            Some(self.write(source, desired_ms))
        } else {
            None
        }
    }

    fn write(&mut self, source: &mut dyn MediaSource, ms: Millis) -> Millis {
        source.seek_to(ms);
        self.writes += 1;
        tracing::debug!(epoch = self.epoch, ms, writes = self.writes, "Seek applied");
        ms
    }
}

impl Default for SeekCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_SEEK_TOLERANCE_MS)
    }
}
