use ball_tracker_common::params::{Control, ParameterSet};
use tokio::sync::watch;
use tracing::debug;

use super::ParameterSource;

/// Interactive provider: operators move individual controls through a
/// [`TuningHandle`], the pipeline takes whole snapshots.
///
/// Every update replaces the full set (last write wins). A frame already in
/// flight keeps the snapshot it started with; the change shows up on the next.
pub struct LiveTuning {
    tx: watch::Sender<ParameterSet>,
    rx: watch::Receiver<ParameterSet>,
}

/// Cloneable write side of a [`LiveTuning`].
#[derive(Clone)]
pub struct TuningHandle {
    tx: watch::Sender<ParameterSet>,
}

impl LiveTuning {
    /// Start from `initial`, clamped into a valid set.
    pub fn new(initial: ParameterSet) -> Self {
        let (tx, rx) = watch::channel(initial.clamped());
        Self { tx, rx }
    }

    pub fn handle(&self) -> TuningHandle {
        TuningHandle {
            tx: self.tx.clone(),
        }
    }
}

impl ParameterSource for LiveTuning {
    fn snapshot(&self) -> ParameterSet {
        *self.rx.borrow()
    }

    fn name(&self) -> &str {
        "live"
    }
}

impl TuningHandle {
    /// Move one control. Out-of-range values and inverted pairs are clamped so
    /// readers only ever observe a valid set. Returns the set now in effect.
    pub fn set(&self, control: Control, value: u32) -> ParameterSet {
        self.tx.send_modify(|params| {
            *params = params.with(control, value).clamped();
        });
        let current = *self.tx.borrow();
        debug!(
            control = control.name(),
            requested = value,
            applied = current.get(control),
            "tuning control moved"
        );
        current
    }

    /// Replace every control at once.
    pub fn replace(&self, params: ParameterSet) -> ParameterSet {
        let clamped = params.clamped();
        self.tx.send_replace(clamped);
        clamped
    }

    pub fn current(&self) -> ParameterSet {
        *self.tx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_starts_from_initial() {
        let initial = ParameterSet::default().with(Control::HueMin, 20);
        let live = LiveTuning::new(initial);
        assert_eq!(live.snapshot(), initial);
    }

    #[test]
    fn updates_are_clamped() {
        let live = LiveTuning::new(ParameterSet::default());
        let handle = live.handle();
        handle.set(Control::HueMax, 999);
        assert_eq!(live.snapshot().hue_max, 180);

        handle.set(Control::ValMin, 200);
        handle.set(Control::ValMax, 100);
        let p = live.snapshot();
        assert_eq!((p.val_min, p.val_max), (200, 200));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn snapshot_is_isolated_from_later_writes() {
        let live = LiveTuning::new(ParameterSet::default());
        let before = live.snapshot();
        live.handle().set(Control::RegionX, 40);
        assert_eq!(before.region_x, 0);
        assert_eq!(live.snapshot().region_x, 40);
    }

    #[test]
    fn replace_swaps_the_whole_set() {
        let live = LiveTuning::new(ParameterSet::default());
        let next = ParameterSet::default()
            .with(Control::SizeMin, 3)
            .with(Control::SizeMax, 9);
        assert_eq!(live.handle().replace(next), next);
        assert_eq!(live.snapshot(), next);
    }

    #[tokio::test]
    async fn last_write_wins_across_tasks() {
        let live = LiveTuning::new(ParameterSet::default());
        let handle = live.handle();
        let writer = tokio::spawn(async move {
            for v in 0..=50 {
                handle.set(Control::SatMin, v);
                tokio::task::yield_now().await;
            }
        });
        writer.await.unwrap();
        assert_eq!(live.snapshot().sat_min, 50);
    }
}
