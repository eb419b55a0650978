//! Feature toggles shared between the control task and the overlay cycle.

use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

use crate::memory::layout::timing;

/// Independently switchable overlay features, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
pub enum Feature {
    #[strum(serialize = "Team check")]
    TeamFilter,
    #[strum(serialize = "Head circle")]
    HeadMarker,
    #[strum(serialize = "Skeleton")]
    Skeleton,
    #[strum(serialize = "Box")]
    Box,
    #[strum(serialize = "Health bar")]
    HealthBar,
    #[strum(serialize = "Health text")]
    HealthText,
    #[strum(serialize = "Name")]
    Name,
}

impl Feature {
    /// Menu key selecting this feature ('1'..='7').
    pub fn menu_key(self) -> char {
        char::from(b'1' + self as u8)
    }

    pub fn from_menu_key(key: char) -> Option<Self> {
        Self::iter().find(|f| f.menu_key() == key)
    }
}

/// Point-in-time copy of the settings, taken once per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    pub team_filter: bool,
    pub head_marker: bool,
    pub skeleton: bool,
    pub bounding_box: bool,
    pub health_bar: bool,
    pub health_text: bool,
    pub name: bool,
    pub target_fps: u32,
}

impl Default for SettingsSnapshot {
    fn default() -> Self {
        Self {
            team_filter: true,
            head_marker: true,
            skeleton: true,
            bounding_box: true,
            health_bar: true,
            health_text: true,
            name: true,
            target_fps: timing::DEFAULT_TARGET_FPS,
        }
    }
}

impl SettingsSnapshot {
    pub fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::TeamFilter => self.team_filter,
            Feature::HeadMarker => self.head_marker,
            Feature::Skeleton => self.skeleton,
            Feature::Box => self.bounding_box,
            Feature::HealthBar => self.health_bar,
            Feature::HealthText => self.health_text,
            Feature::Name => self.name,
        }
    }

    fn set(&mut self, feature: Feature, enabled: bool) {
        let slot = match feature {
            Feature::TeamFilter => &mut self.team_filter,
            Feature::HeadMarker => &mut self.head_marker,
            Feature::Skeleton => &mut self.skeleton,
            Feature::Box => &mut self.bounding_box,
            Feature::HealthBar => &mut self.health_bar,
            Feature::HealthText => &mut self.health_text,
            Feature::Name => &mut self.name,
        };
        *slot = enabled;
    }
}

/// Lock-free settings store.
///
/// Each field is an independent atomic; readers may observe a change one
/// cycle late, which is acceptable for toggles.
pub struct OverlaySettings {
    flags: [AtomicBool; Feature::COUNT],
    target_fps: AtomicU32,
    fps_range: RangeInclusive<u32>,
}

impl OverlaySettings {
    pub fn new(initial: SettingsSnapshot, fps_range: RangeInclusive<u32>) -> Self {
        let flags = std::array::from_fn(|_| AtomicBool::new(false));
        let settings = Self {
            flags,
            target_fps: AtomicU32::new(timing::DEFAULT_TARGET_FPS),
            fps_range,
        };
        for feature in Feature::iter() {
            settings.set(feature, initial.is_enabled(feature));
        }
        let fps = initial
            .target_fps
            .clamp(*settings.fps_range.start(), *settings.fps_range.end());
        settings.target_fps.store(fps, Ordering::Relaxed);
        settings
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.flags[feature as usize].load(Ordering::Relaxed)
    }

    pub fn set(&self, feature: Feature, enabled: bool) {
        self.flags[feature as usize].store(enabled, Ordering::Relaxed);
    }

    /// Flip a feature and return its new state.
    pub fn toggle(&self, feature: Feature) -> bool {
        !self.flags[feature as usize].fetch_xor(true, Ordering::Relaxed)
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps.load(Ordering::Relaxed)
    }

    pub fn fps_range(&self) -> RangeInclusive<u32> {
        self.fps_range.clone()
    }

    /// Apply a new target rate. Values outside the accepted range are
    /// rejected and leave the current rate unchanged.
    pub fn set_target_fps(&self, fps: u32) -> bool {
        if !self.fps_range.contains(&fps) {
            return false;
        }
        self.target_fps.store(fps, Ordering::Relaxed);
        true
    }

    pub fn snapshot(&self) -> SettingsSnapshot {
        let mut snapshot = SettingsSnapshot {
            target_fps: self.target_fps(),
            ..SettingsSnapshot::default()
        };
        for feature in Feature::iter() {
            snapshot.set(feature, self.is_enabled(feature));
        }
        snapshot
    }
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self::new(
            SettingsSnapshot::default(),
            timing::MIN_TARGET_FPS..=timing::MAX_TARGET_FPS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_menu_keys() {
        assert_eq!(Feature::TeamFilter.menu_key(), '1');
        assert_eq!(Feature::Name.menu_key(), '7');
        assert_eq!(Feature::from_menu_key('4'), Some(Feature::Box));
        assert_eq!(Feature::from_menu_key('8'), None);
        assert_eq!(Feature::from_menu_key('0'), None);
    }

    #[test]
    fn test_toggle_returns_new_state() {
        let settings = OverlaySettings::default();
        assert!(settings.is_enabled(Feature::Skeleton));
        assert!(!settings.toggle(Feature::Skeleton));
        assert!(!settings.snapshot().skeleton);
        assert!(settings.toggle(Feature::Skeleton));
        assert!(settings.snapshot().skeleton);
    }

    #[test]
    fn test_initial_snapshot_round_trips() {
        let initial = SettingsSnapshot {
            team_filter: false,
            name: false,
            target_fps: 144,
            ..SettingsSnapshot::default()
        };
        let settings = OverlaySettings::new(initial, 30..=240);
        assert_eq!(settings.snapshot(), initial);
    }

    #[test]
    fn test_initial_fps_is_clamped() {
        let initial = SettingsSnapshot {
            target_fps: 1000,
            ..SettingsSnapshot::default()
        };
        let settings = OverlaySettings::new(initial, 30..=240);
        assert_eq!(settings.target_fps(), 240);
    }

    #[test]
    fn test_set_target_fps_rejects_out_of_range() {
        let settings = OverlaySettings::default();
        assert!(settings.set_target_fps(30));
        assert!(settings.set_target_fps(240));
        assert!(!settings.set_target_fps(29));
        assert!(!settings.set_target_fps(241));
        assert_eq!(settings.target_fps(), 240);
    }

    #[test]
    fn test_visible_across_threads() {
        let settings = Arc::new(OverlaySettings::default());
        let writer = Arc::clone(&settings);
        thread::spawn(move || {
            writer.set(Feature::TeamFilter, false);
            writer.set_target_fps(120);
        })
        .join()
        .unwrap();

        let snapshot = settings.snapshot();
        assert!(!snapshot.team_filter);
        assert_eq!(snapshot.target_fps, 120);
    }
}
