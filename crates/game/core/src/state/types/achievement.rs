//! Achievements: long-running counters over what the player has done.

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AchievementKind {
    /// Enemies defeated (`target` = enemy type, none for any).
    Kill,
    /// Player level reached.
    Level,
    /// Tiles discovered.
    Explore,
    /// Items picked up.
    Collect,
    /// Quests completed.
    QuestsCompleted,
    /// Whole seconds of play.
    Survive,
}

impl AchievementKind {
    /// Progress mirrors a current value instead of accumulating.
    const fn is_absolute(self) -> bool {
        matches!(self, Self::Level)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub kind: AchievementKind,
    pub target: Option<String>,
    pub progress: u32,
    pub max_progress: u32,
    pub unlocked: bool,
}

impl Achievement {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: AchievementKind,
        max_progress: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            target: None,
            progress: 0,
            max_progress,
            unlocked: false,
        }
    }

    /// Restricts the achievement to one subject, e.g. an enemy type.
    pub fn for_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    fn matches(&self, kind: AchievementKind, subject: Option<&str>) -> bool {
        self.kind == kind
            && !self.unlocked
            && self
                .target
                .as_deref()
                .is_none_or(|target| subject == Some(target))
    }
}

/// An achievement whose progress moved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AchievementProgress {
    pub achievement_id: String,
    pub unlocked: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Achievements {
    pub achievements: Vec<Achievement>,
}

impl Achievements {
    pub fn new(achievements: Vec<Achievement>) -> Self {
        Self { achievements }
    }

    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn unlocked(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.iter().filter(|a| a.unlocked)
    }

    /// Feeds `value` to every locked achievement of `kind` that accepts
    /// `subject`. Accumulating kinds add it, [`AchievementKind::Level`]
    /// takes it as the new high-water mark.
    pub fn record(
        &mut self,
        kind: AchievementKind,
        subject: Option<&str>,
        value: u32,
    ) -> Vec<AchievementProgress> {
        let mut progress = Vec::new();
        if value == 0 {
            return progress;
        }

        for achievement in self
            .achievements
            .iter_mut()
            .filter(|a| a.matches(kind, subject))
        {
            let next = if kind.is_absolute() {
                achievement.progress.max(value)
            } else {
                achievement.progress.saturating_add(value)
            }
            .min(achievement.max_progress);
            if next == achievement.progress {
                continue;
            }

            achievement.progress = next;
            achievement.unlocked = next >= achievement.max_progress;
            progress.push(AchievementProgress {
                achievement_id: achievement.id.clone(),
                unlocked: achievement.unlocked,
            });
        }

        progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> Achievements {
        Achievements::new(vec![
            Achievement::new("first_kill", "First Blood", AchievementKind::Kill, 1),
            Achievement::new("raider_slayer", "Raider Slayer", AchievementKind::Kill, 3)
                .for_target("raider"),
            Achievement::new("level_up", "Growing Stronger", AchievementKind::Level, 5),
        ])
    }

    #[test]
    fn targeted_kills_only_count_their_type() {
        let mut book = book();

        let progress = book.record(AchievementKind::Kill, Some("mutant"), 1);
        assert_eq!(progress.len(), 1);
        assert!(progress[0].unlocked);
        assert_eq!(book.get("raider_slayer").unwrap().progress, 0);

        book.record(AchievementKind::Kill, Some("raider"), 2);
        let progress = book.record(AchievementKind::Kill, Some("raider"), 5);
        let slayer = book.get("raider_slayer").unwrap();
        assert_eq!((slayer.progress, slayer.unlocked), (3, true));
        assert_eq!(progress[0].achievement_id, "raider_slayer");

        // Unlocked achievements stop moving.
        assert!(book.record(AchievementKind::Kill, Some("raider"), 1).is_empty());
    }

    #[test]
    fn level_tracks_the_high_water_mark() {
        let mut book = book();
        book.record(AchievementKind::Level, None, 3);
        assert!(book.record(AchievementKind::Level, None, 2).is_empty());
        assert_eq!(book.get("level_up").unwrap().progress, 3);

        let progress = book.record(AchievementKind::Level, None, 7);
        assert!(progress[0].unlocked);
        assert_eq!(book.get("level_up").unwrap().progress, 5);
        assert_eq!(book.unlocked().count(), 1);
    }
}
