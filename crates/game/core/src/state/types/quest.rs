//! Quest log and objective progress.

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ObjectiveKind {
    /// Defeat enemies of a type (`target` = enemy type).
    Kill,
    /// Pick up items (`target` = item id, or `items` for any).
    Collect,
    /// Discover tiles (`target` = `tiles`).
    Explore,
    /// Talk to an NPC (`target` = npc id, or `npc` for any).
    Talk,
}

impl ObjectiveKind {
    /// Wildcard target matching any subject of this kind.
    pub const fn wildcard(self) -> Option<&'static str> {
        match self {
            Self::Kill => None,
            Self::Collect => Some("items"),
            Self::Explore => Some("tiles"),
            Self::Talk => Some("npc"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum QuestStatus {
    #[default]
    Available,
    Active,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestObjective {
    pub id: String,
    pub kind: ObjectiveKind,
    pub target: String,
    pub current: u32,
    pub required: u32,
    pub completed: bool,
}

impl QuestObjective {
    pub fn new(
        id: impl Into<String>,
        kind: ObjectiveKind,
        target: impl Into<String>,
        required: u32,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            target: target.into(),
            current: 0,
            required,
            completed: false,
        }
    }

    fn matches(&self, kind: ObjectiveKind, subject: &str) -> bool {
        self.kind == kind
            && !self.completed
            && (self.target == subject || kind.wildcard() == Some(self.target.as_str()))
    }

    fn advance(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.required);
        self.completed = self.current >= self.required;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub status: QuestStatus,
    pub objectives: Vec<QuestObjective>,
    pub experience_reward: u32,
}

impl Quest {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: QuestStatus::Active,
            objectives: Vec::new(),
            experience_reward: 0,
        }
    }

    pub fn with_objective(mut self, objective: QuestObjective) -> Self {
        self.objectives.push(objective);
        self
    }

    pub fn with_reward(mut self, experience: u32) -> Self {
        self.experience_reward = experience;
        self
    }

    pub fn with_status(mut self, status: QuestStatus) -> Self {
        self.status = status;
        self
    }

    pub fn objective(&self, id: &str) -> Option<&QuestObjective> {
        self.objectives.iter().find(|o| o.id == id)
    }
}

/// Progress notification produced by [`QuestLog::record`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestProgress {
    pub quest_id: String,
    pub objective_id: String,
    pub quest_completed: bool,
    pub experience_reward: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestLog {
    pub quests: Vec<Quest>,
}

impl QuestLog {
    pub fn new(quests: Vec<Quest>) -> Self {
        Self { quests }
    }

    pub fn quest(&self, id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == id)
    }

    /// Activates an available quest. Returns false if unknown or not available.
    pub fn start(&mut self, id: &str) -> bool {
        match self.quests.iter_mut().find(|q| q.id == id) {
            Some(quest) if quest.status == QuestStatus::Available => {
                quest.status = QuestStatus::Active;
                true
            }
            _ => false,
        }
    }

    /// Advances every matching objective of every active quest.
    pub fn record(&mut self, kind: ObjectiveKind, subject: &str, amount: u32) -> Vec<QuestProgress> {
        let mut progress = Vec::new();
        if amount == 0 {
            return progress;
        }

        for quest in self
            .quests
            .iter_mut()
            .filter(|q| q.status == QuestStatus::Active)
        {
            for objective in quest.objectives.iter_mut() {
                if objective.matches(kind, subject) {
                    objective.advance(amount);
                    progress.push(QuestProgress {
                        quest_id: quest.id.clone(),
                        objective_id: objective.id.clone(),
                        quest_completed: false,
                        experience_reward: 0,
                    });
                }
            }

            if !quest.objectives.is_empty() && quest.objectives.iter().all(|o| o.completed) {
                quest.status = QuestStatus::Completed;
                if let Some(last) = progress.iter_mut().rev().find(|p| p.quest_id == quest.id) {
                    last.quest_completed = true;
                    last.experience_reward = quest.experience_reward;
                }
            }
        }

        progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log() -> QuestLog {
        QuestLog::new(vec![
            Quest::new("raider_problem", "Raider Problem")
                .with_objective(QuestObjective::new("kill_raiders", ObjectiveKind::Kill, "raider", 2))
                .with_reward(50),
            Quest::new("first_steps", "First Steps")
                .with_objective(QuestObjective::new("explore", ObjectiveKind::Explore, "tiles", 10))
                .with_objective(QuestObjective::new("talk", ObjectiveKind::Talk, "npc", 1)),
        ])
    }

    #[test]
    fn kill_objective_matches_enemy_type_only() {
        let mut log = log();
        assert!(log.record(ObjectiveKind::Kill, "mutant", 1).is_empty());

        let progress = log.record(ObjectiveKind::Kill, "raider", 1);
        assert_eq!(progress.len(), 1);
        assert_eq!(log.quest("raider_problem").unwrap().objectives[0].current, 1);
    }

    #[test]
    fn quest_completes_when_all_objectives_done() {
        let mut log = log();
        log.record(ObjectiveKind::Kill, "raider", 1);
        let progress = log.record(ObjectiveKind::Kill, "raider", 5);

        assert!(progress[0].quest_completed);
        assert_eq!(progress[0].experience_reward, 50);
        let quest = log.quest("raider_problem").unwrap();
        assert_eq!(quest.status, QuestStatus::Completed);
        // Progress is capped at the requirement.
        assert_eq!(quest.objectives[0].current, 2);
    }

    #[test]
    fn wildcard_targets_match_any_subject() {
        let mut log = log();
        log.record(ObjectiveKind::Talk, "trader_joe", 1);
        log.record(ObjectiveKind::Explore, "tiles", 12);
        assert_eq!(
            log.quest("first_steps").unwrap().status,
            QuestStatus::Completed
        );
    }

    #[test]
    fn inactive_quests_do_not_progress() {
        let mut log = QuestLog::new(vec![
            Quest::new("later", "Later")
                .with_status(QuestStatus::Available)
                .with_objective(QuestObjective::new("k", ObjectiveKind::Kill, "robot", 1)),
        ]);
        assert!(log.record(ObjectiveKind::Kill, "robot", 1).is_empty());
        assert!(log.start("later"));
        assert_eq!(log.record(ObjectiveKind::Kill, "robot", 1).len(), 1);
    }
}
