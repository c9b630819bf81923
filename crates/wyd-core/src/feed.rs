use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostIcon {
    Mission,
    Community,
    Profile,
}

/// One activity-feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Milliseconds since the epoch at creation, bumped to stay unique.
    pub id: i64,
    pub user: String,
    pub action: String,
    pub icon: PostIcon,
    pub created_at: DateTime<Utc>,
}

/// Session-lifetime activity feed, newest first. Entries are never removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feed {
    posts: VecDeque<Post>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a post and return its id.
    pub fn publish(&mut self, user: &str, action: impl Into<String>, icon: PostIcon) -> i64 {
        let created_at = Utc::now();
        let mut id = created_at.timestamp_millis();
        if let Some(newest) = self.posts.front() {
            if id <= newest.id {
                id = newest.id + 1;
            }
        }
        self.posts.push_front(Post {
            id,
            user: user.to_string(),
            action: action.into(),
            icon,
            created_at,
        });
        id
    }

    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter()
    }

    pub fn latest(&self) -> Option<&Post> {
        self.posts.front()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Feed text for a completed mission.
pub fn completion_action(user: &str, mission_title: &str) -> String {
    format!("{user} ha completado la misión: {mission_title}!")
}

/// Feed text for a user joining with a fresh plan.
pub fn welcome_action(user: &str, plan_title: &str, first_mission: &str) -> String {
    format!(
        "¡Demos la bienvenida a {user}, que acaba de unirse al desafío \"{plan_title}\"! \
         Su primera misión es: \"{first_mission}\"."
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_prepends_newest_first() {
        let mut feed = Feed::new();
        feed.publish("Ana", "first", PostIcon::Mission);
        feed.publish("Ana", "second", PostIcon::Mission);
        let actions: Vec<&str> = feed.posts().map(|p| p.action.as_str()).collect();
        assert_eq!(actions, vec!["second", "first"]);
        assert_eq!(feed.latest().unwrap().action, "second");
    }

    #[test]
    fn ids_are_unique_even_within_one_millisecond() {
        let mut feed = Feed::new();
        let ids: Vec<i64> = (0..50)
            .map(|i| feed.publish("u", format!("p{i}"), PostIcon::Profile))
            .collect();
        for pair in ids.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert_eq!(feed.len(), 50);
    }

    #[test]
    fn completion_text() {
        assert_eq!(
            completion_action("Ana", "Correr 5k"),
            "Ana ha completado la misión: Correr 5k!"
        );
    }
}
