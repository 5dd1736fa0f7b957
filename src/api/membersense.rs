//! MemberSense: Discord member, channel and message data, either fetched from
//! the MemberSense backend or generated for demo mode.

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

const DEMO_MEMBER_COUNT: usize = 100;
const DEMO_CHANNEL_COUNT: usize = 10;
const DEMO_MESSAGE_COUNT: usize = 100;
const DEMO_HISTORY_DAYS: i64 = 30;
const FIRST_NAMES: [&str; 10] = [
    "John", "Jane", "Alice", "Bob", "Charlie", "David", "Eva", "Frank", "Grace", "Hannah",
];

#[derive(Debug, thiserror::Error)]
pub enum MemberSenseError {
    #[error("MemberSense request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("MemberSense backend answered with status {0}")]
    Status(u16),
    #[error("no session token provided")]
    MissingSession,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataMode {
    #[default]
    Demo,
    Production,
}

impl DataMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Demo => Self::Production,
            Self::Production => Self::Demo,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Demo => "Demo Mode",
            Self::Production => "Production Mode",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub content: String,
    pub author: Author,
    pub timestamp: DateTime<Utc>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

pub struct MemberSenseClient {
    base_url: String,
    session_id: String,
}

impl MemberSenseClient {
    pub fn new(base_url: &str, session_id: &str) -> Result<Self, MemberSenseError> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(MemberSenseError::MissingSession);
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session_id: session_id.to_string(),
        })
    }

    pub fn members_url(&self) -> String {
        format!("{}/members", self.base_url)
    }

    pub fn channels_url(&self) -> String {
        format!("{}/channels", self.base_url)
    }

    pub fn messages_url(&self, channel_id: &str) -> String {
        format!(
            "{}/messages?channelId={}",
            self.base_url,
            urlencoding::encode(channel_id)
        )
    }

    pub async fn fetch_members(&self) -> Result<Vec<Member>, MemberSenseError> {
        self.get_json(&self.members_url()).await
    }

    pub async fn fetch_channels(&self) -> Result<Vec<Channel>, MemberSenseError> {
        self.get_json(&self.channels_url()).await
    }

    pub async fn fetch_messages(&self, channel_id: &str) -> Result<Vec<Message>, MemberSenseError> {
        self.get_json(&self.messages_url(channel_id)).await
    }

    async fn get_json<T>(&self, url: &str) -> Result<T, MemberSenseError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = HTTP_CLIENT
            .get(url)
            .header("Authorization", &self.session_id)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MemberSenseError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}

pub fn demo_members() -> Vec<Member> {
    (0..DEMO_MEMBER_COUNT)
        .map(|i| {
            let name = FIRST_NAMES[i % FIRST_NAMES.len()];
            Member {
                id: (i + 1).to_string(),
                username: format!("{name} {}", i + 1),
                avatar: format!("https://via.placeholder.com/150?text={name}"),
                email: (i % 2 == 0).then(|| format!("{}{}@example.com", name.to_lowercase(), i + 1)),
                role: "Member".to_string(),
            }
        })
        .collect()
}

pub fn demo_channels<R: Rng>(rng: &mut R) -> Vec<Channel> {
    (0..DEMO_CHANNEL_COUNT)
        .map(|i| {
            let suffix: String = (0..5)
                .map(|_| rng.sample(Alphanumeric) as char)
                .collect::<String>()
                .to_lowercase();
            Channel {
                id: format!("channel-{}", i + 1),
                name: format!("Channel {} {suffix}", i + 1),
            }
        })
        .collect()
}

/// Messages for one channel, newest first, spread over the last 30 days.
pub fn demo_messages<R: Rng>(rng: &mut R, channel_id: &str, now: DateTime<Utc>) -> Vec<Message> {
    let authors = [
        ("user1", "Alice", "A"),
        ("user2", "Bob", "B"),
        ("user3", "Charlie", "C"),
        ("user4", "David", "D"),
    ];
    let window_ms = Duration::days(DEMO_HISTORY_DAYS).num_milliseconds();
    let mut messages: Vec<Message> = (0..DEMO_MESSAGE_COUNT)
        .map(|i| {
            let (id, name, initial) = authors[rng.gen_range(0..authors.len())];
            let age = Duration::milliseconds(rng.gen_range(0..=window_ms));
            Message {
                id: format!("msg-{channel_id}-{}", i + 1),
                content: format!(
                    "This is a fake message {} in channel {channel_id}. Lorem ipsum dolor sit amet, consectetur adipiscing elit.",
                    i + 1
                ),
                author: Author {
                    id: id.to_string(),
                    name: name.to_string(),
                    avatar: format!("https://via.placeholder.com/40?text={initial}"),
                },
                timestamp: now - age,
            }
        })
        .collect();
    messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    messages
}

/// Searchable, paginated view over a member list.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDirectory {
    members: Vec<Member>,
    query: String,
    columns: usize,
    rows: usize,
}

impl MemberDirectory {
    pub fn new(members: Vec<Member>) -> Self {
        Self {
            members,
            query: String::new(),
            columns: 3,
            rows: 3,
        }
    }

    pub fn with_grid(mut self, columns: usize, rows: usize) -> Self {
        self.columns = columns.max(1);
        self.rows = rows.max(1);
        self
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_lowercase();
    }

    pub fn page_size(&self) -> usize {
        self.columns * self.rows
    }

    pub fn filtered(&self) -> Vec<&Member> {
        self.members
            .iter()
            .filter(|m| {
                self.query.is_empty()
                    || m.username.to_lowercase().contains(&self.query)
                    || m.email
                        .as_ref()
                        .is_some_and(|e| e.to_lowercase().contains(&self.query))
            })
            .collect()
    }

    pub fn page_count(&self) -> usize {
        self.filtered().len().div_ceil(self.page_size())
    }

    pub fn page(&self, page: usize) -> Vec<&Member> {
        self.filtered()
            .into_iter()
            .skip(page * self.page_size())
            .take(self.page_size())
            .collect()
    }

    /// Page after `page`, wrapping to the first.
    pub fn next_page(&self, page: usize) -> usize {
        match self.page_count() {
            0 => 0,
            count => (page + 1) % count,
        }
    }

    pub fn prev_page(&self, page: usize) -> usize {
        match self.page_count() {
            0 => 0,
            count => (page % count + count - 1) % count,
        }
    }
}
