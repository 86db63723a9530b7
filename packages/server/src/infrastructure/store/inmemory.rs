//! InMemory Shared Store 実装
//!
//! HashMap をインメモリ DB として使用する `SharedStore` の実装。
//! 単一プロセスでの起動やテストで使用します。同じインスタンスを複数の
//! ノード（AppState）で共有すれば、プロセス内でマルチノード構成を再現できます。

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use super::{SharedStore, StoreError, StoreMessage, Subscription};

/// Value held by a key
#[derive(Debug, Clone)]
enum Entry {
    Hash(HashMap<String, String>),
    Set(BTreeSet<String>),
    List(Vec<String>),
}

/// A live pattern subscription
struct PatternSubscriber {
    pattern: String,
    sender: mpsc::UnboundedSender<StoreMessage>,
}

/// インメモリ Shared Store 実装
#[derive(Default)]
pub struct InMemorySharedStore {
    entries: Mutex<HashMap<String, Entry>>,
    subscribers: Mutex<Vec<PatternSubscriber>>,
}

impl InMemorySharedStore {
    /// 新しい InMemorySharedStore を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys currently holding a value, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let entries = self.entries.lock().await;
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Close every live subscription, as a lost connection would.
    #[cfg(test)]
    pub(crate) async fn close_subscriptions(&self) {
        self.subscribers.lock().await.clear();
    }
}

#[async_trait]
impl SharedStore for InMemorySharedStore {
    async fn hash_set_all(
        &self,
        key: &str,
        fields: Vec<(String, String)>,
    ) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Hash(HashMap::new()));
        match entry {
            Entry::Hash(hash) => {
                hash.extend(fields);
                Ok(())
            }
            _ => Err(StoreError::WrongType(key.to_string())),
        }
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let entries = self.entries.lock().await;
        match entries.get(key) {
            None => Ok(HashMap::new()),
            Some(Entry::Hash(hash)) => Ok(hash.clone()),
            Some(_) => Err(StoreError::WrongType(key.to_string())),
        }
    }

    async fn hash_increment(&self, key: &str, field: &str, delta: i64) -> Result<i64, StoreError> {
        let mut entries = self.entries.lock().await;
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Hash(HashMap::new()));
        let Entry::Hash(hash) = entry else {
            return Err(StoreError::WrongType(key.to_string()));
        };

        let current = match hash.get(field) {
            Some(value) => value.parse::<i64>().map_err(|_| {
                StoreError::Unavailable(format!("hash field '{field}' is not an integer"))
            })?,
            None => 0,
        };
        let next = current.checked_add(delta).ok_or_else(|| {
            StoreError::Unavailable(format!("increment of hash field '{field}' would overflow"))
        })?;
        hash.insert(field.to_string(), next.to_string());
        Ok(next)
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let entries = self.entries.lock().await;
        Ok(entries.contains_key(key))
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().await;
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Set(BTreeSet::new()));
        match entry {
            Entry::Set(set) => Ok(set.insert(member.to_string())),
            _ => Err(StoreError::WrongType(key.to_string())),
        }
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().await;
        let (removed, now_empty) = match entries.get_mut(key) {
            None => return Ok(false),
            Some(Entry::Set(set)) => (set.remove(member), set.is_empty()),
            Some(_) => return Err(StoreError::WrongType(key.to_string())),
        };
        // Empty sets cease to exist
        if now_empty {
            entries.remove(key);
        }
        Ok(removed)
    }

    async fn set_is_member(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let entries = self.entries.lock().await;
        match entries.get(key) {
            None => Ok(false),
            Some(Entry::Set(set)) => Ok(set.contains(member)),
            Some(_) => Err(StoreError::WrongType(key.to_string())),
        }
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let entries = self.entries.lock().await;
        match entries.get(key) {
            None => Ok(Vec::new()),
            Some(Entry::Set(set)) => Ok(set.iter().cloned().collect()),
            Some(_) => Err(StoreError::WrongType(key.to_string())),
        }
    }

    async fn list_push(&self, key: &str, value: String) -> Result<u64, StoreError> {
        let mut entries = self.entries.lock().await;
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::List(Vec::new()));
        match entry {
            Entry::List(list) => {
                list.push(value);
                Ok(list.len() as u64)
            }
            _ => Err(StoreError::WrongType(key.to_string())),
        }
    }

    async fn list_range(
        &self,
        key: &str,
        start: i64,
        stop: i64,
    ) -> Result<Vec<String>, StoreError> {
        let entries = self.entries.lock().await;
        match entries.get(key) {
            None => Ok(Vec::new()),
            Some(Entry::List(list)) => Ok(match resolve_range(list.len(), start, stop) {
                Some((from, to)) => list[from..=to].to_vec(),
                None => Vec::new(),
            }),
            Some(_) => Err(StoreError::WrongType(key.to_string())),
        }
    }

    async fn list_len(&self, key: &str) -> Result<u64, StoreError> {
        let entries = self.entries.lock().await;
        match entries.get(key) {
            None => Ok(0),
            Some(Entry::List(list)) => Ok(list.len() as u64),
            Some(_) => Err(StoreError::WrongType(key.to_string())),
        }
    }

    async fn delete(&self, keys: Vec<String>) -> Result<u64, StoreError> {
        let mut entries = self.entries.lock().await;
        let removed = keys
            .iter()
            .filter(|key| entries.remove(key.as_str()).is_some())
            .count();
        Ok(removed as u64)
    }

    async fn publish(&self, channel: &str, payload: String) -> Result<u64, StoreError> {
        let mut subscribers = self.subscribers.lock().await;
        subscribers.retain(|subscriber| !subscriber.sender.is_closed());

        let mut receivers = 0;
        for subscriber in subscribers
            .iter()
            .filter(|subscriber| glob_match(&subscriber.pattern, channel))
        {
            let message = StoreMessage {
                channel: channel.to_string(),
                payload: payload.clone(),
            };
            if subscriber.sender.send(message).is_ok() {
                receivers += 1;
            }
        }
        Ok(receivers)
    }

    async fn subscribe_pattern(&self, pattern: &str) -> Result<Subscription, StoreError> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.lock().await.push(PatternSubscriber {
            pattern: pattern.to_string(),
            sender,
        });
        Ok(Subscription::new(receiver))
    }
}

/// Resolve an inclusive `[start, stop]` range with negative indexes counted
/// from the tail. `None` when the range selects nothing.
fn resolve_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if start > stop || start >= len || stop < 0 {
        return None;
    }
    Some((start as usize, stop as usize))
}

/// Glob matching with `*` (any run) and `?` (any single character).
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((star_p, star_t)) = backtrack {
            p = star_p + 1;
            t = star_t + 1;
            backtrack = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|c| *c == '*')
}
