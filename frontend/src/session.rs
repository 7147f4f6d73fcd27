//! 会话存储
//!
//! 进程内唯一的共享可变状态：当前登录身份。构造时从持久化存储恢复一次，
//! 之后每次变更都同步写回存储，并推送给所有订阅者。

use crate::token::{TokenClaims, TokenError};
use crate::web::KeyValueStorage;
use chrono::{DateTime, Utc};
use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// 会话在持久化存储中的键名
pub const STORAGE_SESSION_KEY: &str = "currentUser";

/// 当前登录用户
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: Option<i64>,
    pub username: String,
    pub email: Option<String>,
    pub token: String,
}

impl Session {
    /// 从服务端签发的令牌解码出会话（不校验签名）
    pub fn from_token(token: &str) -> Result<Self, TokenError> {
        let claims = TokenClaims::decode(token)?;
        Ok(Self {
            id: claims.identity(),
            username: claims.subject().unwrap_or_default().to_string(),
            email: claims.email.clone(),
            token: token.to_string(),
        })
    }

    /// 会话在 `now` 时刻是否有效：令牌非空、可解码且未过期
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.token.is_empty() {
            return false;
        }
        match TokenClaims::decode(&self.token) {
            Ok(claims) => !claims.is_expired_at(now),
            Err(_) => false,
        }
    }
}

/// 会话存储
///
/// 通过 `Arc` 在应用内共享；状态变更与事件推送在同一次调用内同步完成。
pub struct SessionStore<S: KeyValueStorage> {
    storage: S,
    current: Mutex<Option<Session>>,
    subscribers: Mutex<Vec<UnboundedSender<Option<Session>>>>,
}

impl<S: KeyValueStorage> SessionStore<S> {
    /// 创建存储并从持久化存储恢复会话
    ///
    /// 存储中的内容无法解析时视为未登录。
    pub fn hydrate(storage: S) -> Self {
        let current = storage
            .get(STORAGE_SESSION_KEY)
            .and_then(|raw| match serde_json::from_str::<Session>(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    log::warn!("Ignoring unreadable stored session: {}", e);
                    None
                }
            });

        Self {
            storage,
            current: Mutex::new(current),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// 当前身份（同步读取）
    pub fn current_identity(&self) -> Option<Session> {
        self.current.lock().clone()
    }

    /// 当前会话的 Bearer 令牌
    pub fn bearer_token(&self) -> Option<String> {
        self.current
            .lock()
            .as_ref()
            .map(|s| s.token.clone())
            .filter(|t| !t.is_empty())
    }

    /// 订阅身份变化
    ///
    /// 订阅时立即收到当前值，之后每次变更收到一次。
    pub fn subscribe(&self) -> UnboundedReceiver<Option<Session>> {
        let (tx, rx) = unbounded();
        // 新建的通道不可能已关闭
        let _ = tx.unbounded_send(self.current_identity());
        self.subscribers.lock().push(tx);
        rx
    }

    /// 登录成功后写入会话
    pub fn set_session(&self, session: Session) {
        match serde_json::to_string(&session) {
            Ok(raw) => {
                if !self.storage.set(STORAGE_SESSION_KEY, &raw) {
                    log::warn!("Failed to persist session for {}", session.username);
                }
            }
            Err(e) => log::error!("Failed to serialize session: {}", e),
        }
        *self.current.lock() = Some(session.clone());
        self.publish(Some(session));
    }

    /// 注销：清除持久化状态并推送 `None`
    pub fn logout(&self) {
        if !self.storage.delete(STORAGE_SESSION_KEY) {
            log::warn!("Failed to remove stored session");
        }
        *self.current.lock() = None;
        self.publish(None);
    }

    /// 是否已认证（惰性检查过期时间，不使用定时器）
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now())
    }

    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        self.current
            .lock()
            .as_ref()
            .is_some_and(|session| session.is_valid_at(now))
    }

    fn publish(&self, value: Option<Session>) {
        // 顺带清理已经断开的订阅者
        self.subscribers
            .lock()
            .retain(|tx| tx.unbounded_send(value.clone()).is_ok());
    }
}
