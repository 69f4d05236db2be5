use std::path::Path;

use tokio::sync::{mpsc, oneshot};

use marquee_core::error::MarqueeError;
use marquee_core::models::{Bookmark, ContinueEntry, MediaKind, MediaRef};
use marquee_core::storage::Storage;

/// Async handle to the storage actor. Cheap to clone.
#[derive(Clone)]
pub struct DbHandle {
    tx: mpsc::UnboundedSender<DbCommand>,
}

type Reply<T> = oneshot::Sender<Result<T, MarqueeError>>;

enum DbCommand {
    AddBookmark {
        user: String,
        media: MediaRef,
        reply: Reply<()>,
    },
    RemoveBookmark {
        user: String,
        media: MediaRef,
        reply: Reply<bool>,
    },
    IsBookmarked {
        user: String,
        media: MediaRef,
        reply: Reply<bool>,
    },
    Bookmarks {
        user: String,
        kind: MediaKind,
        reply: Reply<Vec<Bookmark>>,
    },
    TouchContinueWatching {
        user: String,
        media: MediaRef,
        season: Option<u32>,
        episode: Option<u32>,
        limit: u32,
        reply: Reply<()>,
    },
    ContinueWatching {
        user: String,
        kind: MediaKind,
        reply: Reply<Vec<ContinueEntry>>,
    },
    ContinueEntry {
        user: String,
        media: MediaRef,
        reply: Reply<Option<ContinueEntry>>,
    },
    RemoveContinueWatching {
        user: String,
        media: MediaRef,
        reply: Reply<bool>,
    },
}

impl DbHandle {
    pub fn open(path: &Path) -> Result<Self, MarqueeError> {
        let storage = Storage::open(path)?;
        Self::spawn(storage)
    }

    /// Actor over an in-memory database (for tests and dry runs).
    pub fn open_memory() -> Result<Self, MarqueeError> {
        Self::spawn(Storage::open_memory()?)
    }

    fn spawn(storage: Storage) -> Result<Self, MarqueeError> {
        let (tx, rx) = mpsc::unbounded_channel();

        std::thread::Builder::new()
            .name("db-actor".into())
            .spawn(move || actor_loop(storage, rx))?;

        Ok(Self { tx })
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> DbCommand,
    ) -> Result<T, MarqueeError> {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(make(reply)).is_err() {
            return Err(actor_closed());
        }
        rx.await.unwrap_or_else(|_| Err(actor_closed()))
    }

    pub async fn add_bookmark(&self, user: &str, media: MediaRef) -> Result<(), MarqueeError> {
        let user = user.to_string();
        self.request(|reply| DbCommand::AddBookmark { user, media, reply })
            .await
    }

    pub async fn remove_bookmark(&self, user: &str, media: MediaRef) -> Result<bool, MarqueeError> {
        let user = user.to_string();
        self.request(|reply| DbCommand::RemoveBookmark { user, media, reply })
            .await
    }

    pub async fn is_bookmarked(&self, user: &str, media: MediaRef) -> Result<bool, MarqueeError> {
        let user = user.to_string();
        self.request(|reply| DbCommand::IsBookmarked { user, media, reply })
            .await
    }

    pub async fn bookmarks(
        &self,
        user: &str,
        kind: MediaKind,
    ) -> Result<Vec<Bookmark>, MarqueeError> {
        let user = user.to_string();
        self.request(|reply| DbCommand::Bookmarks { user, kind, reply })
            .await
    }

    pub async fn touch_continue_watching(
        &self,
        user: &str,
        media: MediaRef,
        season: Option<u32>,
        episode: Option<u32>,
        limit: u32,
    ) -> Result<(), MarqueeError> {
        let user = user.to_string();
        self.request(|reply| DbCommand::TouchContinueWatching {
            user,
            media,
            season,
            episode,
            limit,
            reply,
        })
        .await
    }

    pub async fn continue_watching(
        &self,
        user: &str,
        kind: MediaKind,
    ) -> Result<Vec<ContinueEntry>, MarqueeError> {
        let user = user.to_string();
        self.request(|reply| DbCommand::ContinueWatching { user, kind, reply })
            .await
    }

    pub async fn continue_entry(
        &self,
        user: &str,
        media: MediaRef,
    ) -> Result<Option<ContinueEntry>, MarqueeError> {
        let user = user.to_string();
        self.request(|reply| DbCommand::ContinueEntry { user, media, reply })
            .await
    }

    pub async fn remove_continue_watching(
        &self,
        user: &str,
        media: MediaRef,
    ) -> Result<bool, MarqueeError> {
        let user = user.to_string();
        self.request(|reply| DbCommand::RemoveContinueWatching { user, media, reply })
            .await
    }
}

fn actor_closed() -> MarqueeError {
    MarqueeError::Config("DB actor closed".into())
}

fn actor_loop(storage: Storage, mut rx: mpsc::UnboundedReceiver<DbCommand>) {
    while let Some(cmd) = rx.blocking_recv() {
        match cmd {
            DbCommand::AddBookmark { user, media, reply } => {
                let _ = reply.send(storage.add_bookmark(&user, media));
            }
            DbCommand::RemoveBookmark { user, media, reply } => {
                let _ = reply.send(storage.remove_bookmark(&user, media));
            }
            DbCommand::IsBookmarked { user, media, reply } => {
                let _ = reply.send(storage.is_bookmarked(&user, media));
            }
            DbCommand::Bookmarks { user, kind, reply } => {
                let _ = reply.send(storage.bookmarks(&user, kind));
            }
            DbCommand::TouchContinueWatching {
                user,
                media,
                season,
                episode,
                limit,
                reply,
            } => {
                let _ = reply.send(storage.touch_continue_watching(
                    &user, media, season, episode, limit,
                ));
            }
            DbCommand::ContinueWatching { user, kind, reply } => {
                let _ = reply.send(storage.continue_watching(&user, kind));
            }
            DbCommand::ContinueEntry { user, media, reply } => {
                let _ = reply.send(storage.continue_entry(&user, media));
            }
            DbCommand::RemoveContinueWatching { user, media, reply } => {
                let _ = reply.send(storage.remove_continue_watching(&user, media));
            }
        }
    }
    tracing::debug!("db actor stopped");
}
