use bedwatch_telemetry::record_subscriber_failure;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tracing::warn;

struct Entry<T: ?Sized> {
    id: u64,
    active: AtomicBool,
    callback: Box<dyn Fn(&T) + Send + Sync>,
}

/// 一组订阅回调。
///
/// 发布时按订阅顺序同步调用；回调 panic 被捕获并记录，不影响其余回调。
pub struct SubscriberList<T: ?Sized> {
    name: &'static str,
    next_id: AtomicU64,
    entries: Mutex<Vec<Arc<Entry<T>>>>,
}

impl<T: ?Sized + 'static> SubscriberList<T> {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            next_id: AtomicU64::new(1),
            entries: Mutex::new(Vec::new()),
        })
    }

    /// 注册回调，返回用于退订的句柄。
    pub fn subscribe<F>(self: &Arc<Self>, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let entry = Arc::new(Entry {
            id,
            active: AtomicBool::new(true),
            callback: Box::new(callback),
        });
        self.lock_entries().push(entry);
        let list: Weak<Self> = Arc::downgrade(self);
        Subscription::new(move || {
            if let Some(list) = list.upgrade() {
                list.remove(id);
            }
        })
    }

    /// 调用全部回调，返回失败（panic）的回调数量。
    pub fn publish(&self, value: &T) -> usize {
        // 先取快照再释放锁，回调内可以安全地订阅/退订
        let entries: Vec<Arc<Entry<T>>> = self.lock_entries().clone();
        let mut failures = 0;
        for entry in entries {
            if !entry.active.load(Ordering::Acquire) {
                continue;
            }
            let outcome = catch_unwind(AssertUnwindSafe(|| (entry.callback)(value)));
            if outcome.is_err() {
                failures += 1;
                record_subscriber_failure();
                warn!(
                    target: "bedwatch.realtime",
                    subscribers = self.name,
                    subscription_id = entry.id,
                    "subscriber_panicked"
                );
            }
        }
        failures
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove(&self, id: u64) {
        let mut entries = self.lock_entries();
        if let Some(index) = entries.iter().position(|entry| entry.id == id) {
            let entry = entries.remove(index);
            entry.active.store(false, Ordering::Release);
        }
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, Vec<Arc<Entry<T>>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 退订句柄。
///
/// 直接丢弃句柄不会退订，回调保持注册，需要显式调用 `unsubscribe`。
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// 移除对应的回调；返回后该回调不会再收到新的发布。
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
