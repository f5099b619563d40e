//! Deferred Population - 지연 등록 큐
//!
//! 서로의 레지스트리에 등록해야 하는 두 컴포넌트 그룹이 로드 순서에 묶이지
//! 않도록, 등록 로직을 callback으로 큐에 넣고 첫 조회 시점에 실행합니다.
//!
//! - callback은 `FnOnce`이고 큐 lock 아래에서 꺼내므로 최대 한 번만 실행됩니다
//! - 등록 순서대로 시작되며, flush 중에 추가된 callback도 같은 flush에서 실행됩니다
//! - callback 실행 중에는 어떤 lock도 잡지 않습니다
//! - callback 밖의 조회는 다른 스레드에서 실행 중인 callback이 끝날 때까지
//!   기다립니다 (condvar)
//! - callback 안의 조회는 기다리지 않고 남은 callback만 실행합니다. 그래서
//!   두 레지스트리의 callback이 서로를 조회해도 deadlock이 없습니다

use super::registry::Registry;
use catalog_foundation::Result;
use parking_lot::{Condvar, Mutex};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// 지연 등록 callback
pub type DeferredFn<T> = Box<dyn FnOnce(&Registry<T>) -> Result<()> + Send>;

static NEXT_QUEUE_ID: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    /// 현재 스레드에서 callback을 실행 중인 큐 (중첩 순서)
    static ACTIVE_QUEUES: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// 지연 등록 큐
pub(crate) struct DeferredQueue<T: 'static> {
    id: usize,

    state: Mutex<QueueState<T>>,

    /// 실행 중인 callback이 끝날 때마다 신호
    finished: Condvar,

    /// 대기 callback도, 실행 중인 callback도 없음
    settled: AtomicBool,
}

struct QueueState<T: 'static> {
    pending: VecDeque<DeferredFn<T>>,
    /// 실행 중인 callback 수 (모든 스레드)
    running: usize,
}

impl<T: 'static> DeferredQueue<T> {
    pub(crate) fn new() -> Self {
        Self {
            id: NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed),
            state: Mutex::new(QueueState {
                pending: VecDeque::new(),
                running: 0,
            }),
            finished: Condvar::new(),
            settled: AtomicBool::new(true),
        }
    }

    /// callback 추가 (실행하지 않음)
    pub(crate) fn push(&self, callback: DeferredFn<T>) {
        let mut state = self.state.lock();
        state.pending.push_back(callback);
        self.settled.store(false, Ordering::Release);
    }

    /// 대기 중인 callback 수
    pub(crate) fn len(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.settled.load(Ordering::Acquire)
    }

    /// 현재 스레드가 이 큐의 callback을 실행 중인지
    pub(crate) fn is_flushing_here(&self) -> bool {
        ACTIVE_QUEUES.with(|active| active.borrow().contains(&self.id))
    }

    /// 대기 중인 callback 모두 실행
    ///
    /// 이 호출이 실행한 callback 수를 반환합니다. callback이 실패하면 그
    /// callback은 소비된 채로 에러가 전파되고, 아직 실행되지 않은 callback은
    /// 순서대로 큐에 남아 다음 조회 때 실행됩니다.
    pub(crate) fn flush(&self, registry: &Registry<T>) -> Result<usize> {
        if self.is_settled() {
            return Ok(0);
        }

        let nested = ACTIVE_QUEUES.with(|active| !active.borrow().is_empty());
        let mut ran = 0;
        let mut state = self.state.lock();

        loop {
            if let Some(callback) = state.pending.pop_front() {
                state.running += 1;
                drop(state);

                ran += 1;
                let running = RunningGuard::enter(self);
                let outcome = callback(registry);
                drop(running);
                outcome?;

                state = self.state.lock();
                continue;
            }

            if state.running == 0 {
                self.settled.store(true, Ordering::Release);
                return Ok(ran);
            }

            // 다른 callback 안이면 기다리지 않음 (교차 조회 deadlock 방지)
            if nested {
                return Ok(ran);
            }
            self.finished.wait(&mut state);
        }
    }
}

/// 실행 중인 callback 표시 (panic 시에도 복원)
struct RunningGuard<'a, T: 'static> {
    queue: &'a DeferredQueue<T>,
}

impl<'a, T: 'static> RunningGuard<'a, T> {
    fn enter(queue: &'a DeferredQueue<T>) -> Self {
        ACTIVE_QUEUES.with(|active| active.borrow_mut().push(queue.id));
        Self { queue }
    }
}

impl<T: 'static> Drop for RunningGuard<'_, T> {
    fn drop(&mut self) {
        ACTIVE_QUEUES.with(|active| {
            active.borrow_mut().pop();
        });

        let mut state = self.queue.state.lock();
        state.running -= 1;
        if state.running == 0 && state.pending.is_empty() {
            self.queue.settled.store(true, Ordering::Release);
        }
        drop(state);
        self.queue.finished.notify_all();
    }
}
