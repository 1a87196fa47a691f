use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::interceptor::Interceptor;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// 拦截器注册句柄
///
/// 注册时分配，全进程唯一。即使两个拦截器行为完全相同，移除时也不会混淆。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterceptorId(u64);

impl InterceptorId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// 拦截器插入位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// 插入到最前面，先于其他所有拦截器执行
    First,
    /// 插入到第二个位置（链为空时即第一个）
    ///
    /// 第一个注册的"基础"拦截器保持在首位，之后默认注册的拦截器紧跟其后而不是追加到末尾。
    /// 因此多个默认注册的拦截器之间是逆序执行的。
    #[default]
    AfterFirst,
    /// 追加到末尾，晚于其他所有拦截器执行
    Last,
}

/// 有序拦截器链
///
/// 按顺序从左到右依次应用，每个拦截器接收上一个拦截器的输出。
pub struct InterceptorChain<T> {
    entries: Vec<(InterceptorId, Arc<dyn Interceptor<T>>)>,
}

impl<T> InterceptorChain<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// 按插入策略注册拦截器，返回用于移除的句柄
    pub fn insert(&mut self, interceptor: Arc<dyn Interceptor<T>>, placement: Placement) -> InterceptorId {
        let id = InterceptorId::next();
        let entry = (id, interceptor);
        match placement {
            Placement::First => self.entries.insert(0, entry),
            Placement::Last => self.entries.push(entry),
            Placement::AfterFirst => {
                let index = self.entries.len().min(1);
                self.entries.insert(index, entry);
            }
        }
        id
    }

    /// 移除句柄对应的拦截器，未注册时什么也不做
    ///
    /// 返回是否真的移除了拦截器。
    pub fn remove(&mut self, id: InterceptorId) -> bool {
        match self.entries.iter().position(|(entry_id, _)| *entry_id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// 当前执行顺序下的句柄列表
    pub fn ids(&self) -> Vec<InterceptorId> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    /// 复制当前的拦截器列表
    ///
    /// 调用方可以在释放锁之后再执行它们，拦截器内部因此可以安全地注册或移除拦截器。
    pub fn snapshot(&self) -> Vec<Arc<dyn Interceptor<T>>> {
        self.entries
            .iter()
            .map(|(_, interceptor)| Arc::clone(interceptor))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 从左到右归约应用拦截器
pub fn apply_all<T>(interceptors: &[Arc<dyn Interceptor<T>>], value: T) -> T {
    interceptors
        .iter()
        .fold(value, |value, interceptor| interceptor.intercept(value))
}

impl<T> Default for InterceptorChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for InterceptorChain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("ids", &self.ids())
            .finish()
    }
}
