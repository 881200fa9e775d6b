//! 防抖：触发后等待一段静默时间才执行；期间再次触发会推迟截止时间

#[derive(Debug, Clone)]
pub struct Debouncer {
    wait: u64,
    deadline: Option<u64>,
}

impl Debouncer {
    pub fn new(wait: u64) -> Self {
        Self {
            wait,
            deadline: None,
        }
    }

    pub fn trigger(&mut self, now: u64) {
        self.deadline = Some(now.saturating_add(self.wait));
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// 截止时间已到则返回 true 并清除；每次触发至多执行一次
    pub fn fire(&mut self, now: u64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_wait() {
        let mut d = Debouncer::new(50);
        assert!(!d.fire(1000), "未触发时不执行");
        d.trigger(0);
        assert!(!d.fire(49));
        assert!(d.fire(50));
        assert!(!d.fire(60), "同一次触发只执行一次");
    }

    #[test]
    fn test_retrigger_postpones() {
        let mut d = Debouncer::new(50);
        d.trigger(0);
        d.trigger(40);
        assert!(!d.fire(60));
        assert!(d.is_pending());
        assert!(d.fire(90));
    }
}
