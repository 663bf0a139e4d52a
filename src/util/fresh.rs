use std::time::{Duration, Instant};

/// A value that expires a fixed time after it was fetched.
#[derive(Debug, Clone)]
pub struct Fresh<T> {
    data: T,
    fetched_at: Instant,
    max_age: Duration,
}

impl<T> Fresh<T> {
    pub fn new(data: T, max_age: Duration) -> Self {
        Self {
            data,
            fetched_at: Instant::now(),
            max_age,
        }
    }

    /// Returns the value while it is still fresh.
    pub fn get(&self) -> Option<&T> {
        if self.fetched_at.elapsed() > self.max_age {
            None
        } else {
            Some(&self.data)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fresh_value_is_returned() {
        let fresh = Fresh::new(5, Duration::from_secs(60));
        assert_eq!(fresh.get(), Some(&5));
    }

    #[test]
    fn expired_value_is_hidden() {
        let fresh = Fresh::new(5, Duration::ZERO);
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(fresh.get(), None);
    }
}
