use std::hash::Hash;
use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};

/// One use per `period` for each key, shared by every command using it.
pub struct SharedCooldown<K>
where
    K: Hash + Eq + Clone,
{
    limiter: RateLimiter<K, DefaultKeyedStateStore<K>, DefaultClock>,
    clock: DefaultClock,
}

impl<K> SharedCooldown<K>
where
    K: Hash + Eq + Clone,
{
    pub fn new(period: Duration) -> Self {
        let quota = Quota::with_period(period).unwrap_or_else(|| Quota::per_minute(NonZeroU32::MIN));
        Self {
            limiter: RateLimiter::keyed(quota),
            clock: DefaultClock::default(),
        }
    }

    /// Consumes the use for `key`.
    ///
    /// # Returns
    /// - `Ok(())` - The key was off cooldown and is now on it
    /// - `Err(Duration)` - Time left until the key can be used again
    pub fn acquire(&self, key: &K) -> Result<(), Duration> {
        self.limiter
            .check_key(key)
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serenity::all::ChannelId;

    #[test]
    fn second_use_waits() {
        let cooldown = SharedCooldown::new(Duration::from_secs(60));
        let category = ChannelId::new(10);

        assert!(cooldown.acquire(&category).is_ok());
        let remaining = cooldown.acquire(&category).unwrap_err();
        assert!(remaining > Duration::from_secs(50));
        assert!(remaining <= Duration::from_secs(60));
    }

    #[test]
    fn keys_are_independent() {
        let cooldown = SharedCooldown::new(Duration::from_secs(60));

        assert!(cooldown.acquire(&ChannelId::new(10)).is_ok());
        assert!(cooldown.acquire(&ChannelId::new(20)).is_ok());
        assert!(cooldown.acquire(&ChannelId::new(10)).is_err());
    }
}
