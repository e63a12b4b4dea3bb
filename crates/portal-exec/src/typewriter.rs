use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Character-by-character reveal of a fixed text.
#[derive(Debug, Clone)]
pub struct Typewriter {
    text: String,
    tick: Duration,
}

impl Typewriter {
    pub fn new(text: impl Into<String>, tick: Duration) -> Self {
        Self {
            text: text.into(),
            tick,
        }
    }

    /// Every non-empty prefix ending on a char boundary, shortest first.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.text
            .char_indices()
            .map(|(idx, ch)| &self.text[..idx + ch.len_utf8()])
    }

    /// Calls `frame` with each growing prefix, one per tick. Returns `false`
    /// if `token` was cancelled before the full text was shown.
    pub async fn reveal<F>(&self, token: &CancellationToken, mut frame: F) -> bool
    where
        F: FnMut(&str),
    {
        let mut interval = tokio::time::interval(self.tick.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        for prefix in self.prefixes() {
            tokio::select! {
                _ = token.cancelled() => return false,
                _ = interval.tick() => frame(prefix),
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokio::time::Instant;

    use super::*;

    #[test]
    fn prefixes_respect_multibyte_characters() {
        let writer = Typewriter::new("a✓b", Duration::from_millis(20));
        assert_eq!(writer.prefixes().collect::<Vec<_>>(), vec!["a", "a✓", "a✓b"]);
        assert_eq!(Typewriter::new("", Duration::ZERO).prefixes().count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reveal_emits_one_prefix_per_tick() {
        let writer = Typewriter::new("abcd", Duration::from_millis(20));
        let start = Instant::now();
        let mut frames = Vec::new();
        let done = writer
            .reveal(&CancellationToken::new(), |prefix| frames.push(prefix.to_string()))
            .await;
        assert!(done);
        assert_eq!(frames, vec!["a", "ab", "abc", "abcd"]);
        // First tick is immediate.
        assert_eq!(start.elapsed().as_millis(), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_reveal_stops_early() {
        let writer = Typewriter::new("abcdef", Duration::from_millis(20));
        let token = CancellationToken::new();
        let canceller = token.clone();
        let mut frames = 0;
        let done = writer
            .reveal(&token, |_| {
                frames += 1;
                if frames == 2 {
                    canceller.cancel();
                }
            })
            .await;
        assert!(!done);
        assert_eq!(frames, 2);
    }
}
